//! Test utilities for integration tests.
//!
//! Builders for synthetic Exif payloads and the JPEG files that carry them,
//! in either byte order.

// =============================================================================
// Tag Values
// =============================================================================

pub const TAG_MAKE: u16 = 0x010F;
pub const TAG_MODEL: u16 = 0x0110;
pub const TAG_DATE_TIME: u16 = 0x0132;
pub const TAG_EXPOSURE_TIME: u16 = 0x829A;
pub const TAG_F_NUMBER: u16 = 0x829D;
pub const TAG_EXIF_IFD_POINTER: u16 = 0x8769;
pub const TAG_ISO: u16 = 0x8827;
pub const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const TAG_EXPOSURE_BIAS: u16 = 0x9204;
pub const TAG_FOCAL_LENGTH: u16 = 0x920A;
pub const TAG_LENS_MODEL: u16 = 0xA434;

#[derive(Clone, Copy, Debug)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

impl ByteOrderType {
    fn u16(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        }
    }

    fn u32(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        }
    }

    fn marker(self) -> &'static [u8; 2] {
        match self {
            ByteOrderType::LittleEndian => b"II",
            ByteOrderType::BigEndian => b"MM",
        }
    }
}

/// A directory entry value.
#[derive(Clone, Debug)]
pub enum Value {
    /// Text; a NUL terminator is appended
    Ascii(String),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<(u32, u32)>),
    SRational(Vec<(i32, i32)>),
    /// Arbitrary type, count and value bytes, for corrupt entries
    Raw {
        field_type: u16,
        count: u32,
        bytes: Vec<u8>,
    },
    /// Entry whose value offset is written verbatim
    Offset {
        field_type: u16,
        count: u32,
        offset: u32,
    },
}

impl Value {
    pub fn ascii(s: &str) -> Self {
        Value::Ascii(s.to_string())
    }

    pub fn rational(numerator: u32, denominator: u32) -> Self {
        Value::Rational(vec![(numerator, denominator)])
    }

    /// Field type, count and encoded bytes.
    fn encode(&self, order: ByteOrderType) -> (u16, u32, Vec<u8>) {
        match self {
            Value::Ascii(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.push(0);
                (2, bytes.len() as u32, bytes)
            }
            Value::Short(values) => {
                let bytes = values.iter().flat_map(|&v| order.u16(v)).collect();
                (3, values.len() as u32, bytes)
            }
            Value::Long(values) => {
                let bytes = values.iter().flat_map(|&v| order.u32(v)).collect();
                (4, values.len() as u32, bytes)
            }
            Value::Rational(values) => {
                let bytes = values
                    .iter()
                    .flat_map(|&(n, d)| order.u32(n).into_iter().chain(order.u32(d)))
                    .collect();
                (5, values.len() as u32, bytes)
            }
            Value::SRational(values) => {
                let bytes = values
                    .iter()
                    .flat_map(|&(n, d)| order.u32(n as u32).into_iter().chain(order.u32(d as u32)))
                    .collect();
                (10, values.len() as u32, bytes)
            }
            Value::Raw {
                field_type,
                count,
                bytes,
            } => (*field_type, *count, bytes.clone()),
            Value::Offset { .. } => unreachable!("offset entries are written verbatim"),
        }
    }
}

// =============================================================================
// Exif Payload Builder
// =============================================================================

/// Builder for an Exif APP1 payload (signature + TIFF header + directories).
///
/// IFD0 starts right after the TIFF header. When sub-directory entries are
/// added, IFD0 gets an Exif IFD pointer and the sub-directory follows the
/// IFD0 value area.
#[derive(Clone)]
pub struct ExifBuilder {
    byte_order: ByteOrderType,
    ifd0: Vec<(u16, Value)>,
    exif_ifd: Option<Vec<(u16, Value)>>,
}

impl ExifBuilder {
    pub fn new(byte_order: ByteOrderType) -> Self {
        Self {
            byte_order,
            ifd0: Vec::new(),
            exif_ifd: None,
        }
    }

    /// Add an entry to IFD0.
    pub fn entry(mut self, tag: u16, value: Value) -> Self {
        self.ifd0.push((tag, value));
        self
    }

    /// Add an entry to the Exif sub-directory.
    pub fn exif_entry(mut self, tag: u16, value: Value) -> Self {
        self.exif_ifd.get_or_insert_with(Vec::new).push((tag, value));
        self
    }

    /// TIFF structure without the `Exif\0\0` signature.
    pub fn build_tiff(&self) -> Vec<u8> {
        let order = self.byte_order;
        let mut ifd0 = self.ifd0.clone();

        if let Some(sub) = &self.exif_ifd {
            // The pointer is inline, so the IFD0 block size does not depend on it
            ifd0.push((TAG_EXIF_IFD_POINTER, Value::Long(vec![0])));
            let sub_offset = 8 + block_len(&ifd0, order);
            if let Some(last) = ifd0.last_mut() {
                last.1 = Value::Long(vec![sub_offset as u32]);
            }

            let mut out = header(order);
            write_directory(&mut out, &ifd0, order);
            write_directory(&mut out, sub, order);
            return out;
        }

        let mut out = header(order);
        write_directory(&mut out, &ifd0, order);
        out
    }

    /// Full APP1 payload starting at the `Exif\0\0` signature.
    pub fn build(&self) -> Vec<u8> {
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend(self.build_tiff());
        payload
    }

    /// A complete JPEG carrying this payload.
    pub fn build_jpeg(&self) -> Vec<u8> {
        JpegBuilder::new()
            .segment(APP0, jfif_body())
            .segment(APP1, self.build())
            .build()
    }
}

fn header(order: ByteOrderType) -> Vec<u8> {
    let mut out = order.marker().to_vec();
    out.extend(order.u16(42));
    out.extend(order.u32(8));
    out
}

fn out_of_line_len(value: &Value, order: ByteOrderType) -> usize {
    if let Value::Offset { .. } = value {
        return 0;
    }
    let (_, _, bytes) = value.encode(order);
    if bytes.len() > 4 {
        bytes.len() + bytes.len() % 2
    } else {
        0
    }
}

/// Size of a directory plus its value area.
fn block_len(entries: &[(u16, Value)], order: ByteOrderType) -> usize {
    let values: usize = entries
        .iter()
        .map(|(_, value)| out_of_line_len(value, order))
        .sum();
    2 + entries.len() * 12 + 4 + values
}

/// Append a directory at the current end of `out`, followed by its values.
fn write_directory(out: &mut Vec<u8>, entries: &[(u16, Value)], order: ByteOrderType) {
    // Offsets are relative to the TIFF header, which starts at out[0]
    let start = out.len();
    let mut value_offset = start + 2 + entries.len() * 12 + 4;
    let mut values = Vec::new();

    out.extend(order.u16(entries.len() as u16));
    for (tag, value) in entries {
        out.extend(order.u16(*tag));

        if let Value::Offset {
            field_type,
            count,
            offset,
        } = value
        {
            out.extend(order.u16(*field_type));
            out.extend(order.u32(*count));
            out.extend(order.u32(*offset));
            continue;
        }

        let (field_type, count, bytes) = value.encode(order);
        out.extend(order.u16(field_type));
        out.extend(order.u32(count));
        if bytes.len() <= 4 {
            let mut inline = bytes.clone();
            inline.resize(4, 0);
            out.extend(inline);
        } else {
            out.extend(order.u32(value_offset as u32));
            value_offset += bytes.len() + bytes.len() % 2;
            values.extend(&bytes);
            if bytes.len() % 2 == 1 {
                values.push(0);
            }
        }
    }
    out.extend(order.u32(0)); // next IFD
    out.extend(values);
}

// =============================================================================
// JPEG Builder
// =============================================================================

pub const SOI: u8 = 0xD8;
pub const EOI: u8 = 0xD9;
pub const SOS: u8 = 0xDA;
pub const DQT: u8 = 0xDB;
pub const APP0: u8 = 0xE0;
pub const APP1: u8 = 0xE1;
pub const COM: u8 = 0xFE;

/// Builder for JPEG files made of header segments, a scan and EOI.
pub struct JpegBuilder {
    segments: Vec<u8>,
    with_scan: bool,
}

impl JpegBuilder {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            with_scan: true,
        }
    }

    /// Append a segment with a correct length field.
    pub fn segment(mut self, marker: u8, body: Vec<u8>) -> Self {
        self.segments.extend(segment(marker, &body));
        self
    }

    /// Append bytes as they are.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.segments.extend_from_slice(bytes);
        self
    }

    /// Leave out the scan and EOI.
    pub fn without_scan(mut self) -> Self {
        self.with_scan = false;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = vec![0xFF, SOI];
        out.extend(self.segments);
        if self.with_scan {
            out.extend(segment(SOS, &[0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]));
            // Entropy-coded data with a stuffed byte
            out.extend_from_slice(&[0x12, 0x34, 0xFF, 0x00, 0x56]);
            out.extend_from_slice(&[0xFF, EOI]);
        }
        out
    }
}

impl Default for JpegBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A marker segment: FF, marker, big-endian length (including itself), body.
pub fn segment(marker: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, marker];
    out.extend(((body.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(body);
    out
}

/// JFIF APP0 body.
pub fn jfif_body() -> Vec<u8> {
    b"JFIF\0\x01\x01\x00\x00\x01\x00\x01\x00\x00".to_vec()
}

/// XMP APP1 body.
pub fn xmp_body() -> Vec<u8> {
    let mut body = b"http://ns.adobe.com/xap/1.0/\0".to_vec();
    body.extend_from_slice(b"<x:xmpmeta xmlns:x=\"adobe:ns:meta/\"></x:xmpmeta>");
    body
}

// =============================================================================
// Sample Files
// =============================================================================

/// A camera file with every extracted tag, split across IFD0 and the Exif
/// sub-directory the way cameras write them.
pub fn camera_exif(order: ByteOrderType) -> ExifBuilder {
    ExifBuilder::new(order)
        .entry(TAG_MAKE, Value::ascii("Canon"))
        .entry(TAG_MODEL, Value::ascii("Canon EOS R5"))
        .entry(TAG_DATE_TIME, Value::ascii("2024:03:16 09:00:00"))
        .exif_entry(TAG_EXPOSURE_TIME, Value::rational(1, 250))
        .exif_entry(TAG_F_NUMBER, Value::rational(28, 10))
        .exif_entry(TAG_ISO, Value::Short(vec![400]))
        .exif_entry(TAG_DATE_TIME_ORIGINAL, Value::ascii("2024:03:15 10:30:00"))
        .exif_entry(TAG_FOCAL_LENGTH, Value::rational(50, 1))
        .exif_entry(TAG_LENS_MODEL, Value::ascii("RF50mm F1.8 STM"))
}

/// Payload whose only entry is DateTimeOriginal.
pub fn date_only_exif(order: ByteOrderType) -> ExifBuilder {
    ExifBuilder::new(order).entry(TAG_DATE_TIME_ORIGINAL, Value::ascii("2024:03:15 10:30:00"))
}

// =============================================================================
// Validation Helpers
// =============================================================================

/// Find the offset of the first `Exif\0\0` signature.
pub fn find_exif_signature(data: &[u8]) -> Option<usize> {
    data.windows(6).position(|w| w == b"Exif\0\0")
}
