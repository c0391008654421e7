//! JPEG segment scanning.
//!
//! A JPEG stream is a sequence of marker segments:
//!
//! ```text
//! FF D8                      SOI, no length
//! FF Ex LL LL <LL-2 bytes>   APPn (APP1 carries Exif)
//! ...                        DQT, DHT, SOF, ...
//! FF DA LL LL ...            SOS, entropy-coded data follows
//! ```
//!
//! The length field is big-endian and counts itself but not the marker.
//! Header segments, including Exif, come before SOS, so the scan stops there.

use tracing::trace;

use crate::error::ScanError;
use crate::io::ByteCursor;

use super::exif::{ByteOrder, EXIF_SIGNATURE};

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// End Of Image marker
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// Start Of Scan marker
pub const SOS: [u8; 2] = [0xFF, 0xDA];

/// Application segment 0 (JFIF) marker
pub const APP0: [u8; 2] = [0xFF, 0xE0];

/// Application segment 1 (Exif, XMP) marker
pub const APP1: [u8; 2] = [0xFF, 0xE1];

/// Temporary marker, stands alone without a length
const TEM: u8 = 0x01;

/// Restart markers, stand alone without a length
const RST0: u8 = 0xD0;
const RST7: u8 = 0xD7;

/// Marker prefix byte; repeated prefixes are fill bytes
const MARKER_PREFIX: u8 = 0xFF;

/// Size of the segment length field
const LENGTH_FIELD_SIZE: usize = 2;

// =============================================================================
// PayloadRange
// =============================================================================

/// Location of the Exif payload in the scanned buffer.
///
/// Covers the segment body only: the marker and length field are excluded,
/// so the range starts at the `Exif\0\0` signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadRange {
    pub start: usize,
    pub end: usize,
}

impl PayloadRange {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Borrow the payload from the buffer it was scanned from.
    ///
    /// Returns an empty slice if the range does not fit `buffer`.
    pub fn slice<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        buffer.get(self.start..self.end).unwrap_or(&[])
    }
}

// =============================================================================
// Scanning
// =============================================================================

/// Find the Exif APP1 payload in a JPEG buffer.
///
/// Unrelated segments, including APP1 segments that carry something other
/// than Exif (XMP), are skipped. The scan ends without a result at SOS or EOI.
///
/// # Errors
/// - `InvalidStartMarker` if the buffer does not start with SOI
/// - `InvalidMarker` if a segment does not start with 0xFF
/// - `InvalidSegmentLength` if a length field is below 2
/// - `SegmentOverrun` if a segment extends past the buffer
/// - `Truncated` if the buffer ends inside a marker or length field
/// - `ImageDataReached` / `EndOfStream` if no Exif segment precedes the end
pub fn scan(buffer: &[u8]) -> Result<PayloadRange, ScanError> {
    let mut cursor = ByteCursor::new(buffer, ByteOrder::BigEndian);

    match cursor.read_bytes(SOI.len()) {
        Ok(start) if start == SOI => {}
        _ => return Err(ScanError::InvalidStartMarker),
    }

    loop {
        let marker_offset = cursor.position();
        if cursor.remaining() == 0 {
            return Err(ScanError::EndOfStream);
        }

        let prefix = cursor.read_u8()?;
        if prefix != MARKER_PREFIX {
            return Err(ScanError::InvalidMarker {
                offset: marker_offset,
                byte: prefix,
            });
        }

        let mut code = cursor.read_u8()?;
        while code == MARKER_PREFIX {
            code = cursor.read_u8()?;
        }

        match code {
            c if c == SOS[1] || c == EOI[1] => {
                return Err(ScanError::ImageDataReached(marker_offset));
            }
            c if c == TEM || (RST0..=RST7).contains(&c) => continue,
            // 0x00 is byte stuffing and a second SOI is never valid here
            c if c == 0x00 || c == SOI[1] => {
                return Err(ScanError::InvalidMarker {
                    offset: marker_offset,
                    byte: c,
                });
            }
            _ => {}
        }

        let length = cursor.read_u16()?;
        if (length as usize) < LENGTH_FIELD_SIZE {
            return Err(ScanError::InvalidSegmentLength {
                offset: marker_offset,
                length,
            });
        }

        let body_start = cursor.position();
        let body_len = length as usize - LENGTH_FIELD_SIZE;
        let body = cursor
            .bytes_at(body_start, body_len)
            .map_err(|_| ScanError::SegmentOverrun {
                offset: marker_offset,
                length: length as usize,
                size: buffer.len(),
            })?;

        if code == APP1[1] && body.starts_with(EXIF_SIGNATURE) {
            return Ok(PayloadRange {
                start: body_start,
                end: body_start + body_len,
            });
        }

        trace!(
            marker = code,
            offset = marker_offset,
            length,
            "skipping segment"
        );
        cursor.skip(body_len)?;
    }
}

/// Check if bytes start with the JPEG SOI marker.
pub fn is_jpeg_header(bytes: &[u8]) -> bool {
    bytes.starts_with(&SOI)
}

// =============================================================================
// Tests
// =============================================================================
