//! Exif payload header parsing.
//!
//! # Payload Layout
//!
//! ```text
//! Bytes 0-5:  "Exif\0\0" signature
//! Bytes 6-7:  Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 8-9:  TIFF magic (42)
//! Bytes 10-13: Offset to IFD0, relative to byte 6
//! ```
//!
//! Byte 6 is the base offset: every offset stored anywhere in the payload is
//! measured from there, not from the start of the file or segment.

use crate::error::ExifError;
use crate::io::ByteCursor;

// =============================================================================
// Constants
// =============================================================================

/// Signature that opens an Exif APP1 payload.
pub const EXIF_SIGNATURE: &[u8; 6] = b"Exif\0\0";

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// TIFF magic number following the byte order marker
const TIFF_MAGIC: u16 = 42;

/// Size of the TIFF header in bytes. No directory can start inside it.
pub const TIFF_HEADER_SIZE: usize = 8;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of an Exif payload.
///
/// Declared once by the TIFF header and applied to every multi-byte value
/// that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    #[inline]
    pub fn u16_from(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
        }
    }

    #[inline]
    pub fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
        }
    }

    /// Interpret the 2-byte marker that opens a TIFF header.
    pub fn from_marker(bytes: [u8; 2]) -> Option<Self> {
        // Both markers are palindromes, so the read order does not matter
        match u16::from_be_bytes(bytes) {
            BYTE_ORDER_LITTLE_ENDIAN => Some(ByteOrder::LittleEndian),
            BYTE_ORDER_BIG_ENDIAN => Some(ByteOrder::BigEndian),
            _ => None,
        }
    }
}

// =============================================================================
// ExifHeader
// =============================================================================

/// Parsed Exif payload header.
///
/// Holds what the directory walk needs: the byte order and where IFD0 is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExifHeader {
    /// Byte order for all multi-byte values in the payload
    pub byte_order: ByteOrder,

    /// Offset of IFD0, relative to the TIFF header
    pub first_ifd_offset: u32,
}

impl ExifHeader {
    /// Parse the signature and TIFF header at the start of an Exif payload.
    ///
    /// # Errors
    /// - `InvalidSignature` if the payload does not open with `Exif\0\0`
    /// - `InvalidByteOrder` if the marker is neither II nor MM
    /// - `InvalidMagic` if the TIFF magic is not 42
    /// - `InvalidIfdOffset` if IFD0 would start inside the header or past the payload
    /// - `OutOfBounds` if the payload ends inside the header
    pub fn parse(payload: &[u8]) -> Result<Self, ExifError> {
        match payload.get(..EXIF_SIGNATURE.len()) {
            Some(sig) if sig == EXIF_SIGNATURE => {}
            _ => return Err(ExifError::InvalidSignature),
        }

        let tiff = tiff_region(payload);

        // Read the marker raw; byte order is not known yet
        let marker = ByteCursor::new(tiff, ByteOrder::BigEndian).array_at::<2>(0)?;
        let byte_order = ByteOrder::from_marker(marker)
            .ok_or_else(|| ExifError::InvalidByteOrder(u16::from_be_bytes(marker)))?;

        let cursor = ByteCursor::new(tiff, byte_order);

        let magic = cursor.u16_at(2)?;
        if magic != TIFF_MAGIC {
            return Err(ExifError::InvalidMagic(magic));
        }

        let first_ifd_offset = cursor.u32_at(4)?;
        if (first_ifd_offset as usize) < TIFF_HEADER_SIZE
            || first_ifd_offset as usize >= tiff.len()
        {
            return Err(ExifError::InvalidIfdOffset(first_ifd_offset));
        }

        Ok(ExifHeader {
            byte_order,
            first_ifd_offset,
        })
    }
}

/// The part of an Exif payload that offsets are measured from.
///
/// Callers must have checked the signature first; a short payload yields an
/// empty region rather than a panic.
#[inline]
pub fn tiff_region(payload: &[u8]) -> &[u8] {
    payload.get(EXIF_SIGNATURE.len()..).unwrap_or(&[])
}

// =============================================================================
// Tests
// =============================================================================
