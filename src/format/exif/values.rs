//! Exif tag value decoding.
//!
//! Values are stored either inline in the entry's 4-byte value field (when
//! `size(type) × count ≤ 4`) or at an offset from the TIFF header. Decoding
//! failures here are local to one tag and never abort the directory walk.

use crate::error::FieldError;
use crate::io::ByteCursor;

use super::directory::DirectoryEntry;
use super::tags::{FieldType, TagSpec};

/// An unsigned fraction as stored by RATIONAL fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

/// A signed fraction as stored by SRATIONAL fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}

/// A decoded tag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// ASCII text with the NUL terminator and any padding removed
    Ascii(String),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    SRational(Vec<SRational>),
}

impl RawValue {
    /// First value as an unsigned integer, for SHORT and LONG values.
    pub fn first_u32(&self) -> Option<u32> {
        match self {
            RawValue::Short(v) => v.first().map(|&x| x as u32),
            RawValue::Long(v) => v.first().copied(),
            _ => None,
        }
    }

    pub fn first_rational(&self) -> Option<Rational> {
        match self {
            RawValue::Rational(v) => v.first().copied(),
            _ => None,
        }
    }

    pub fn first_srational(&self) -> Option<SRational> {
        match self {
            RawValue::SRational(v) => v.first().copied(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Ascii(s) => Some(s),
            _ => None,
        }
    }
}

/// Decode the value of `entry` according to the tag's table row.
///
/// `tiff` is positioned so that offset 0 is the base offset.
pub fn read_value(
    tiff: &ByteCursor<'_>,
    entry: &DirectoryEntry,
    spec: &TagSpec,
) -> Result<RawValue, FieldError> {
    let field_type =
        FieldType::from_u16(entry.field_type).ok_or(FieldError::UnsupportedType(entry.field_type))?;

    if !spec.types.contains(&field_type) {
        return Err(FieldError::UnexpectedType {
            tag: spec.name,
            found: entry.field_type,
        });
    }
    if !spec.count.accepts(entry.count) {
        return Err(FieldError::UnexpectedCount {
            tag: spec.name,
            found: entry.count,
        });
    }

    let len = field_type
        .byte_length(entry.count)
        .ok_or(FieldError::Overflow(spec.name))?;

    let bytes: &[u8] = if field_type.fits_inline(entry.count) {
        &entry.value_bytes[..len]
    } else {
        let offset = tiff.byte_order().u32_from(entry.value_bytes) as usize;
        tiff.bytes_at(offset, len)?
    };

    // Decode from the value's own bytes so element reads stay in bounds
    let values = ByteCursor::new(bytes, tiff.byte_order());
    let count = entry.count as usize;

    match field_type {
        FieldType::Ascii => decode_ascii(bytes, spec.name).map(RawValue::Ascii),
        FieldType::Short => (0..count)
            .map(|i| values.u16_at(i * 2))
            .collect::<Result<Vec<_>, _>>()
            .map(RawValue::Short)
            .map_err(FieldError::from),
        FieldType::Long => (0..count)
            .map(|i| values.u32_at(i * 4))
            .collect::<Result<Vec<_>, _>>()
            .map(RawValue::Long)
            .map_err(FieldError::from),
        FieldType::Rational => (0..count)
            .map(|i| -> Result<Rational, FieldError> {
                Ok(Rational {
                    numerator: values.u32_at(i * 8)?,
                    denominator: values.u32_at(i * 8 + 4)?,
                })
            })
            .collect::<Result<Vec<_>, FieldError>>()
            .map(RawValue::Rational),
        FieldType::SRational => (0..count)
            .map(|i| -> Result<SRational, FieldError> {
                Ok(SRational {
                    numerator: values.u32_at(i * 8)? as i32,
                    denominator: values.u32_at(i * 8 + 4)? as i32,
                })
            })
            .collect::<Result<Vec<_>, FieldError>>()
            .map(RawValue::SRational),
        _ => Err(FieldError::UnexpectedType {
            tag: spec.name,
            found: entry.field_type,
        }),
    }
}

/// Decode an ASCII value, dropping the NUL terminator and trailing padding.
///
/// Bytes after the first NUL are ignored. Non-UTF-8 content is rejected.
fn decode_ascii(bytes: &[u8], tag: &'static str) -> Result<String, FieldError> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text = std::str::from_utf8(&bytes[..end]).map_err(|_| FieldError::InvalidText(tag))?;
    Ok(text.trim_end().to_string())
}

// =============================================================================
// Tests
// =============================================================================
