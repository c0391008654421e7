//! Tag directory (IFD) walking.
//!
//! # Directory Structure
//!
//! ```text
//! Bytes 0-1: Entry count (N)
//! Bytes 2..2+12N: Entries
//!
//! Entry:
//!   Bytes 0-1:  Tag id
//!   Bytes 2-3:  Field type
//!   Bytes 4-7:  Value count
//!   Bytes 8-11: Value (if it fits) or offset to value
//! ```
//!
//! Reading the count or any entry window out of bounds is structural and
//! aborts the walk. Decoding a single value is not: a bad value only drops
//! that tag and is recorded in [`DecodedTags::failures`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::error::{CursorError, ExifError, FieldError};
use crate::io::ByteCursor;

use super::header::{tiff_region, ExifHeader, TIFF_HEADER_SIZE};
use super::tags::{self, tag};
use super::values::{read_value, RawValue};

/// Size of a directory entry in bytes.
pub const IFD_ENTRY_SIZE: usize = 12;

/// Size of the entry count field at the start of a directory.
pub const IFD_COUNT_SIZE: usize = 2;

// =============================================================================
// DirectoryEntry
// =============================================================================

/// A single 12-byte directory entry.
///
/// `value_bytes` are kept raw: whether they hold the value or an offset
/// depends on the field type and count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    pub value_bytes: [u8; 4],
}

impl DirectoryEntry {
    /// Read an entry at the cursor position and advance past it.
    ///
    /// The whole 12-byte window is checked before any field is read.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, CursorError> {
        let start = cursor.position();
        cursor.bytes_at(start, IFD_ENTRY_SIZE)?;

        let tag = cursor.read_u16()?;
        let field_type = cursor.read_u16()?;
        let count = cursor.read_u32()?;
        let value_bytes = cursor.array_at::<4>(cursor.position())?;
        cursor.skip(4)?;

        Ok(DirectoryEntry {
            tag,
            field_type,
            count,
            value_bytes,
        })
    }
}

// =============================================================================
// DecodedTags
// =============================================================================

/// A tag whose value could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFailure {
    pub tag: u16,
    pub error: FieldError,
}

/// Values of the tags of interest found in the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedTags {
    values: BTreeMap<u16, RawValue>,
    failures: Vec<TagFailure>,
}

impl DecodedTags {
    pub fn get(&self, tag: u16) -> Option<&RawValue> {
        self.values.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Decoded values by tag id, in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &RawValue)> {
        self.values.iter().map(|(&tag, value)| (tag, value))
    }

    /// Tags that were present but dropped, in the order they were met.
    pub fn failures(&self) -> &[TagFailure] {
        &self.failures
    }

    pub fn insert(&mut self, tag: u16, value: RawValue) {
        self.values.insert(tag, value);
    }

    fn record_failure(&mut self, tag: u16, error: FieldError) {
        self.failures.push(TagFailure { tag, error });
    }

    /// Add values from another directory without overwriting existing ones.
    fn merge_missing(&mut self, other: DecodedTags) {
        for (tag, value) in other.values {
            self.values.entry(tag).or_insert(value);
        }
        self.failures.extend(other.failures);
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode the tags of interest from an Exif APP1 payload.
///
/// `payload` starts at the `Exif\0\0` signature. IFD0 is walked first; if it
/// links an Exif sub-directory, that directory is walked too and fills in
/// any field IFD0 did not provide.
///
/// # Errors
/// Any structural problem in the header or IFD0 (see [`ExifError`]).
/// Problems in individual values or in the sub-directory are recorded in
/// [`DecodedTags::failures`] instead.
pub fn decode(payload: &[u8]) -> Result<DecodedTags, ExifError> {
    let header = ExifHeader::parse(payload)?;
    let tiff = ByteCursor::new(tiff_region(payload), header.byte_order);

    let mut decoded = DecodedTags::default();
    read_directory(&tiff, header.first_ifd_offset, &mut decoded)?;

    let link = decoded
        .get(tag::EXIF_IFD_POINTER)
        .and_then(RawValue::first_u32);

    if let Some(offset) = link {
        let mut sub = DecodedTags::default();
        let result = check_ifd_offset(offset, tiff.len())
            .and_then(|_| read_directory(&tiff, offset, &mut sub));

        match result {
            Ok(()) => {
                // A pointer inside the sub-directory is never followed
                sub.values.remove(&tag::EXIF_IFD_POINTER);
                decoded.merge_missing(sub);
            }
            Err(err) => {
                debug!(offset, error = %err, "skipping unreadable Exif sub-directory");
                decoded.record_failure(tag::EXIF_IFD_POINTER, FieldError::SubDirectory(err));
            }
        }
    }

    Ok(decoded)
}

/// Walk one directory, decoding entries whose tag is in the tag table.
fn read_directory(
    tiff: &ByteCursor<'_>,
    offset: u32,
    decoded: &mut DecodedTags,
) -> Result<(), ExifError> {
    let mut cursor = *tiff;
    cursor.seek(offset as usize)?;

    let entry_count = cursor.read_u16()?;
    trace!(offset, entry_count, "reading directory");

    // Later copies of a tag are ignored even when the first copy is damaged
    let mut seen = BTreeSet::new();

    for _ in 0..entry_count {
        let entry = DirectoryEntry::read(&mut cursor)?;

        let Some(spec) = tags::lookup(entry.tag) else {
            continue;
        };
        if !seen.insert(entry.tag) {
            continue;
        }

        match read_value(tiff, &entry, spec) {
            Ok(value) => decoded.insert(entry.tag, value),
            Err(err) => {
                trace!(tag = spec.name, error = %err, "dropping tag");
                decoded.record_failure(entry.tag, err);
            }
        }
    }

    Ok(())
}

fn check_ifd_offset(offset: u32, tiff_len: usize) -> Result<(), ExifError> {
    let start = offset as usize;
    if start < TIFF_HEADER_SIZE || start.saturating_add(IFD_COUNT_SIZE) > tiff_len {
        return Err(ExifError::InvalidIfdOffset(offset));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
