//! Exif payload decoder.
//!
//! An Exif APP1 payload is a small TIFF file prefixed by `Exif\0\0`.
//!
//! # Key Concepts
//!
//! - **Byte order**: the TIFF header declares its endianness (II = little-endian,
//!   MM = big-endian). Every multi-byte value after it uses that order.
//!
//! - **Base offset**: all offsets inside the payload are measured from the
//!   start of the TIFF header, immediately after the signature.
//!
//! - **IFD (Image File Directory)**: a count followed by 12-byte entries.
//!   IFD0 describes the main image and may link an Exif sub-directory that
//!   holds the exposure fields.
//!
//! - **Inline vs offset values**: values of at most 4 bytes are stored in the
//!   entry itself, larger ones at an offset pointed to by the entry.

mod directory;
mod header;
mod tags;
mod values;

pub use directory::{
    decode, DecodedTags, DirectoryEntry, TagFailure, IFD_COUNT_SIZE, IFD_ENTRY_SIZE,
};
pub use header::{tiff_region, ByteOrder, ExifHeader, EXIF_SIGNATURE, TIFF_HEADER_SIZE};
pub use tags::{lookup, tag, Count, Field, FieldType, TagSpec, DATE_TIME_LENGTH, TAG_TABLE};
pub use values::{read_value, RawValue, Rational, SRational};
