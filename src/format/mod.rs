//! Container and metadata parsers.
//!
//! - [`jpeg`]: walks JPEG segments to find the Exif APP1 payload
//! - [`exif`]: decodes the TIFF-style tag directory inside that payload
//! - [`detect`]: decides whether a file is a supported container at all

pub mod detect;
pub mod exif;
pub mod jpeg;

pub use detect::{detect_media_type, MediaType};
pub use jpeg::{is_jpeg_header, scan, PayloadRange};
