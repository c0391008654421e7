//! # exif-probe
//!
//! Extracts capture time, camera and exposure metadata from JPEG files by
//! reading the embedded Exif block directly.
//!
//! Only the leading bytes of a file are needed: the Exif block sits in an
//! APP1 segment ahead of the compressed image data. The parser works on a
//! borrowed byte buffer, never allocates more than the values it returns,
//! and never panics on malformed input.
//!
//! ## Features
//!
//! - **Bounded parsing**: every offset and length is checked before it is read
//! - **Graceful degradation**: a damaged value only drops its own field
//! - **Both byte orders**: little-endian (`II`) and big-endian (`MM`) payloads
//! - **Batch probing**: async prefix reads with bounded concurrency
//!
//! ## Architecture
//!
//! - [`io`] - Bounded byte cursor and prefix sources
//! - [`mod@format`] - JPEG segment scanner, Exif directory decoder, media type detection
//! - [`metadata`] - Assembly of decoded tags into [`PhotoMetadata`]
//! - [`probe`] - Concurrent probing of many files
//! - [`config`] - CLI configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use exif_probe::extract_metadata;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! if let Some(metadata) = extract_metadata(&bytes) {
//!     if let Some(captured_at) = metadata.captured_at {
//!         println!("Taken at {}", captured_at);
//!     }
//!     println!("{:?}", metadata.camera_model);
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod metadata;
pub mod probe;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use error::{
    CursorError, ExifError, FieldError, FormatError, IoError, MetadataError, ScanError,
};
pub use format::exif::{decode, ByteOrder, DecodedTags, ExifHeader, FieldType, RawValue};
pub use format::{detect_media_type, is_jpeg_header, scan, MediaType, PayloadRange};
pub use io::{ByteCursor, FileSource, MemorySource, PrefixSource, DEFAULT_PREFIX_BYTES};
pub use metadata::{assemble, extract_metadata, try_extract_metadata, PhotoMetadata};
pub use probe::{ProbeOutcome, ProbeReport, ProbeService, ProbeSummary, DEFAULT_CONCURRENCY};
