//! Media type detection.
//!
//! Decides whether a file is handed to the Exif parser at all. Only JPEG
//! is supported; anything else is reported as unsupported and treated by
//! callers exactly like a file without metadata.
//!
//! Detection order:
//!
//! 1. A declared MIME type, when the caller has one, is authoritative
//! 2. Otherwise the file extension
//! 3. Otherwise the leading bytes (SOI marker)

use std::path::Path;

use crate::error::FormatError;

use super::jpeg::is_jpeg_header;

// =============================================================================
// MediaType
// =============================================================================

/// Media types the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// JPEG / JFIF / Exif JPEG
    Jpeg,
}

impl MediaType {
    /// Get a human-readable name for the media type.
    pub const fn name(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "JPEG",
        }
    }

    /// Canonical MIME type.
    pub const fn mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
        }
    }

    /// Match a MIME type, ignoring case and parameters.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(MediaType::Jpeg),
            _ => None,
        }
    }

    /// Match a file extension, without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" | "jfif" => Some(MediaType::Jpeg),
            _ => None,
        }
    }

    /// Match the extension of a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Match the leading bytes of a file.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if is_jpeg_header(bytes) {
            Some(MediaType::Jpeg)
        } else {
            None
        }
    }
}

/// Resolve the media type of a file.
///
/// # Arguments
/// * `declared` - MIME type supplied by the caller, if any
/// * `path` - File path, used for its extension
/// * `prefix` - Leading bytes of the file
///
/// # Errors
/// `UnsupportedFormat` if the declared type is not JPEG, or if neither the
/// extension nor the leading bytes identify a JPEG.
pub fn detect_media_type(
    declared: Option<&str>,
    path: Option<&Path>,
    prefix: &[u8],
) -> Result<MediaType, FormatError> {
    if let Some(mime) = declared {
        return MediaType::from_mime(mime).ok_or_else(|| FormatError::UnsupportedFormat {
            reason: format!(
                "media type {mime} is not supported, expected {}",
                MediaType::Jpeg.mime()
            ),
        });
    }

    if let Some(media_type) = path.and_then(MediaType::from_path) {
        return Ok(media_type);
    }

    MediaType::sniff(prefix).ok_or_else(|| FormatError::UnsupportedFormat {
        reason: format!("not a {} file", MediaType::Jpeg.name()),
    })
}

// =============================================================================
// Tests
// =============================================================================
