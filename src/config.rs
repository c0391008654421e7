//! Configuration management for exif-probe.
//!
//! This module provides the command-line configuration:
//! - Command-line arguments via clap
//! - Environment variables with `EXIF_PROBE_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use exif_probe::config::Config;
//!
//! let config = Config::parse();
//! println!("Probing {} file(s)", config.paths.len());
//! ```
//!
//! # Environment Variables
//!
//! - `EXIF_PROBE_PREFIX_BYTES` - Bytes read from the start of each file (default: 65536)
//! - `EXIF_PROBE_CONCURRENCY` - Files probed at once (default: 8)
//! - `EXIF_PROBE_MIME` - Declared media type applied to every file
//! - `EXIF_PROBE_FORMAT` - Output format, `text` or `json` (default: text)

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::io::DEFAULT_PREFIX_BYTES;
use crate::probe::DEFAULT_CONCURRENCY;

// =============================================================================
// Default Values
// =============================================================================

/// Smallest useful prefix: SOI plus one segment header.
pub const MIN_PREFIX_BYTES: usize = 6;

/// Largest prefix read from a file (16 MiB).
pub const MAX_PREFIX_BYTES: usize = 16 * 1024 * 1024;

/// Upper bound on concurrently probed files.
pub const MAX_CONCURRENCY: usize = 1024;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Output format for probe results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One block of human-readable lines per file
    #[default]
    Text,
    /// One JSON document with every report
    Json,
}

/// exif-probe - Extract capture metadata from JPEG photos.
///
/// Reads a bounded prefix of each file and prints the capture time, camera
/// and exposure settings found in its Exif block.
#[derive(Parser, Debug, Clone)]
#[command(name = "exif-probe")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Files to probe.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Number of bytes read from the start of each file.
    ///
    /// The Exif block lives near the start of a JPEG, so the whole file is
    /// never needed.
    #[arg(long, default_value_t = DEFAULT_PREFIX_BYTES, env = "EXIF_PROBE_PREFIX_BYTES")]
    pub prefix_bytes: usize,

    /// Maximum number of files probed at once.
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY, env = "EXIF_PROBE_CONCURRENCY")]
    pub concurrency: usize,

    /// Declared media type for every file (e.g. image/jpeg).
    ///
    /// When set, the extension and leading bytes are not consulted.
    #[arg(long, env = "EXIF_PROBE_MIME")]
    pub mime: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, env = "EXIF_PROBE_FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.paths.is_empty() {
            return Err("At least one path is required".to_string());
        }

        if self.prefix_bytes < MIN_PREFIX_BYTES || self.prefix_bytes > MAX_PREFIX_BYTES {
            return Err(format!(
                "prefix_bytes must be between {} and {}",
                MIN_PREFIX_BYTES, MAX_PREFIX_BYTES
            ));
        }

        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(format!(
                "concurrency must be between 1 and {}",
                MAX_CONCURRENCY
            ));
        }

        if let Some(mime) = &self.mime {
            if mime.trim().is_empty() {
                return Err("mime must not be empty. Unset --mime or EXIF_PROBE_MIME".to_string());
            }
        }

        Ok(())
    }

    /// Declared media type, if one was given.
    pub fn declared_mime(&self) -> Option<&str> {
        self.mime.as_deref().map(str::trim)
    }
}

// =============================================================================
// Tests
// =============================================================================
