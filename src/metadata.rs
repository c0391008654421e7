//! Photo metadata extraction.
//!
//! Ties the layers together: [`scan`] finds the Exif payload, [`decode`]
//! reads the tag directory, [`assemble`] turns raw values into the fields
//! an application displays.
//!
//! Extraction never fails hard. A damaged container or directory yields
//! `None`; a damaged value only leaves its field empty.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::Serialize;
use tracing::debug;

use crate::error::MetadataError;
use crate::format::exif::{decode, DecodedTags, Field, RawValue, Rational, SRational, TAG_TABLE};
use crate::format::jpeg::scan;

// =============================================================================
// PhotoMetadata
// =============================================================================

/// Display metadata extracted from a photo.
///
/// Every field is independent: presence of one never implies another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhotoMetadata {
    /// Capture time, interpreted in the local timezone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Local>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,

    /// e.g. "1/250" or "2.5"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<String>,

    /// e.g. "+0.7 EV" or "-1 EV"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_bias: Option<String>,

    /// e.g. "f/2.8"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<String>,

    /// e.g. "50 mm"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens_model: Option<String>,
}

impl PhotoMetadata {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == PhotoMetadata::default()
    }

    fn is_set(&self, field: Field) -> bool {
        match field {
            Field::CapturedAt => self.captured_at.is_some(),
            Field::CameraMake => self.camera_make.is_some(),
            Field::CameraModel => self.camera_model.is_some(),
            Field::ExposureTime => self.exposure_time.is_some(),
            Field::ExposureBias => self.exposure_bias.is_some(),
            Field::Aperture => self.aperture.is_some(),
            Field::Iso => self.iso.is_some(),
            Field::FocalLength => self.focal_length.is_some(),
            Field::LensModel => self.lens_model.is_some(),
            Field::ExifIfd => true,
        }
    }
}

// =============================================================================
// Extraction
// =============================================================================

/// Extract display metadata from the leading bytes of a JPEG file.
///
/// Returns `None` when the buffer is not a JPEG, has no Exif segment, or
/// the Exif directory is damaged. A structurally valid payload without any
/// of the extracted tags yields an empty record.
pub fn extract_metadata(buffer: &[u8]) -> Option<PhotoMetadata> {
    match try_extract_metadata(buffer) {
        Ok(metadata) => Some(metadata),
        Err(err) => {
            debug!(error = %err, "no metadata");
            None
        }
    }
}

/// Like [`extract_metadata`], but reports why nothing was found.
pub fn try_extract_metadata(buffer: &[u8]) -> Result<PhotoMetadata, MetadataError> {
    let range = scan(buffer)?;
    let decoded = decode(range.slice(buffer))?;

    for failure in decoded.failures() {
        debug!(tag = failure.tag, error = %failure.error, "dropped field");
    }

    Ok(assemble(&decoded))
}

// =============================================================================
// Assembly
// =============================================================================

/// Convert decoded tag values into the output record.
///
/// Rows of the tag table are applied in order; a field already filled by an
/// earlier row is not overwritten, and a value that does not convert leaves
/// the field for later rows.
pub fn assemble(decoded: &DecodedTags) -> PhotoMetadata {
    let mut metadata = PhotoMetadata::default();

    for spec in TAG_TABLE {
        if metadata.is_set(spec.field) {
            continue;
        }
        let Some(value) = decoded.get(spec.tag) else {
            continue;
        };

        match spec.field {
            Field::CapturedAt => {
                metadata.captured_at = value.as_str().and_then(parse_date_time);
            }
            Field::CameraMake => metadata.camera_make = text(value),
            Field::CameraModel => metadata.camera_model = text(value),
            Field::LensModel => metadata.lens_model = text(value),
            Field::ExposureTime => {
                metadata.exposure_time = value.first_rational().and_then(format_exposure);
            }
            Field::ExposureBias => {
                metadata.exposure_bias = value.first_srational().and_then(format_exposure_bias);
            }
            Field::Aperture => {
                metadata.aperture = value
                    .first_rational()
                    .and_then(format_decimal)
                    .map(|f| format!("f/{f}"));
            }
            Field::FocalLength => {
                metadata.focal_length = value
                    .first_rational()
                    .and_then(format_decimal)
                    .map(|mm| format!("{mm} mm"));
            }
            Field::Iso => metadata.iso = value.first_u32().map(|iso| iso.to_string()),
            Field::ExifIfd => {}
        }
    }

    metadata
}

fn text(value: &RawValue) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse an Exif date-time ("YYYY:MM:DD HH:MM:SS") as local time.
///
/// The shape must match exactly, every component must be digits, and the
/// result must be a real calendar date and time. Local times that fall in a
/// DST gap yield `None`; ambiguous ones resolve to the earlier instant.
pub fn parse_date_time(s: &str) -> Option<DateTime<Local>> {
    let bytes = s.as_bytes();
    if bytes.len() != 19 {
        return None;
    }

    let separators = [(4, b':'), (7, b':'), (10, b' '), (13, b':'), (16, b':')];
    if separators.iter().any(|&(i, sep)| bytes[i] != sep) {
        return None;
    }

    let number = |range: std::ops::Range<usize>| -> Option<u32> {
        bytes[range].iter().try_fold(0u32, |acc, &b| {
            b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
        })
    };

    let year = number(0..4)? as i32;
    let month = number(5..7)?;
    let day = number(8..10)?;
    let hour = number(11..13)?;
    let minute = number(14..16)?;
    let second = number(17..19)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    Local.from_local_datetime(&naive).earliest()
}

/// Exposure time in seconds: "1/250" below one second, decimal otherwise.
fn format_exposure(r: Rational) -> Option<String> {
    if r.denominator == 0 {
        return None;
    }
    if r.numerator != 0 && r.numerator < r.denominator {
        let g = gcd(r.numerator, r.denominator);
        let (n, d) = (r.numerator / g, r.denominator / g);
        if n == 1 {
            return Some(format!("1/{d}"));
        }
        // Non-unit fractions are shown as 1/x with x to one decimal place
        let reciprocal = d as f64 / n as f64;
        return Some(format!("1/{}", trim_decimal(reciprocal)));
    }
    format_decimal(r)
}

/// Exposure compensation in EV, signed: "+0.7 EV", "-1 EV", "0 EV".
fn format_exposure_bias(r: SRational) -> Option<String> {
    if r.denominator == 0 {
        return None;
    }
    let ev = f64::from(r.numerator) / f64::from(r.denominator);
    let text = trim_decimal(ev);
    Some(match text.as_str() {
        "0" | "-0" => "0 EV".to_string(),
        _ if ev > 0.0 => format!("+{text} EV"),
        _ => format!("{text} EV"),
    })
}

/// A rational as a decimal with at most one fractional digit: 28/10 -> "2.8".
fn format_decimal(r: Rational) -> Option<String> {
    if r.denominator == 0 {
        return None;
    }
    Some(trim_decimal(r.numerator as f64 / r.denominator as f64))
}

fn trim_decimal(value: f64) -> String {
    let s = format!("{value:.1}");
    match s.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

// =============================================================================
// Tests
// =============================================================================
