use serde::Serialize;

use crate::metadata::PhotoMetadata;

/// What probing a single file produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The Exif block was readable. The record may still be empty.
    Found { metadata: PhotoMetadata },

    /// A JPEG without a usable Exif block
    NoMetadata { reason: String },

    /// Not a supported container; never parsed
    Unsupported { reason: String },

    /// The file could not be read
    Error { message: String },
}

/// Result of probing one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    /// Source identifier (file path)
    pub source: String,

    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

impl ProbeReport {
    pub fn new(source: impl Into<String>, outcome: ProbeOutcome) -> Self {
        Self {
            source: source.into(),
            outcome,
        }
    }

    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            source,
            ProbeOutcome::Error {
                message: message.into(),
            },
        )
    }

    /// Extracted metadata, if the Exif block was readable.
    pub fn metadata(&self) -> Option<&PhotoMetadata> {
        match &self.outcome {
            ProbeOutcome::Found { metadata } => Some(metadata),
            _ => None,
        }
    }
}

/// Counts of outcomes across a batch of reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProbeSummary {
    pub found: usize,
    pub no_metadata: usize,
    pub unsupported: usize,
    pub errors: usize,
}

impl ProbeSummary {
    pub fn from_reports(reports: &[ProbeReport]) -> Self {
        reports
            .iter()
            .fold(ProbeSummary::default(), |mut summary, report| {
                match report.outcome {
                    ProbeOutcome::Found { .. } => summary.found += 1,
                    ProbeOutcome::NoMetadata { .. } => summary.no_metadata += 1,
                    ProbeOutcome::Unsupported { .. } => summary.unsupported += 1,
                    ProbeOutcome::Error { .. } => summary.errors += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.found + self.no_metadata + self.unsupported + self.errors
    }
}
