//! Probe service for extracting metadata from many files.
//!
//! The parser is synchronous and CPU-only. The service does the parts a
//! caller is responsible for:
//!
//! 1. Bound how many files are in flight (semaphore)
//! 2. Read a bounded prefix of each file
//! 3. Decide whether the file is a supported container
//! 4. Run the parse on the blocking pool
//!
//! ```text
//! sources ──► [permit] ──► read_prefix ──► detect_media_type ──► spawn_blocking(parse)
//! ```

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::IoError;
use crate::format::detect_media_type;
use crate::io::{PrefixSource, DEFAULT_PREFIX_BYTES};
use crate::metadata::try_extract_metadata;

use super::report::{ProbeOutcome, ProbeReport};

/// Default number of files probed concurrently.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Service that probes sources for photo metadata with bounded parallelism.
///
/// Cloning is cheap and clones share the same concurrency limit.
#[derive(Debug, Clone)]
pub struct ProbeService {
    prefix_bytes: usize,
    semaphore: Arc<Semaphore>,
}

impl ProbeService {
    /// Create a service with the default prefix size and concurrency.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_PREFIX_BYTES, DEFAULT_CONCURRENCY)
    }

    /// Create a service with explicit limits.
    ///
    /// A concurrency of 0 is raised to 1.
    pub fn with_limits(prefix_bytes: usize, concurrency: usize) -> Self {
        Self {
            prefix_bytes,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Number of leading bytes read from each source.
    pub fn prefix_bytes(&self) -> usize {
        self.prefix_bytes
    }

    /// Probe one source.
    ///
    /// `declared` is the caller's MIME type for the source, if it has one;
    /// otherwise the identifier's extension and the leading bytes decide.
    pub async fn probe<S>(&self, source: &S, declared: Option<&str>) -> ProbeReport
    where
        S: PrefixSource + ?Sized,
    {
        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(e) => return ProbeReport::error(source.identifier().to_string(), e.to_string()),
        };

        self.probe_with_permit(source, declared).await
    }

    /// Probe one source; the caller already holds a permit.
    async fn probe_with_permit<S>(&self, source: &S, declared: Option<&str>) -> ProbeReport
    where
        S: PrefixSource + ?Sized,
    {
        let id = source.identifier().to_string();

        let prefix = match source.read_prefix(self.prefix_bytes).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(source = %id, error = %e, "failed to read file");
                return ProbeReport::error(id, e.to_string());
            }
        };

        let media_type = match detect_media_type(declared, Some(Path::new(&id)), &prefix) {
            Ok(media_type) => media_type,
            Err(e) => {
                debug!(source = %id, error = %e, "skipping unsupported file");
                return ProbeReport::new(
                    id,
                    ProbeOutcome::Unsupported {
                        reason: e.to_string(),
                    },
                );
            }
        };
        debug!(source = %id, media_type = media_type.name(), bytes = prefix.len(), "parsing");

        let parsed = tokio::task::spawn_blocking(move || try_extract_metadata(&prefix)).await;

        let outcome = match parsed {
            Ok(Ok(metadata)) => ProbeOutcome::Found { metadata },
            Ok(Err(e)) => {
                debug!(source = %id, error = %e, "no metadata");
                ProbeOutcome::NoMetadata {
                    reason: e.to_string(),
                }
            }
            Err(e) => ProbeOutcome::Error {
                message: IoError::Task(e.to_string()).to_string(),
            },
        };

        ProbeReport::new(id, outcome)
    }

    /// Probe many sources concurrently.
    ///
    /// Reports are returned in the order of `sources`. A task is spawned only
    /// once it holds a permit, so at most the configured number of tasks
    /// exist at any one time.
    pub async fn probe_all<S>(&self, sources: Vec<S>, declared: Option<String>) -> Vec<ProbeReport>
    where
        S: PrefixSource + 'static,
    {
        let mut pending = Vec::with_capacity(sources.len());

        for source in sources {
            let id = source.identifier().to_string();
            let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    pending.push(Pending::Done(ProbeReport::error(id, e.to_string())));
                    continue;
                }
            };

            let service = self.clone();
            let declared = declared.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit;
                service
                    .probe_with_permit(&source, declared.as_deref())
                    .await
            });
            pending.push(Pending::Running(id, handle));
        }

        let mut reports = Vec::with_capacity(pending.len());
        for entry in pending {
            match entry {
                Pending::Done(report) => reports.push(report),
                Pending::Running(id, handle) => match handle.await {
                    Ok(report) => reports.push(report),
                    Err(e) => {
                        warn!(source = %id, error = %e, "probe task failed");
                        let message = IoError::Task(e.to_string()).to_string();
                        reports.push(ProbeReport::error(id, message));
                    }
                },
            }
        }
        reports
    }
}

/// A batch slot: either a spawned task or a report settled without one.
enum Pending {
    Running(String, JoinHandle<ProbeReport>),
    Done(ProbeReport),
}

impl Default for ProbeService {
    fn default() -> Self {
        Self::new()
    }
}
