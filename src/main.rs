//! exif-probe - Extract capture metadata from JPEG photos.
//!
//! This binary parses the command line, probes every path and prints the
//! reports as text or JSON.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exif_probe::{
    config::{Config, OutputFormat},
    FileSource, PhotoMetadata, ProbeOutcome, ProbeReport, ProbeService, ProbeSummary,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!(
        files = config.paths.len(),
        prefix_bytes = config.prefix_bytes,
        concurrency = config.concurrency,
        "probing"
    );

    let service = ProbeService::with_limits(config.prefix_bytes, config.concurrency);
    let sources: Vec<FileSource> = config.paths.iter().cloned().map(FileSource::new).collect();
    let reports = service
        .probe_all(sources, config.declared_mime().map(str::to_string))
        .await;

    let summary = ProbeSummary::from_reports(&reports);

    match config.format {
        OutputFormat::Text => print_text(&reports),
        OutputFormat::Json => {
            if let Err(e) = print_json(&reports, &summary) {
                error!("Failed to write JSON output: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    info!(
        files = summary.total(),
        found = summary.found,
        no_metadata = summary.no_metadata,
        unsupported = summary.unsupported,
        errors = summary.errors,
        "done"
    );

    if summary.errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so that stdout carries only the reports.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "exif_probe=debug"
    } else {
        "exif_probe=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Output
// =============================================================================

fn print_text(reports: &[ProbeReport]) {
    for report in reports {
        println!("{}", report.source);
        match &report.outcome {
            ProbeOutcome::Found { metadata } if metadata.is_empty() => {
                println!("  (no tags of interest)");
            }
            ProbeOutcome::Found { metadata } => print_metadata(metadata),
            ProbeOutcome::NoMetadata { reason } => println!("  no metadata: {}", reason),
            ProbeOutcome::Unsupported { reason } => println!("  skipped: {}", reason),
            ProbeOutcome::Error { message } => println!("  error: {}", message),
        }
    }
}

fn print_metadata(metadata: &PhotoMetadata) {
    if let Some(captured_at) = &metadata.captured_at {
        println!("  Captured:      {}", captured_at.to_rfc3339());
    }
    let lines = [
        ("Camera make", &metadata.camera_make),
        ("Camera model", &metadata.camera_model),
        ("Lens", &metadata.lens_model),
        ("Exposure", &metadata.exposure_time),
        ("Exposure bias", &metadata.exposure_bias),
        ("Aperture", &metadata.aperture),
        ("ISO", &metadata.iso),
        ("Focal length", &metadata.focal_length),
    ];
    for (label, value) in lines {
        if let Some(value) = value {
            println!("  {:<14} {}", format!("{}:", label), value);
        }
    }
}

fn print_json(reports: &[ProbeReport], summary: &ProbeSummary) -> serde_json::Result<()> {
    let document = serde_json::json!({
        "reports": reports,
        "summary": summary,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
