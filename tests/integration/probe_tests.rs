//! Probe service tests against real files.
//!
//! Tests verify:
//! - Files on disk are read and parsed
//! - Missing and unsupported files are reported, not fatal
//! - Only the configured prefix is read
//! - Batch results keep input order

use std::io::Write;
use std::path::Path;

use tempfile::TempDir;

use exif_probe::{FileSource, ProbeOutcome, ProbeService, ProbeSummary};

use super::test_utils::{camera_exif, date_only_exif, ByteOrderType};

fn write_file(dir: &Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

#[tokio::test]
async fn test_probe_file_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "IMG_0001.JPG",
        &camera_exif(ByteOrderType::BigEndian).build_jpeg(),
    );

    let service = ProbeService::new();
    let report = service.probe(&FileSource::new(&path), None).await;

    let metadata = report.metadata().expect("metadata");
    assert_eq!(metadata.camera_model.as_deref(), Some("Canon EOS R5"));
    assert_eq!(report.source, path.display().to_string());
}

#[tokio::test]
async fn test_missing_file_is_an_error_report() {
    let dir = TempDir::new().unwrap();
    let service = ProbeService::new();
    let report = service
        .probe(&FileSource::new(dir.path().join("missing.jpg")), None)
        .await;

    match report.outcome {
        ProbeOutcome::Error { message } => assert!(message.contains("not found")),
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unsupported_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "scan.png", b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR");

    let report = ProbeService::new()
        .probe(&FileSource::new(&path), None)
        .await;
    assert!(matches!(report.outcome, ProbeOutcome::Unsupported { .. }));
    assert!(report.metadata().is_none());
}

#[tokio::test]
async fn test_jpeg_without_extension_is_sniffed() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "upload",
        &date_only_exif(ByteOrderType::LittleEndian).build_jpeg(),
    );

    let report = ProbeService::new()
        .probe(&FileSource::new(&path), None)
        .await;
    assert!(report.metadata().unwrap().captured_at.is_some());
}

#[tokio::test]
async fn test_prefix_limit_is_honoured() {
    let dir = TempDir::new().unwrap();
    let jpeg = camera_exif(ByteOrderType::LittleEndian).build_jpeg();
    let path = write_file(dir.path(), "big.jpg", &jpeg);

    // Enough for SOI and APP0 but not the whole Exif segment
    let service = ProbeService::with_limits(40, 1);
    let report = service.probe(&FileSource::new(&path), None).await;
    assert!(matches!(report.outcome, ProbeOutcome::NoMetadata { .. }));

    let service = ProbeService::with_limits(jpeg.len(), 1);
    let report = service.probe(&FileSource::new(&path), None).await;
    assert!(report.metadata().is_some());
}

#[tokio::test]
async fn test_probe_all_files() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_file(
            dir.path(),
            "a.jpg",
            &camera_exif(ByteOrderType::LittleEndian).build_jpeg(),
        ),
        write_file(dir.path(), "b.txt", b"hello"),
        dir.path().join("c.jpg"),
        write_file(dir.path(), "d.jpg", &[0xFF, 0xD8, 0xFF, 0xD9]),
    ];

    let service = ProbeService::with_limits(64 * 1024, 2);
    let sources: Vec<FileSource> = paths.iter().map(FileSource::new).collect();
    let reports = service.probe_all(sources, None).await;

    assert_eq!(reports.len(), 4);
    for (report, path) in reports.iter().zip(&paths) {
        assert_eq!(report.source, path.display().to_string());
    }
    assert!(reports[0].metadata().is_some());
    assert!(matches!(reports[1].outcome, ProbeOutcome::Unsupported { .. }));
    assert!(matches!(reports[2].outcome, ProbeOutcome::Error { .. }));
    assert!(matches!(reports[3].outcome, ProbeOutcome::NoMetadata { .. }));

    let summary = ProbeSummary::from_reports(&reports);
    assert_eq!(
        summary,
        ProbeSummary {
            found: 1,
            no_metadata: 1,
            unsupported: 1,
            errors: 1
        }
    );
}

#[tokio::test]
async fn test_declared_mime_applies_to_all() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "photo.dat",
        &camera_exif(ByteOrderType::LittleEndian).build_jpeg(),
    );

    let service = ProbeService::new();
    let reports = service
        .probe_all(vec![FileSource::new(&path)], Some("image/jpeg".to_string()))
        .await;
    assert!(reports[0].metadata().is_some());

    let reports = service
        .probe_all(vec![FileSource::new(&path)], Some("image/heic".to_string()))
        .await;
    assert!(matches!(reports[0].outcome, ProbeOutcome::Unsupported { .. }));
}
