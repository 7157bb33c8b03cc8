//! End-to-end tests for the conversion gateway, driven against stub
//! converter executables written into a temp directory.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use fileforge_core::config::GatewayConfig;
use fileforge_core::config::converter::ConverterConfig;
use fileforge_core::config::upload::UploadConfig;
use fileforge_gateway::{ConversionGateway, GatewayError, UploadedPayload};

const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Write an executable shell script and return its path.
fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}

/// A converter that copies its input to `out_dir` and prints the path.
fn copying_converter(dir: &Path, out_dir: &Path) -> PathBuf {
    script(
        dir,
        "convert.sh",
        &format!(
            "out='{}'/converted.\"$2\"\ncp \"$1\" \"$out\"\necho \"$out\"",
            out_dir.display()
        ),
    )
}

fn gateway(converter: &Path, staging_dir: &Path) -> ConversionGateway {
    gateway_with(converter, staging_dir, |_| {})
}

fn gateway_with(
    converter: &Path,
    staging_dir: &Path,
    tweak: impl FnOnce(&mut GatewayConfig),
) -> ConversionGateway {
    let mut config = GatewayConfig {
        converter: ConverterConfig {
            path: converter.to_path_buf(),
            staging_dir: Some(staging_dir.to_path_buf()),
            ..Default::default()
        },
        ..Default::default()
    };
    tweak(&mut config);
    ConversionGateway::new(&config).expect("gateway")
}

fn png_payload() -> UploadedPayload {
    UploadedPayload::new(PNG_MAGIC.to_vec(), "photo.png", "image/png")
}

fn staging_is_empty(staging_dir: &Path) -> bool {
    match std::fs::read_dir(staging_dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}

#[tokio::test]
async fn png_declared_as_image_converts_end_to_end() {
    let temp = tempfile::tempdir().expect("tempdir");
    let staging = temp.path().join("staging");
    let out_dir = temp.path().join("out");
    std::fs::create_dir_all(&out_dir).expect("mkdir");

    let gateway = gateway(&copying_converter(temp.path(), &out_dir), &staging);
    let artifact = gateway
        .convert(png_payload(), "image", "jpeg")
        .await
        .expect("convert");

    // The artifact is the converter's output, readable until release
    assert_eq!(std::fs::read(artifact.path()).expect("read"), PNG_MAGIC);
    assert!(staging_is_empty(&staging), "staging must be clean after success");

    let artifact_path = artifact.path().to_path_buf();
    artifact.release().await.expect("release");
    assert!(!artifact_path.exists(), "release must delete the artifact");
}

#[tokio::test]
async fn png_declared_as_document_is_rejected_without_conversion() {
    let temp = tempfile::tempdir().expect("tempdir");
    let staging = temp.path().join("staging");
    let marker = temp.path().join("ran");
    let converter = script(
        temp.path(),
        "convert.sh",
        &format!("touch '{}'\nexit 0", marker.display()),
    );

    let gateway = gateway(&converter, &staging);
    let err = gateway
        .convert(png_payload(), "document", "pdf")
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(matches!(err, GatewayError::CategoryMismatch { .. }));
    assert!(message.contains("image/png"));
    assert!(message.contains("document"));
    assert!(err.is_client_fault());
    assert!(!marker.exists(), "converter must not run for rejected uploads");
    assert!(staging_is_empty(&staging), "nothing may be staged for rejected uploads");
}

#[tokio::test]
async fn oversized_payload_is_rejected_before_anything_else() {
    let temp = tempfile::tempdir().expect("tempdir");
    let staging = temp.path().join("staging");
    let out_dir = temp.path().join("out");
    std::fs::create_dir_all(&out_dir).expect("mkdir");

    let gateway = gateway_with(
        &copying_converter(temp.path(), &out_dir),
        &staging,
        |config| {
            config.upload = UploadConfig {
                max_upload_size_bytes: 4,
                ..Default::default()
            };
        },
    );

    let err = gateway
        .convert(png_payload(), "image", "jpeg")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GatewayError::TooLarge { size_bytes: 8, limit_bytes: 4 }
    ));
    assert!(staging_is_empty(&staging));
}

#[tokio::test]
async fn plain_text_declared_text_plain_takes_the_exception_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let staging = temp.path().join("staging");
    let out_dir = temp.path().join("out");
    std::fs::create_dir_all(&out_dir).expect("mkdir");

    let gateway = gateway(&copying_converter(temp.path(), &out_dir), &staging);
    let payload = UploadedPayload::new(
        b"Plain ASCII with no magic bytes at all.\n".to_vec(),
        "notes.txt",
        "text/plain",
    );

    let artifact = gateway
        .convert(payload, "document", "pdf")
        .await
        .expect("text/plain exception should admit this");
    assert!(staging_is_empty(&staging));
    artifact.release().await.expect("release");
}

#[tokio::test]
async fn converter_failure_surfaces_its_diagnostics_and_cleans_up() {
    let temp = tempfile::tempdir().expect("tempdir");
    let staging = temp.path().join("staging");
    let converter = script(
        temp.path(),
        "convert.sh",
        "echo 'unsupported target format' >&2\nexit 2",
    );

    let gateway = gateway(&converter, &staging);
    let err = gateway
        .convert(png_payload(), "image", "tga")
        .await
        .unwrap_err();

    match &err {
        GatewayError::ConverterNonZeroExit { code, diagnostics } => {
            assert_eq!(*code, 2);
            assert_eq!(diagnostics, "unsupported target format");
        }
        other => panic!("expected ConverterNonZeroExit, got {other:?}"),
    }
    assert!(!err.is_client_fault());
    assert!(staging_is_empty(&staging), "staging must be clean after failure");
}

#[tokio::test]
async fn converter_overrunning_the_timeout_is_killed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let staging = temp.path().join("staging");
    let marker = temp.path().join("survived");
    // Would only create the marker if it outlived the kill
    let converter = script(
        temp.path(),
        "convert.sh",
        &format!("sleep 30\ntouch '{}'", marker.display()),
    );

    let gateway = gateway_with(&converter, &staging, |config| {
        config.converter.timeout_seconds = 1;
    });

    let start = Instant::now();
    let err = gateway
        .convert(png_payload(), "image", "jpeg")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::ConverterTimedOut { timeout_seconds: 1 }));
    assert!(start.elapsed() < Duration::from_secs(10), "kill must not wait out the sleep");
    assert!(!marker.exists(), "converter must have been terminated");
    assert!(staging_is_empty(&staging), "staging must be clean after timeout");
}

#[tokio::test]
async fn lying_converter_is_classified_as_crash() {
    let temp = tempfile::tempdir().expect("tempdir");
    let staging = temp.path().join("staging");
    let converter = script(temp.path(), "convert.sh", "echo /nonexistent/out.jpg\nexit 0");

    let gateway = gateway(&converter, &staging);
    let err = gateway
        .convert(png_payload(), "image", "jpeg")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::ConverterCrashed { .. }));
    assert!(staging_is_empty(&staging));
}

#[tokio::test]
async fn missing_parameters_are_rejected_up_front() {
    let temp = tempfile::tempdir().expect("tempdir");
    let staging = temp.path().join("staging");
    let out_dir = temp.path().join("out");
    std::fs::create_dir_all(&out_dir).expect("mkdir");

    let gateway = gateway(&copying_converter(temp.path(), &out_dir), &staging);

    let err = gateway.convert(png_payload(), "", "jpeg").await.unwrap_err();
    assert!(matches!(err, GatewayError::MissingParameter { name: "category" }));

    let err = gateway.convert(png_payload(), "image", "  ").await.unwrap_err();
    assert!(matches!(err, GatewayError::MissingParameter { name: "target_format" }));
}

#[tokio::test]
async fn unknown_category_is_its_own_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let staging = temp.path().join("staging");
    let out_dir = temp.path().join("out");
    std::fs::create_dir_all(&out_dir).expect("mkdir");

    let gateway = gateway(&copying_converter(temp.path(), &out_dir), &staging);
    let err = gateway
        .convert(png_payload(), "archive", "jpeg")
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::UnknownCategory { ref name } if name == "archive"));
}

#[tokio::test]
async fn cancellation_kills_the_in_flight_conversion() {
    let temp = tempfile::tempdir().expect("tempdir");
    let staging = temp.path().join("staging");
    let converter = script(temp.path(), "convert.sh", "sleep 30");

    let gateway = gateway(&converter, &staging);
    let cancel = CancellationToken::new();

    let pending = {
        let cancel = cancel.clone();
        let gateway = gateway.clone();
        tokio::spawn(async move {
            gateway
                .convert_with_cancel(png_payload(), "image", "jpeg", cancel)
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    cancel.cancel();

    let err = pending.await.expect("join").unwrap_err();
    assert!(matches!(err, GatewayError::Cancelled));
    assert!(staging_is_empty(&staging), "staging must be clean after cancellation");
}

#[tokio::test]
async fn concurrent_requests_do_not_interfere() {
    let temp = tempfile::tempdir().expect("tempdir");
    let staging = temp.path().join("staging");
    let out_dir = temp.path().join("out");
    std::fs::create_dir_all(&out_dir).expect("mkdir");

    // Each artifact gets a unique name derived from the staged input
    let converter = script(
        temp.path(),
        "convert.sh",
        &format!(
            "out='{}'/$(basename \"$1\").\"$2\"\ncp \"$1\" \"$out\"\necho \"$out\"",
            out_dir.display()
        ),
    );

    let gateway = gateway(&converter, &staging);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let gateway = gateway.clone();
            tokio::spawn(async move { gateway.convert(png_payload(), "image", "jpeg").await })
        })
        .collect();

    for task in tasks {
        let artifact = task.await.expect("join").expect("convert");
        artifact.release().await.expect("release");
    }

    assert!(staging_is_empty(&staging));
    let snapshot = gateway.metrics_snapshot();
    assert_eq!(snapshot.started, 8);
    assert_eq!(snapshot.succeeded, 8);
}
