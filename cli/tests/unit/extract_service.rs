//! Tests for the workspace lifecycle and bundle extraction.

#![allow(clippy::expect_used)]

use std::fs;

use chrono::NaiveDate;
use powercli_offline::application::services::extract::{
    check_bundle, extract_bundle, prepare_workspace,
};
use powercli_offline::domain::bundle::SelectedBundle;
use powercli_offline::domain::error::InstallError;
use powercli_offline::domain::module::StepOutcome;
use powercli_offline::infra::archive::BundleArchive;
use powercli_offline::infra::fs::LocalFs;

use crate::mocks::{RecordingReporter, write_bundle};

fn fixed_time() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 9)
        .and_then(|d| d.and_hms_opt(14, 5, 7))
        .expect("valid time")
}

#[test]
fn check_bundle_rejects_missing_archive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bundle = SelectedBundle::new(dir.path().join("missing.zip"));

    let err = check_bundle(&LocalFs, &bundle).expect_err("missing bundle");

    assert!(matches!(
        err.downcast_ref::<InstallError>(),
        Some(InstallError::MissingBundle(_))
    ));
}

#[test]
fn prepare_workspace_uses_timestamped_name() {
    let dir = tempfile::tempdir().expect("tempdir");

    let guard = prepare_workspace(&LocalFs, dir.path(), "PowerCLI_Offline_", fixed_time())
        .expect("workspace");

    assert_eq!(
        guard.path(),
        dir.path().join("PowerCLI_Offline_20240309_140507")
    );
    assert!(guard.path().is_dir());
    assert_eq!(guard.close(), StepOutcome::Ok);
}

#[test]
fn prepare_workspace_replaces_stale_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stale = dir.path().join("PowerCLI_Offline_20240309_140507");
    fs::create_dir_all(stale.join("old")).expect("mkdir");
    fs::write(stale.join("old").join("leftover.nupkg"), b"x").expect("write");

    let guard = prepare_workspace(&LocalFs, dir.path(), "PowerCLI_Offline_", fixed_time())
        .expect("workspace");

    assert!(guard.path().is_dir());
    assert!(!stale.join("old").exists(), "stale contents must be gone");
    drop(guard);
}

#[test]
fn dropping_guard_removes_workspace() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = {
        let guard = prepare_workspace(&LocalFs, dir.path(), "ws_", fixed_time())
            .expect("workspace");
        fs::write(guard.path().join("file.txt"), b"data").expect("write");
        guard.path().to_path_buf()
    };

    assert!(!path.exists());
}

#[test]
fn close_on_already_removed_workspace_is_ok() {
    let dir = tempfile::tempdir().expect("tempdir");
    let guard = prepare_workspace(&LocalFs, dir.path(), "ws_", fixed_time()).expect("workspace");
    fs::remove_dir_all(guard.path()).expect("remove");

    assert_eq!(guard.close(), StepOutcome::Ok);
}

#[tokio::test]
async fn extract_bundle_lists_top_level_entries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("bundle.zip");
    write_bundle(
        &archive,
        &[
            ("VMware.PowerCLI.13.3.0.nupkg", "pk"),
            ("deps/VMware.Vim.8.3.0.nupkg", "pk"),
        ],
    );
    let workspace = dir.path().join("ws");
    fs::create_dir_all(&workspace).expect("mkdir");
    let reporter = RecordingReporter::default();

    let entries = extract_bundle(
        &BundleArchive,
        &LocalFs,
        &reporter,
        &SelectedBundle::new(archive),
        &workspace,
    )
    .await
    .expect("extract");

    assert_eq!(entries.len(), 2);
    assert!(workspace.join("deps").join("VMware.Vim.8.3.0.nupkg").is_file());
    assert!(reporter.contains("extracted 2 top-level entries"));
}

#[tokio::test]
async fn corrupt_archive_is_extract_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = dir.path().join("broken.zip");
    fs::write(&archive, b"this is not a zip file").expect("write");
    let workspace = dir.path().join("ws");
    fs::create_dir_all(&workspace).expect("mkdir");

    let err = extract_bundle(
        &BundleArchive,
        &LocalFs,
        &RecordingReporter::default(),
        &SelectedBundle::new(archive.clone()),
        &workspace,
    )
    .await
    .expect_err("corrupt archive");

    match err.downcast_ref::<InstallError>() {
        Some(InstallError::ExtractFailure { archive: a, .. }) => assert_eq!(a, &archive),
        other => panic!("expected ExtractFailure, got {other:?}"),
    }
}
