// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Tests for the directory output against a temporary host tree.

use super::DirectoryBackend;
use crate::backend::{Output, StorageBackend};
use crate::error::Error;
use crate::log::SilentLog;
use crate::testing::RecordingLog;
use bytes::Bytes;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a temp directory with some leftover content
fn create_stale_tree() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let out = dir.path().join("out");

    std::fs::create_dir_all(out.join("old/nested")).unwrap();
    std::fs::write(out.join("stale.txt"), b"stale").unwrap();
    std::fs::write(out.join("old/nested/deep.txt"), b"deep").unwrap();

    dir
}

async fn create_output(dir: &TempDir) -> DirectoryBackend {
    DirectoryBackend::create(dir.path().join("out"), Arc::new(SilentLog))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_empties_existing_root() {
    let dir = create_stale_tree();
    let log = Arc::new(RecordingLog::default());
    let output = DirectoryBackend::create(dir.path().join("out"), log.clone())
        .await
        .unwrap();

    assert!(output.root().is_dir());
    assert_eq!(std::fs::read_dir(output.root()).unwrap().count(), 0);
    assert_eq!(log.lines(), vec!["Remove existing output".to_string()]);
}

#[tokio::test]
async fn test_create_missing_root() {
    let dir = TempDir::new().unwrap();
    let output = DirectoryBackend::create(dir.path().join("a/b/out"), Arc::new(SilentLog))
        .await
        .unwrap();
    assert!(output.root().is_dir());
}

#[tokio::test]
async fn test_write_creates_parents() {
    let dir = TempDir::new().unwrap();
    let output = create_output(&dir).await;

    output
        .write("x/y/z.txt", Bytes::from_static(b"zz"))
        .await
        .unwrap();

    assert_eq!(std::fs::read(output.root().join("x/y/z.txt")).unwrap(), b"zz");
    assert!(output.exists("x/y").await.unwrap());
    assert!(output.exists("x/y/").await.unwrap());
}

#[tokio::test]
async fn test_read_directory_fails() {
    let dir = TempDir::new().unwrap();
    let output = create_output(&dir).await;
    output
        .write("d/f", Bytes::from_static(b"1"))
        .await
        .unwrap();

    assert!(output.read("d").await.is_err());
    let missing = output.read("nope").await.unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn test_rename_replaces_existing_target() {
    let dir = TempDir::new().unwrap();
    let output = create_output(&dir).await;
    output
        .write("src/a.txt", Bytes::from_static(b"new"))
        .await
        .unwrap();
    output
        .write("dst/old.txt", Bytes::from_static(b"old"))
        .await
        .unwrap();

    output.rename("src", "dst").await.unwrap();

    assert!(!output.exists("src").await.unwrap());
    assert!(!output.exists("dst/old.txt").await.unwrap());
    assert_eq!(output.read("dst/a.txt").await.unwrap(), &b"new"[..]);
}

#[tokio::test]
async fn test_rename_into_missing_parent() {
    let dir = TempDir::new().unwrap();
    let output = create_output(&dir).await;
    output
        .write("file.txt", Bytes::from_static(b"f"))
        .await
        .unwrap();

    output.rename("file.txt", "deep/er/file.txt").await.unwrap();
    assert_eq!(output.read("deep/er/file.txt").await.unwrap(), &b"f"[..]);
}

#[tokio::test]
async fn test_copy_directory_recursively() {
    let dir = TempDir::new().unwrap();
    let output = create_output(&dir).await;
    output
        .write("tree/a.txt", Bytes::from_static(b"a"))
        .await
        .unwrap();
    output
        .write("tree/sub/b.txt", Bytes::from_static(b"b"))
        .await
        .unwrap();

    output.copy("tree", "clone/tree").await.unwrap();

    assert_eq!(output.read("clone/tree/a.txt").await.unwrap(), &b"a"[..]);
    assert_eq!(output.read("clone/tree/sub/b.txt").await.unwrap(), &b"b"[..]);
    assert_eq!(output.read("tree/sub/b.txt").await.unwrap(), &b"b"[..]);
}

#[tokio::test]
async fn test_copy_missing_source_fails() {
    let dir = TempDir::new().unwrap();
    let output = create_output(&dir).await;
    let err = output.copy("ghost", "anywhere").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_file_and_missing() {
    let dir = TempDir::new().unwrap();
    let output = create_output(&dir).await;
    output
        .write("f.txt", Bytes::from_static(b"f"))
        .await
        .unwrap();

    output.delete("f.txt").await.unwrap();
    output.delete("f.txt").await.unwrap();
    assert!(!output.exists("f.txt").await.unwrap());
}

#[tokio::test]
async fn test_lookup_file_depth_first() {
    let dir = TempDir::new().unwrap();
    let output = create_output(&dir).await;
    output
        .write("top.txt", Bytes::from_static(b"t"))
        .await
        .unwrap();
    output
        .write("one/two/three/pack.mcmeta", Bytes::from_static(b"m"))
        .await
        .unwrap();

    assert_eq!(
        output.lookup_file("top.txt").await.unwrap(),
        Some(".".to_string())
    );
    assert_eq!(
        output.lookup_file("pack.mcmeta").await.unwrap(),
        Some("one/two/three".to_string())
    );
    // Directories are never a match, only files
    assert_eq!(output.lookup_file("two").await.unwrap(), None);
}

#[tokio::test]
async fn test_paths_cannot_escape_root() {
    let dir = TempDir::new().unwrap();
    let output = create_output(&dir).await;

    assert!(matches!(
        output.write("../outside.txt", Bytes::from_static(b"x")).await,
        Err(Error::PathEscapesRoot(_))
    ));
    assert!(matches!(
        output.read("/etc/hostname").await,
        Err(Error::PathEscapesRoot(_))
    ));
    assert!(!dir.path().join("outside.txt").exists());
}

#[tokio::test]
async fn test_generate_returns_root() {
    let dir = TempDir::new().unwrap();
    let output = create_output(&dir).await;
    let expected = output.root().to_path_buf();

    let artifact = output.generate().await.unwrap();
    assert_eq!(artifact, expected);
}

#[tokio::test]
async fn test_copy_directory_into_itself_is_rejected() {
    let dir = TempDir::new().unwrap();
    let output = create_output(&dir).await;
    output
        .write("a/x.txt", Bytes::from_static(b"x"))
        .await
        .unwrap();

    let err = output.copy("a", "a/b").await.unwrap_err();
    assert!(matches!(err, Error::CopyIntoItself { .. }), "{err}");
    assert!(!output.exists("a/b").await.unwrap());

    // A sibling that merely shares the prefix is fine
    output.copy("a", "ab").await.unwrap();
    assert_eq!(output.read("ab/x.txt").await.unwrap(), &b"x"[..]);
}
