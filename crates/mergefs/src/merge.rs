// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::backend::Output;
use crate::error::Result;
use crate::source::InputSource;

/// Apply every source to `output` in order, then generate the artifact.
///
/// The first failing source aborts the merge; the output is dropped
/// without being generated.
pub async fn merge<O: Output>(output: O, sources: &[InputSource]) -> Result<O::Artifact> {
    for source in sources {
        let name = source.name();
        output.log().log(&format!("Apply {name}"));
        diagnostics::info!("Applying source {name}", name: name.as_str());
        output.apply(source).await?;
    }
    output.generate().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveBackend, ArchiveOptions, ByteArrayOutput};
    use crate::backend::StorageBackend;
    use crate::directory::DirectoryBackend;
    use crate::testing::RecordingLog;
    use bytes::Bytes;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn sources() -> Vec<InputSource> {
        vec![
            InputSource::buffer("readme.txt", &b"read me"[..]),
            InputSource::folder_member("assets/textures/stone.png", &b"stone"[..]),
            InputSource::folder_member("assets/sounds/step.ogg", &b"step"[..]),
        ]
    }

    #[tokio::test]
    async fn test_merge_into_directory() {
        let tmp = TempDir::new().unwrap();
        let log = Arc::new(RecordingLog::default());
        let output = DirectoryBackend::create(tmp.path().join("out"), log.clone())
            .await
            .unwrap();

        let root = merge(output, &sources()).await.unwrap();

        assert_eq!(std::fs::read(root.join("readme.txt")).unwrap(), b"read me");
        assert_eq!(std::fs::read(root.join("textures/stone.png")).unwrap(), b"stone");
        assert_eq!(std::fs::read(root.join("sounds/step.ogg")).unwrap(), b"step");
        assert_eq!(
            log.lines().first().map(String::as_str),
            Some("Apply readme.txt")
        );
        assert!(log.lines().last().is_some_and(|line| line.starts_with("Output: ")));
        assert!(log.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_merge_into_archive() {
        let log = Arc::new(RecordingLog::default());
        let output = ByteArrayOutput::new(log.clone());

        let zip = merge(output, &sources()).await.unwrap();

        let archive = ArchiveBackend::open(Bytes::from(zip), ArchiveOptions::default(), log.clone())
            .await
            .unwrap();
        assert_eq!(
            archive.paths().await,
            vec![
                "readme.txt",
                "sounds/",
                "sounds/step.ogg",
                "textures/",
                "textures/stone.png"
            ]
        );
        assert_eq!(archive.read("sounds/step.ogg").await.unwrap(), &b"step"[..]);
    }

    #[tokio::test]
    async fn test_merge_stops_at_first_failure() {
        let tmp = TempDir::new().unwrap();
        let output = ByteArrayOutput::new(Arc::new(RecordingLog::default()));
        let sources = vec![
            InputSource::local_file(tmp.path().join("missing.zip")),
            InputSource::buffer("never.txt", &b"x"[..]),
        ];

        let err = merge(output, &sources).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
