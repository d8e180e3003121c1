// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Directory output -- a host directory tree as the merge target
//!
//! Logical paths resolve relative to a root directory. Directories are real,
//! so nothing is indexed in memory: copy and lookup walk live listings.
//! The root is emptied when the output is created, so every merge starts
//! from a clean tree.

#[cfg(test)]
mod tests;

use crate::backend::{Output, StorageBackend};
use crate::error::{Error, Result};
use crate::log::Log;
use crate::path;
use crate::source::InputSource;
use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Storage backend over a host directory
pub struct DirectoryBackend {
    root: PathBuf,
    log: Arc<dyn Log>,
}

impl DirectoryBackend {
    /// Prepare `root` as an empty output directory.
    ///
    /// Anything already at `root` is removed first.
    pub async fn create(root: impl Into<PathBuf>, log: Arc<dyn Log>) -> Result<Self> {
        let backend = Self {
            root: root.into(),
            log,
        };

        if backend.exists(path::ROOT).await? {
            backend.log.log("Remove existing output");
            backend.delete(path::ROOT).await?;
        }
        fs::create_dir_all(&backend.root)
            .await
            .map_err(|e| Error::io(&backend.root, e))?;

        Ok(backend)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn log(&self) -> &dyn Log {
        self.log.as_ref()
    }

    /// Host path for a logical path; `.` and `` name the root itself
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        path::check_relative(path)?;
        let trimmed = path.trim_end_matches(path::SEPARATOR);
        if trimmed.is_empty() || trimmed == path::ROOT {
            Ok(self.root.clone())
        } else {
            Ok(self.root.join(trimmed))
        }
    }

    async fn ensure_parent(host_path: &Path) -> Result<()> {
        if let Some(parent) = host_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(parent, e))?;
        }
        Ok(())
    }

    /// Lookup walk below `relative`, depth first in listing order
    fn scan_for<'a>(&'a self, name: &'a str, relative: String) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            let dir = self.resolve(&relative)?;
            let mut listing = fs::read_dir(&dir).await.map_err(|e| Error::io(&dir, e))?;

            while let Some(entry) = listing.next_entry().await.map_err(|e| Error::io(&dir, e))? {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| Error::io(entry.path(), e))?;
                let entry_name = entry.file_name().to_string_lossy().into_owned();

                if file_type.is_dir() {
                    let child = path::join(&relative, &entry_name);
                    if let Some(found) = self.scan_for(name, child).await? {
                        return Ok(Some(found));
                    }
                } else if entry_name == name {
                    return Ok(Some(relative));
                }
            }

            Ok(None)
        })
    }
}

/// A file cannot be moved or copied onto a folder prefix
fn check_target(source: &std::fs::Metadata, to: &str) -> Result<()> {
    if !source.is_dir() && path::is_dir_prefix(to) {
        return Err(Error::not_a_file(to));
    }
    Ok(())
}

/// Recreate the tree at `from` under `to`, depth first
fn copy_tree<'a>(from: &'a Path, to: &'a Path) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        fs::create_dir_all(to).await.map_err(|e| Error::io(to, e))?;
        let mut listing = fs::read_dir(from).await.map_err(|e| Error::io(from, e))?;

        while let Some(entry) = listing.next_entry().await.map_err(|e| Error::io(from, e))? {
            let source = entry.path();
            let target = to.join(entry.file_name());
            let file_type = entry.file_type().await.map_err(|e| Error::io(&source, e))?;

            if file_type.is_dir() {
                copy_tree(&source, &target).await?;
            } else {
                let _ = fs::copy(&source, &target)
                    .await
                    .map_err(|e| Error::io(&source, e))?;
            }
        }

        Ok(())
    })
}

#[async_trait]
impl StorageBackend for DirectoryBackend {
    async fn exists(&self, path: &str) -> Result<bool> {
        let host_path = self.resolve(path)?;
        fs::try_exists(&host_path)
            .await
            .map_err(|e| Error::io(&host_path, e))
    }

    async fn read(&self, path: &str) -> Result<Bytes> {
        let host_path = self.resolve(path)?;
        let data = fs::read(&host_path)
            .await
            .map_err(|e| Error::io(&host_path, e))?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, path: &str, data: Bytes) -> Result<()> {
        if path.trim_end_matches(path::SEPARATOR).is_empty() {
            return Err(Error::empty_path());
        }
        let host_path = self.resolve(path)?;
        diagnostics::debug!(
            "Directory write {path} ({size} bytes)",
            path: path,
            size: data.len()
        );
        Self::ensure_parent(&host_path).await?;
        fs::write(&host_path, &data)
            .await
            .map_err(|e| Error::io(&host_path, e))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let host_path = self.resolve(path)?;
        let metadata = match fs::symlink_metadata(&host_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(Error::io(&host_path, e)),
        };

        diagnostics::debug!("Directory delete {path}", path: path);
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&host_path).await
        } else {
            fs::remove_file(&host_path).await
        };
        removed.map_err(|e| Error::io(&host_path, e))
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        let source = self.resolve(from)?;
        let target = self.resolve(to)?;
        if let Ok(metadata) = fs::metadata(&source).await {
            check_target(&metadata, to)?;
        }

        if self.exists(to).await? {
            self.delete(to).await?;
        }
        Self::ensure_parent(&target).await?;

        diagnostics::debug!("Directory rename {from} -> {to}", from: from, to: to);
        fs::rename(&source, &target)
            .await
            .map_err(|e| Error::io(&source, e))
    }

    async fn copy(&self, from: &str, to: &str) -> Result<()> {
        let source = self.resolve(from)?;
        let target = self.resolve(to)?;
        let metadata = fs::metadata(&source)
            .await
            .map_err(|e| Error::io(&source, e))?;
        check_target(&metadata, to)?;

        diagnostics::debug!("Directory copy {from} -> {to}", from: from, to: to);
        if metadata.is_dir() {
            if target.starts_with(&source) {
                return Err(Error::copy_into_itself(from, to));
            }
            copy_tree(&source, &target).await
        } else {
            Self::ensure_parent(&target).await?;
            let _ = fs::copy(&source, &target)
                .await
                .map_err(|e| Error::io(&source, e))?;
            Ok(())
        }
    }

    async fn lookup_file(&self, name: &str) -> Result<Option<String>> {
        self.scan_for(name, path::ROOT.to_string()).await
    }
}

#[async_trait]
impl Output for DirectoryBackend {
    type Artifact = PathBuf;

    fn log(&self) -> &dyn Log {
        self.log.as_ref()
    }

    async fn apply(&self, source: &InputSource) -> Result<()> {
        source.apply_to_directory(self).await
    }

    async fn generate(self) -> Result<PathBuf> {
        self.log.log(&format!("Output: {}", self.root.display()));
        Ok(self.root)
    }
}
