// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Input sources: the origins a merge reads from.
//!
//! Every source reduces to a byte payload plus a logical name and knows how
//! to write itself into either backend:
//!
//! - [`BufferSource`]: bytes already in memory with a display name
//! - [`FileSource`]: a file picked by the user, optionally as part of a
//!   folder selection (it then carries `myfolder/sub/file.txt`)
//! - [`LocalFileSource`]: a path on local disk, read on first use only

use crate::archive::ArchiveBackend;
use crate::backend::StorageBackend;
use crate::directory::DirectoryBackend;
use crate::error::{Error, Result};
use crate::log::Log;
use crate::path;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;

/// One origin to merge into an output
#[derive(Debug)]
pub enum InputSource {
    Buffer(BufferSource),
    File(FileSource),
    LocalFile(LocalFileSource),
}

/// Resident bytes with a caller-supplied display name
#[derive(Debug, Clone)]
pub struct BufferSource {
    name: String,
    content: Bytes,
}

/// A user-picked file, possibly a member of a selected folder
#[derive(Debug, Clone)]
pub struct FileSource {
    /// The file's own name, extension included
    name: String,
    /// Path recorded at folder selection time, top-level folder first
    relative_path: Option<String>,
    content: Bytes,
}

/// A local file read lazily, at most once
#[derive(Debug)]
pub struct LocalFileSource {
    path: PathBuf,
    content: OnceCell<Bytes>,
}

/// Which backend a write is aimed at; only selects the log verb
#[derive(Clone, Copy)]
enum Target {
    Directory,
    Archive,
}

impl InputSource {
    pub fn buffer(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        InputSource::Buffer(BufferSource::new(name, content))
    }

    pub fn file(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        InputSource::File(FileSource::new(name, content))
    }

    /// A file that arrived as `relative_path` inside a folder selection
    pub fn folder_member(relative_path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        InputSource::File(FileSource::with_relative_path(relative_path, content))
    }

    pub fn local_file(path: impl Into<PathBuf>) -> Self {
        InputSource::LocalFile(LocalFileSource::new(path))
    }

    /// Logical name of the origin, used for progress reporting
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            InputSource::Buffer(source) => source.name(),
            InputSource::File(source) => source.name(),
            InputSource::LocalFile(source) => source.name(),
        }
    }

    pub async fn apply_to_directory(&self, output: &DirectoryBackend) -> Result<()> {
        match self {
            InputSource::Buffer(source) => source.apply_to_directory(output).await,
            InputSource::File(source) => source.apply_to_directory(output).await,
            InputSource::LocalFile(source) => source.apply_to_directory(output).await,
        }
    }

    pub async fn apply_to_archive(&self, output: &ArchiveBackend) -> Result<()> {
        match self {
            InputSource::Buffer(source) => source.apply_to_archive(output).await,
            InputSource::File(source) => source.apply_to_archive(output).await,
            InputSource::LocalFile(source) => source.apply_to_archive(output).await,
        }
    }
}

/// Write `content` under `name` at the output root
async fn write_top_level(
    output: &dyn StorageBackend,
    log: &dyn Log,
    target: Target,
    name: &str,
    content: Bytes,
) -> Result<()> {
    match target {
        Target::Directory => log.log(&format!("Write {name}")),
        Target::Archive => log.log(&format!("Pack {name}")),
    }
    output.write(name, content).await
}

impl BufferSource {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    #[must_use]
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub async fn apply_to_directory(&self, output: &DirectoryBackend) -> Result<()> {
        write_top_level(
            output,
            output.log(),
            Target::Directory,
            &self.name,
            self.content.clone(),
        )
        .await
    }

    pub async fn apply_to_archive(&self, output: &ArchiveBackend) -> Result<()> {
        write_top_level(
            output,
            output.log(),
            Target::Archive,
            &self.name,
            self.content.clone(),
        )
        .await
    }
}

impl FileSource {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            relative_path: None,
            content: content.into(),
        }
    }

    /// The file's own name is the last component of `relative_path`
    pub fn with_relative_path(relative_path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let relative_path = relative_path.into();
        Self {
            name: path::basename(&relative_path).to_string(),
            relative_path: Some(relative_path),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn relative_path(&self) -> Option<&str> {
        self.relative_path.as_deref()
    }

    /// The selected folder's name when there is one, else the file name
    /// without its extension
    #[must_use]
    pub fn name(&self) -> String {
        match self.relative_path.as_deref().map(path::split_top) {
            Some((folder, _)) if !folder.is_empty() => folder.to_string(),
            _ => path::file_stem(&self.name),
        }
    }

    /// Location below the selected folder, if this file came from one
    fn destination(&self) -> Option<&str> {
        self.relative_path
            .as_deref()
            .and_then(|relative| path::split_top(relative).1)
    }

    pub async fn apply_to_directory(&self, output: &DirectoryBackend) -> Result<()> {
        match self.destination() {
            Some(destination) => {
                output.log().log(&format!("Extract {destination}"));
                output.write(destination, self.content.clone()).await
            }
            None => {
                write_top_level(
                    output,
                    output.log(),
                    Target::Directory,
                    &self.name,
                    self.content.clone(),
                )
                .await
            }
        }
    }

    pub async fn apply_to_archive(&self, output: &ArchiveBackend) -> Result<()> {
        match self.destination() {
            Some(destination) => {
                output.log().log(&format!("Pack {destination}"));
                output.write(destination, self.content.clone()).await
            }
            None => {
                write_top_level(
                    output,
                    output.log(),
                    Target::Archive,
                    &self.name,
                    self.content.clone(),
                )
                .await
            }
        }
    }
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name without extension; never touches the disk
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// True once the file has been read
    #[must_use]
    pub fn is_materialized(&self) -> bool {
        self.content.initialized()
    }

    /// Read the file on first call, hand out the cached bytes afterwards
    pub async fn materialize(&self, log: &dyn Log) -> Result<Bytes> {
        let content = self
            .content
            .get_or_try_init(|| async {
                log.log(&format!("Read {}", self.path.display()));
                let data = tokio::fs::read(&self.path)
                    .await
                    .map_err(|e| Error::io(&self.path, e))?;
                Ok::<_, Error>(Bytes::from(data))
            })
            .await?;
        Ok(content.clone())
    }

    fn file_name(&self) -> Result<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::not_a_file(self.path.to_string_lossy()))
    }

    pub async fn apply_to_directory(&self, output: &DirectoryBackend) -> Result<()> {
        let content = self.materialize(output.log()).await?;
        let name = self.file_name()?;
        write_top_level(output, output.log(), Target::Directory, &name, content).await
    }

    pub async fn apply_to_archive(&self, output: &ArchiveBackend) -> Result<()> {
        let content = self.materialize(output.log()).await?;
        let name = self.file_name()?;
        write_top_level(output, output.log(), Target::Archive, &name, content).await
    }
}
