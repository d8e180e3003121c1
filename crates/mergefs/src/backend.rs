// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Storage backend and output traits.

use crate::error::Result;
use crate::log::Log;
use crate::source::InputSource;
use async_trait::async_trait;
use bytes::Bytes;

/// Filesystem-like contract shared by the archive and directory backends.
///
/// Paths are logical `/`-separated strings relative to the output root. A
/// trailing `/` marks a directory-like prefix for `rename`, `copy` and
/// `delete`.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Read a whole file. Fails unless `path` resolves to a file.
    async fn read(&self, path: &str) -> Result<Bytes>;

    /// Write a whole file, creating missing intermediate directories
    async fn write(&self, path: &str, data: Bytes) -> Result<()>;

    /// Remove a file, or everything under a directory. Missing paths are ignored.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Move an entry, or every entry under a directory-like prefix
    async fn rename(&self, from: &str, to: &str) -> Result<()>;

    /// Same relocation as `rename`, leaving the source in place
    async fn copy(&self, from: &str, to: &str) -> Result<()>;

    /// Find the directory holding a file named `name`, `.` for the root.
    ///
    /// When several files share the name, which one wins is unspecified.
    async fn lookup_file(&self, name: &str) -> Result<Option<String>>;
}

/// A merge target: accepts input sources, then produces one artifact
#[async_trait]
pub trait Output: Send + Sync + Sized {
    type Artifact: Send;

    fn log(&self) -> &dyn Log;

    /// Write one source into this output
    async fn apply(&self, source: &InputSource) -> Result<()>;

    /// Finish the output. Consumes it: nothing may be applied afterwards.
    async fn generate(self) -> Result<Self::Artifact>;
}
