// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! mergefs -- merge input sources into a directory tree or a zip archive
//!
//! Sources ([`InputSource`]) are in-memory buffers, files from a folder
//! selection, or local files read on demand. Outputs implement
//! [`StorageBackend`], a small filesystem contract with recursive rename,
//! copy and delete, and [`Output`], which accepts sources and finally
//! generates the artifact:
//!
//! - [`DirectoryBackend`] writes a real directory tree and yields its path
//! - [`ArchiveOutput`] keeps a flat in-memory archive, emulating directories
//!   by path prefix, and yields the encoded zip
//!
//! ```no_run
//! # async fn example() -> mergefs::Result<()> {
//! use mergefs::{BufferOutput, InputSource, SilentLog, merge};
//! use std::sync::Arc;
//!
//! let output = BufferOutput::new(Arc::new(SilentLog));
//! let sources = vec![
//!     InputSource::buffer("pack.mcmeta", &b"{}"[..]),
//!     InputSource::local_file("textures.zip"),
//! ];
//! let zip = merge(output, &sources).await?;
//! # let _ = zip;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod backend;
pub mod directory;
pub mod error;
pub mod log;
pub mod merge;
pub mod path;
pub mod source;

#[cfg(test)]
mod testing;

#[cfg(test)]
mod tests;

pub use archive::{
    ArchiveBackend, ArchiveEncoding, ArchiveEntry, ArchiveOptions, ArchiveOutput, Blob,
    BlobOutput, BoxedBufferOutput, BufferOutput, ByteArrayOutput, Compression,
};
pub use backend::{Output, StorageBackend};
pub use directory::DirectoryBackend;
pub use error::{Error, Result};
pub use log::{ConsoleLog, Log, SilentLog};
pub use merge::merge;
pub use source::{BufferSource, FileSource, InputSource, LocalFileSource};
