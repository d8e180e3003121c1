// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Archive outputs, one per requested artifact type.
//!
//! All of them wrap the same [`ArchiveBackend`]; only the final hand-off of
//! the zip bytes differs.

use super::{ArchiveBackend, ArchiveOptions};
use crate::backend::Output;
use crate::error::Result;
use crate::log::Log;
use crate::source::InputSource;
use async_trait::async_trait;
use bytes::Bytes;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

pub const ZIP_MIME_TYPE: &str = "application/zip";

/// Shape of the artifact produced from finished zip bytes
pub trait ArchiveEncoding: Send + Sync + 'static {
    type Artifact: Send;

    /// Label used in progress messages
    const NAME: &'static str;

    fn encode(zip: Vec<u8>) -> Self::Artifact;
}

/// Reference-counted byte buffer
#[derive(Debug)]
pub enum Buffer {}

/// Plain owned byte array
#[derive(Debug)]
pub enum ByteArray {}

/// Fixed-size boxed buffer
#[derive(Debug)]
pub enum BoxedBuffer {}

/// [`Blob`] carrying a MIME type
#[derive(Debug)]
pub enum BlobEncoding {}

/// Bytes tagged with their content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    content_type: &'static str,
    data: Bytes,
}

impl Blob {
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.content_type
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

impl ArchiveEncoding for Buffer {
    type Artifact = Bytes;
    const NAME: &'static str = "buffer";

    fn encode(zip: Vec<u8>) -> Bytes {
        Bytes::from(zip)
    }
}

impl ArchiveEncoding for ByteArray {
    type Artifact = Vec<u8>;
    const NAME: &'static str = "byte array";

    fn encode(zip: Vec<u8>) -> Vec<u8> {
        zip
    }
}

impl ArchiveEncoding for BoxedBuffer {
    type Artifact = Box<[u8]>;
    const NAME: &'static str = "boxed buffer";

    fn encode(zip: Vec<u8>) -> Box<[u8]> {
        zip.into_boxed_slice()
    }
}

impl ArchiveEncoding for BlobEncoding {
    type Artifact = Blob;
    const NAME: &'static str = "blob";

    fn encode(zip: Vec<u8>) -> Blob {
        Blob {
            content_type: ZIP_MIME_TYPE,
            data: Bytes::from(zip),
        }
    }
}

/// Archive output producing `E::Artifact`.
///
/// Derefs to the [`ArchiveBackend`] for storage operations.
pub struct ArchiveOutput<E> {
    archive: ArchiveBackend,
    encoding: PhantomData<fn() -> E>,
}

pub type BufferOutput = ArchiveOutput<Buffer>;
pub type ByteArrayOutput = ArchiveOutput<ByteArray>;
pub type BoxedBufferOutput = ArchiveOutput<BoxedBuffer>;
pub type BlobOutput = ArchiveOutput<BlobEncoding>;

impl<E: ArchiveEncoding> ArchiveOutput<E> {
    pub fn new(log: Arc<dyn Log>) -> Self {
        Self::from_backend(ArchiveBackend::new(log))
    }

    pub fn with_options(options: ArchiveOptions, log: Arc<dyn Log>) -> Self {
        Self::from_backend(ArchiveBackend::with_options(options, log))
    }

    #[must_use]
    pub fn from_backend(archive: ArchiveBackend) -> Self {
        Self {
            archive,
            encoding: PhantomData,
        }
    }

    #[must_use]
    pub fn archive(&self) -> &ArchiveBackend {
        &self.archive
    }
}

impl<E> Deref for ArchiveOutput<E> {
    type Target = ArchiveBackend;

    fn deref(&self) -> &ArchiveBackend {
        &self.archive
    }
}

#[async_trait]
impl<E: ArchiveEncoding> Output for ArchiveOutput<E> {
    type Artifact = E::Artifact;

    fn log(&self) -> &dyn Log {
        self.archive.log()
    }

    async fn apply(&self, source: &InputSource) -> Result<()> {
        source.apply_to_archive(&self.archive).await
    }

    async fn generate(self) -> Result<E::Artifact> {
        self.archive.log().log(&format!("Generate {} zip", E::NAME));
        let zip = self.archive.encode().await?;
        diagnostics::info!("Generated {size} byte zip", size: zip.len());
        Ok(E::encode(zip))
    }
}
