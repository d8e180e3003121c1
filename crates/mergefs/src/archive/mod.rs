// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory archive output
//!
//! The archive is a flat map from full logical path to entry. It has no
//! directories of its own: rename, copy, delete and lookup emulate them by
//! matching path prefixes (see [`crate::path::is_within`]).
//!
//! One [`ArchiveBackend`] carries all mutation semantics. The outputs in
//! the encoding module differ only in how the finished zip container is handed back.

mod backend;
mod codec;
mod encoding;

pub use backend::{ArchiveBackend, ArchiveEntry};
pub use codec::{ArchiveOptions, Compression};
pub use encoding::{
    ArchiveEncoding, ArchiveOutput, Blob, BlobEncoding, BlobOutput, BoxedBuffer,
    BoxedBufferOutput, Buffer, BufferOutput, ByteArray, ByteArrayOutput, ZIP_MIME_TYPE,
};
