// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Zip container encode/decode for archive entries

use super::ArchiveEntry;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// How file payloads are stored in the container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

impl Compression {
    fn method(self) -> CompressionMethod {
        match self {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        }
    }
}

/// Settings applied when an archive output is generated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveOptions {
    pub compression: Compression,
}

impl ArchiveOptions {
    #[must_use]
    pub fn stored() -> Self {
        Self {
            compression: Compression::Stored,
        }
    }
}

/// Serialize entries, in the given order, into one zip container
pub(crate) fn encode(entries: &[ArchiveEntry], options: ArchiveOptions) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let file_options = SimpleFileOptions::default().compression_method(options.compression.method());

    for entry in entries {
        if entry.is_dir() {
            writer.add_directory(entry.name(), file_options)?;
        } else {
            writer.start_file(entry.name(), file_options)?;
            writer
                .write_all(entry.content())
                .map_err(|e| Error::io(entry.name(), e))?;
        }
    }

    Ok(writer.finish()?.into_inner())
}

/// Read every entry of a zip container
pub(crate) fn decode(data: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let name = file.name().to_string();
        if file.is_dir() {
            entries.push(ArchiveEntry::directory(name));
        } else {
            // The header's size is untrusted; never reserve past the container
            let claimed = usize::try_from(file.size()).unwrap_or(usize::MAX);
            let mut content = Vec::with_capacity(claimed.min(data.len()));
            let _ = file
                .read_to_end(&mut content)
                .map_err(|e| Error::io(&name, e))?;
            entries.push(ArchiveEntry::file(name, Bytes::from(content)));
        }
    }

    Ok(entries)
}
