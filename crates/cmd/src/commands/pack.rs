// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use diagnostics::log_info;
use mergefs::{ArchiveOptions, BufferOutput, Log, merge};

use crate::common::collect_sources;

/// Merge `inputs` into a zip archive written to `out`.
///
/// With `store` set, payloads are stored uncompressed. Returns the archive
/// size in bytes.
pub async fn pack_command(
    inputs: &[PathBuf],
    out: &Path,
    store: bool,
    log: Arc<dyn Log>,
) -> Result<usize> {
    let sources = collect_sources(inputs, log.as_ref()).await?;
    log_info!("Packing {count} sources", count: sources.len());

    let options = if store {
        ArchiveOptions::stored()
    } else {
        ArchiveOptions::default()
    };
    let zip = merge(BufferOutput::with_options(options, log), &sources).await?;

    if let Some(parent) = out.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    tokio::fs::write(out, &zip)
        .await
        .with_context(|| format!("Failed to write archive '{}'", out.display()))?;

    Ok(zip.len())
}
