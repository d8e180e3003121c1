// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use diagnostics::log_info;
use mergefs::{DirectoryBackend, Log, merge};

use crate::common::{collect_sources, ensure_outside};

/// Merge `inputs` into a fresh directory tree at `out`.
///
/// Anything already at `out` is removed first, so no input may live
/// below it. Returns the output root.
pub async fn extract_command(inputs: &[PathBuf], out: &Path, log: Arc<dyn Log>) -> Result<PathBuf> {
    ensure_outside(inputs, out)?;
    let sources = collect_sources(inputs, log.as_ref()).await?;
    log_info!("Extracting {count} sources", count: sources.len());

    let output = DirectoryBackend::create(out, log)
        .await
        .with_context(|| format!("Failed to prepare output directory '{}'", out.display()))?;

    Ok(merge(output, &sources).await?)
}
