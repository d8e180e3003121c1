// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use diagnostics::log_debug;
use mergefs::{ConsoleLog, InputSource, Log, SilentLog};

/// Progress sink chosen from the command line.
///
/// Keeps the concrete console log around so its warning count can be
/// reported once the command finishes.
pub enum LogChoice {
    Console(Arc<ConsoleLog>),
    Silent,
}

impl LogChoice {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        if quiet {
            LogChoice::Silent
        } else {
            LogChoice::Console(Arc::new(ConsoleLog::new()))
        }
    }

    #[must_use]
    pub fn sink(&self) -> Arc<dyn Log> {
        match self {
            LogChoice::Console(log) => log.clone(),
            LogChoice::Silent => Arc::new(SilentLog),
        }
    }

    #[must_use]
    pub fn warn_count(&self) -> usize {
        match self {
            LogChoice::Console(log) => log.warn_count(),
            LogChoice::Silent => 0,
        }
    }
}

/// Turn command line inputs into sources.
///
/// A file becomes a lazily read local source. A directory behaves like a
/// folder selection: every file below it becomes a folder member whose
/// relative path starts with the directory's own name.
pub async fn collect_sources(inputs: &[PathBuf], log: &dyn Log) -> Result<Vec<InputSource>> {
    let mut sources = Vec::new();

    for input in inputs {
        let metadata = tokio::fs::metadata(input)
            .await
            .with_context(|| format!("Failed to stat input '{}'", input.display()))?;

        if metadata.is_dir() {
            let members = collect_folder(input).await?;
            if members.is_empty() {
                log.warn(&format!("No files in {}", input.display()));
            }
            sources.extend(members);
        } else {
            log_debug!("Input file {path}", path: input.display().to_string());
            sources.push(InputSource::local_file(input));
        }
    }

    Ok(sources)
}

/// Refuse inputs that sit inside `out`, which is emptied before they are read
pub fn ensure_outside(inputs: &[PathBuf], out: &Path) -> Result<()> {
    // Nothing can be inside an output that does not exist yet
    let Ok(out) = out.canonicalize() else {
        return Ok(());
    };

    for input in inputs {
        let resolved = input
            .canonicalize()
            .with_context(|| format!("Failed to resolve input '{}'", input.display()))?;
        if resolved.starts_with(&out) {
            bail!(
                "Input '{}' is inside the output directory '{}'",
                input.display(),
                out.display()
            );
        }
    }

    Ok(())
}

/// Read every file below `folder` as a folder member, in sorted path order
async fn collect_folder(folder: &Path) -> Result<Vec<InputSource>> {
    let folder_name = folder
        .canonicalize()
        .with_context(|| format!("Failed to resolve '{}'", folder.display()))?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("Folder '{}' has no name", folder.display()))?;

    let mut files = Vec::new();
    let mut pending = vec![folder.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut listing = tokio::fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to list '{}'", dir.display()))?;
        while let Some(entry) = listing.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                pending.push(entry.path());
            } else {
                files.push(entry.path());
            }
        }
    }
    files.sort();

    let mut members = Vec::with_capacity(files.len());
    for file in files {
        let relative = file
            .strip_prefix(folder)
            .with_context(|| format!("'{}' is outside '{}'", file.display(), folder.display()))?;
        let parts: Vec<String> = relative
            .components()
            .map(|part| part.as_os_str().to_string_lossy().into_owned())
            .collect();
        let relative_path = format!("{folder_name}/{}", parts.join("/"));
        let content = tokio::fs::read(&file)
            .await
            .with_context(|| format!("Failed to read '{}'", file.display()))?;
        log_debug!("Folder member {path}", path: relative_path.as_str());
        members.push(InputSource::folder_member(relative_path, content));
    }

    Ok(members)
}
