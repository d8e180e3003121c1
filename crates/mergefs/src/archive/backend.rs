// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::codec::{self, ArchiveOptions};
use crate::backend::StorageBackend;
use crate::error::{Error, Result};
use crate::log::Log;
use crate::path;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One record of the archive.
///
/// `name` is both the entry's own label and its key in the archive map.
/// The two are only ever changed together, through [`ArchiveBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    name: String,
    content: Bytes,
    dir: bool,
}

impl ArchiveEntry {
    #[must_use]
    pub fn file(name: String, content: Bytes) -> Self {
        Self {
            name,
            content,
            dir: false,
        }
    }

    /// A folder record; `name` carries the trailing separator
    #[must_use]
    pub fn directory(name: String) -> Self {
        Self {
            name: path::as_dir_prefix(&name).into_owned(),
            content: Bytes::new(),
            dir: true,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.dir
    }
}

type Entries = BTreeMap<String, ArchiveEntry>;

/// Storage backend over a flat path→entry map.
///
/// Writing `a/b/c` also records folder entries `a/` and `a/b/`, so the
/// map looks the way a zip tool would lay it out. Every operation holds the
/// map lock for its whole duration; a bulk rename or copy is never observed
/// half done.
pub struct ArchiveBackend {
    entries: Mutex<Entries>,
    options: ArchiveOptions,
    log: Arc<dyn Log>,
}

impl ArchiveBackend {
    /// Create an empty archive with default options
    pub fn new(log: Arc<dyn Log>) -> Self {
        Self::with_options(ArchiveOptions::default(), log)
    }

    pub fn with_options(options: ArchiveOptions, log: Arc<dyn Log>) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            options,
            log,
        }
    }

    /// Load an existing zip container so it can be extended
    pub async fn open(data: Bytes, options: ArchiveOptions, log: Arc<dyn Log>) -> Result<Self> {
        let decoded = tokio::task::spawn_blocking(move || codec::decode(&data)).await??;
        let mut entries = BTreeMap::new();
        for entry in decoded {
            insert(&mut entries, entry);
        }
        diagnostics::debug!("Opened archive with {count} entries", count: entries.len());
        Ok(Self {
            entries: Mutex::new(entries),
            options,
            log,
        })
    }

    #[must_use]
    pub fn log(&self) -> &dyn Log {
        self.log.as_ref()
    }

    #[must_use]
    pub fn options(&self) -> ArchiveOptions {
        self.options
    }

    /// Every key in the archive, folder entries included, in map order
    pub async fn paths(&self) -> Vec<String> {
        self.entries.lock().await.keys().cloned().collect()
    }

    /// Serialize the current entries into a zip container
    pub async fn encode(&self) -> Result<Vec<u8>> {
        let snapshot: Vec<ArchiveEntry> = self.entries.lock().await.values().cloned().collect();
        let options = self.options;
        diagnostics::debug!("Encoding {count} archive entries", count: snapshot.len());
        tokio::task::spawn_blocking(move || codec::encode(&snapshot, options)).await?
    }
}

/// Store `entry` under its own name
fn insert(entries: &mut Entries, entry: ArchiveEntry) {
    let _ = entries.insert(entry.name.clone(), entry);
}

/// Record folder entries for every missing ancestor of `name`
fn ensure_parents(entries: &mut Entries, name: &str) {
    for prefix in path::ancestors(name) {
        if !entries.contains_key(prefix) {
            insert(entries, ArchiveEntry::directory(prefix.to_string()));
        }
    }
}

/// Entries inside `from`, relabeled under `to`
fn relocated(entries: &Entries, from: &str, to: &str) -> Vec<(String, ArchiveEntry)> {
    entries
        .iter()
        .filter_map(|(key, entry)| {
            path::relocate(key, from, to).map(|name| {
                let mut moved = entry.clone();
                moved.name = name;
                (key.clone(), moved)
            })
        })
        .collect()
}

#[async_trait]
impl StorageBackend for ArchiveBackend {
    async fn exists(&self, path: &str) -> Result<bool> {
        path::check_relative(path)?;
        Ok(self.entries.lock().await.contains_key(path))
    }

    async fn read(&self, path: &str) -> Result<Bytes> {
        path::check_relative(path)?;
        match self.entries.lock().await.get(path) {
            Some(entry) if !entry.dir => Ok(entry.content.clone()),
            Some(_) => Err(Error::not_a_file(path)),
            None => Err(Error::not_found(path)),
        }
    }

    async fn write(&self, path: &str, data: Bytes) -> Result<()> {
        path::check_relative(path)?;
        if path.is_empty() {
            return Err(Error::empty_path());
        }
        if path::is_dir_prefix(path) {
            return Err(Error::not_a_file(path));
        }

        diagnostics::debug!("Archive write {path} ({size} bytes)", path: path, size: data.len());
        let mut entries = self.entries.lock().await;
        ensure_parents(&mut entries, path);
        insert(&mut entries, ArchiveEntry::file(path.to_string(), data));
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        path::check_relative(path)?;
        let mut entries = self.entries.lock().await;

        if entries.get(path).is_some_and(|entry| !entry.dir) {
            let _ = entries.remove(path);
            diagnostics::debug!("Archive delete file {path}", path: path);
            return Ok(());
        }

        let prefix = path::as_dir_prefix(path);
        let before = entries.len();
        entries.retain(|key, _| !path::is_within(key, &prefix));
        diagnostics::debug!(
            "Archive delete {prefix} removed {count} entries",
            prefix: &*prefix,
            count: before - entries.len()
        );
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        path::check_relative(from)?;
        path::check_relative(to)?;
        let target = path::relocation_target(from, to)?;
        let mut entries = self.entries.lock().await;

        // Take every match out before reinserting any, so a target key can
        // never clobber a source that has not moved yet.
        let moved = relocated(&entries, from, &target);
        for (old_key, _) in &moved {
            let _ = entries.remove(old_key);
        }
        for (_, entry) in moved {
            ensure_parents(&mut entries, &entry.name);
            insert(&mut entries, entry);
        }

        diagnostics::debug!("Archive rename {from} -> {to}", from: from, to: to);
        Ok(())
    }

    async fn copy(&self, from: &str, to: &str) -> Result<()> {
        path::check_relative(from)?;
        path::check_relative(to)?;
        let target = path::relocation_target(from, to)?;
        let mut entries = self.entries.lock().await;

        for (_, entry) in relocated(&entries, from, &target) {
            ensure_parents(&mut entries, &entry.name);
            insert(&mut entries, entry);
        }

        diagnostics::debug!("Archive copy {from} -> {to}", from: from, to: to);
        Ok(())
    }

    async fn lookup_file(&self, name: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().await;
        Ok(entries
            .values()
            .find(|entry| !entry.dir && path::basename(&entry.name) == name)
            .map(|entry| path::dirname(&entry.name)))
    }
}
