// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur while merging sources into an output
#[derive(Debug, Error)]
pub enum Error {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    /// Absolute paths and `..` components are refused by every backend
    #[error("Path escapes output root: {0}")]
    PathEscapesRoot(String),

    #[error("Cannot copy '{from}' into itself at '{to}'")]
    CopyIntoItself { from: String, to: String },

    #[error("Path is empty")]
    EmptyPath,

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn not_found<S: AsRef<str>>(path: S) -> Self {
        Error::NotFound(path.as_ref().to_string())
    }

    pub fn not_a_file<S: AsRef<str>>(path: S) -> Self {
        Error::NotAFile(path.as_ref().to_string())
    }

    pub fn path_escapes_root<S: AsRef<str>>(path: S) -> Self {
        Error::PathEscapesRoot(path.as_ref().to_string())
    }

    pub fn copy_into_itself<S: AsRef<str>>(from: S, to: S) -> Self {
        Error::CopyIntoItself {
            from: from.as_ref().to_string(),
            to: to.as_ref().to_string(),
        }
    }

    pub fn empty_path() -> Self {
        Error::EmptyPath
    }

    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True when the error reports a missing path, whichever backend raised it
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
