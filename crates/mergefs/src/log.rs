// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Progress sinks handed to every output.
//!
//! Messages written here are advisory: nothing in the merge reads them back
//! and no operation changes course because of a warning.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Injected sink for progress and warning lines
pub trait Log: Send + Sync {
    fn log(&self, message: &str);

    fn warn(&self, message: &str);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentLog;

impl Log for SilentLog {
    fn log(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}
}

/// Writes lines through the diagnostics emitter and counts warnings
#[derive(Debug, Default)]
pub struct ConsoleLog {
    warnings: AtomicUsize,
}

impl ConsoleLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of warnings written so far
    #[must_use]
    pub fn warn_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }
}

impl Log for ConsoleLog {
    fn log(&self, message: &str) {
        diagnostics::info!("{message}", message: message);
    }

    fn warn(&self, message: &str) {
        let _ = self.warnings.fetch_add(1, Ordering::Relaxed);
        diagnostics::warn!("WARNING: {message}", message: message);
    }
}
