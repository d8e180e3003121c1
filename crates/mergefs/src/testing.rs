// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared by the unit test modules

use crate::log::Log;
use std::sync::Mutex;

/// A log sink that keeps every line so tests can assert on them
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl RecordingLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log lines poisoned").clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("log warnings poisoned").clone()
    }
}

impl Log for RecordingLog {
    fn log(&self, message: &str) {
        self.lines
            .lock()
            .expect("log lines poisoned")
            .push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings
            .lock()
            .expect("log warnings poisoned")
            .push(message.to_string());
    }
}
