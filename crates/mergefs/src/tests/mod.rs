// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Storage contract tests run against both backends.
//!
//! Each check takes any [`StorageBackend`] so the archive's prefix emulation
//! is held to exactly the behavior of a real directory tree.
