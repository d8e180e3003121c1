// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod extract;
pub mod pack;

pub use extract::extract_command;
pub use pack::pack_command;
