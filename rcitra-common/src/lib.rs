// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod memory;
pub mod types;

pub use memory::{PhysicalMemory, RamRegion};
pub use types::*;
