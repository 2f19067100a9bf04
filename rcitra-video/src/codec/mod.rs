// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bit-exact pixel encodings as the PICA lays them out in memory.

pub mod color;
pub mod depth;
