// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

/// Physical address on the 3DS bus (32-bit).
pub type PAddr = u32;

/// Virtual address in a guest process (32-bit).
pub type VAddr = u32;

/// Page size (4 KiB, matching ARM11).
pub const PAGE_SIZE: usize = 0x1000;

/// Base of the GPU-local video memory.
pub const VRAM_PADDR: PAddr = 0x1800_0000;

/// VRAM size (6 MiB).
pub const VRAM_SIZE: u32 = 0x0060_0000;

/// Base of the main FCRAM.
pub const FCRAM_PADDR: PAddr = 0x2000_0000;

/// FCRAM size on the Old 3DS (128 MiB).
pub const FCRAM_SIZE: u32 = 0x0800_0000;

/// Align a value down to the given power-of-two alignment.
#[inline]
pub const fn align_down(value: u32, alignment: u32) -> u32 {
    value & !(alignment - 1)
}
