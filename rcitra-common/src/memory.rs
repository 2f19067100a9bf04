// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Physical memory access for fixed-function GPU units.
//!
//! The pixel pipeline addresses buffers by physical address and trusts the
//! caller that the address and everything it touches past it is mapped.
//! Implementations hand out the bytes from `addr` to the end of whatever
//! region backs it; indexing past that region panics.

use crate::types::PAddr;

/// Byte-addressable view of emulated physical memory.
pub trait PhysicalMemory {
    /// Bytes starting at `addr` up to the end of the backing region.
    fn physical_slice(&self, addr: PAddr) -> &[u8];

    /// Mutable bytes starting at `addr` up to the end of the backing region.
    fn physical_slice_mut(&mut self, addr: PAddr) -> &mut [u8];
}

/// A contiguous block of physical memory (VRAM, FCRAM, or a test buffer).
pub struct RamRegion {
    base: PAddr,
    data: Vec<u8>,
}

impl RamRegion {
    /// Create a zero-filled region of `size` bytes starting at `base`.
    pub fn new(base: PAddr, size: usize) -> Self {
        Self {
            base,
            data: vec![0u8; size],
        }
    }

    pub fn base(&self) -> PAddr {
        self.base
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `addr` falls inside this region.
    pub fn contains(&self, addr: PAddr) -> bool {
        addr >= self.base && ((addr - self.base) as usize) < self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn index(&self, addr: PAddr) -> usize {
        debug_assert!(
            addr >= self.base,
            "physical address 0x{:08X} below region base 0x{:08X}",
            addr,
            self.base
        );
        (addr - self.base) as usize
    }
}

impl PhysicalMemory for RamRegion {
    fn physical_slice(&self, addr: PAddr) -> &[u8] {
        &self.data[self.index(addr)..]
    }

    fn physical_slice_mut(&mut self, addr: PAddr) -> &mut [u8] {
        let idx = self.index(addr);
        &mut self.data[idx..]
    }
}
