// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! PICA tiled surface addressing.
//!
//! Surfaces are split into 8x8 tiles stored one after another along a band
//! of 8 rows. Inside a tile, pixels follow a Z-order (Morton) curve: each
//! 2x2 block is laid out
//!
//! ```text
//! 2 3
//! 0 1
//! ```
//!
//! and every bigger 4x4 / 8x8 block nests the smaller ones the same way.
//! Rows are counted from the bottom of the surface.

use rcitra_common::align_down;

/// Tile edge length in pixels.
pub const TILE_SIZE: u32 = 8;

/// Z-order index (0..64) of pixel `(x, y)` inside its 8x8 tile.
///
/// x bits land on even positions, y bits on odd positions.
#[inline]
pub fn morton_interleave(x: u32, y: u32) -> u32 {
    let mut i = (x & 7) | ((y & 7) << 8); // ---- -210
    i = (i ^ (i << 2)) & 0x1313; //          ---2 --10
    i = (i ^ (i << 1)) & 0x1515; //          ---2 -1-0
    (i | (i >> 7)) & 0x3F
}

/// Byte offset of `(x, y)` within its 8-row band.
#[inline]
pub fn morton_offset(x: u32, y: u32, bytes_per_pixel: u32) -> u32 {
    let coarse_x = align_down(x, TILE_SIZE);
    (morton_interleave(x, y) + coarse_x * TILE_SIZE) * bytes_per_pixel
}

/// Byte offset of window pixel `(x, y)` in a bottom-up tiled buffer.
///
/// `height` is the framebuffer height register (real height minus one), so
/// `y = height` addresses the first stored row. No bounds checks.
#[inline]
pub fn tiled_offset(x: u32, y: u32, bytes_per_pixel: u32, width: u32, height: u32) -> u32 {
    let y = height.wrapping_sub(y);
    let coarse_y = align_down(y, TILE_SIZE);
    morton_offset(x, y, bytes_per_pixel) + coarse_y * width * bytes_per_pixel
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tile layout, top row first, as documented for the hardware.
    const TILE: [[u32; 8]; 8] = [
        [42, 43, 46, 47, 58, 59, 62, 63],
        [40, 41, 44, 45, 56, 57, 60, 61],
        [34, 35, 38, 39, 50, 51, 54, 55],
        [32, 33, 36, 37, 48, 49, 52, 53],
        [10, 11, 14, 15, 26, 27, 30, 31],
        [8, 9, 12, 13, 24, 25, 28, 29],
        [2, 3, 6, 7, 18, 19, 22, 23],
        [0, 1, 4, 5, 16, 17, 20, 21],
    ];

    #[test]
    fn test_morton_interleave_matches_tile_layout() {
        for (row, entries) in TILE.iter().enumerate() {
            let y = 7 - row as u32;
            for (x, &expected) in entries.iter().enumerate() {
                assert_eq!(morton_interleave(x as u32, y), expected, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_morton_offset_reference_table() {
        let table: [((u32, u32), u32); 10] = [
            ((0, 0), 0),
            ((1, 0), 4),
            ((0, 1), 8),
            ((1, 1), 12),
            ((2, 0), 16),
            ((0, 2), 32),
            ((5, 2), 100),
            ((3, 5), 156),
            ((7, 7), 252),
            ((8, 0), 256),
        ];
        for ((x, y), expected) in table {
            assert_eq!(morton_offset(x, y, 4), expected, "({}, {})", x, y);
        }
    }

    #[test]
    fn test_morton_offset_unique_within_band() {
        // 16x8 band at 2 bytes per pixel covers 0..256 exactly once.
        let mut seen = [false; 128];
        for y in 0..8 {
            for x in 0..16 {
                let slot = (morton_offset(x, y, 2) / 2) as usize;
                assert!(!seen[slot], "duplicate slot {} at ({}, {})", slot, x, y);
                seen[slot] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_morton_ignores_band_bits() {
        assert_eq!(morton_offset(3, 13, 4), morton_offset(3, 5, 4));
    }

    #[test]
    fn test_tiled_offset_flips_vertically() {
        // 16 wide, 16 tall (height register 15), 4 bytes per pixel.
        assert_eq!(tiled_offset(0, 15, 4, 16, 15), 0);
        assert_eq!(tiled_offset(1, 15, 4, 16, 15), 4);
        assert_eq!(tiled_offset(0, 14, 4, 16, 15), 8);
        // y' = 8 starts the second band: 16 * 8 * 4 bytes in.
        assert_eq!(tiled_offset(0, 7, 4, 16, 15), 512);
        // y' = 15 -> band 8, inner row 7.
        assert_eq!(tiled_offset(0, 0, 4, 16, 15), 512 + 42 * 4);
        // x = 9 lives in the second tile of the band.
        assert_eq!(tiled_offset(9, 15, 4, 16, 15), (64 + 1) * 4);
    }

    #[test]
    fn test_tiled_offset_scales_with_bpp() {
        assert_eq!(tiled_offset(1, 15, 3, 16, 15), 3);
        assert_eq!(tiled_offset(0, 7, 2, 16, 15), 16 * 8 * 2);
    }
}
