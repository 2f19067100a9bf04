// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Packed depth/stencil formats and the shadow map texel.
//!
//! Depth buffers are little-endian. D24S8 keeps depth in bytes 0..3 and
//! stencil in byte 3; the `X` encoders write one field and leave the other
//! untouched.
//!
//! Shadow maps live in the color buffer and reuse the D24S8 footprint, but
//! store depth big-endian. The two are not interchangeable.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

pub fn decode_d16(bytes: &[u8]) -> u32 {
    LittleEndian::read_u16(bytes) as u32
}

pub fn decode_d24(bytes: &[u8]) -> u32 {
    LittleEndian::read_u24(bytes)
}

/// Returns `(depth, stencil)`.
pub fn decode_d24s8(bytes: &[u8]) -> (u32, u8) {
    (LittleEndian::read_u24(bytes), bytes[3])
}

pub fn encode_d16(value: u32, bytes: &mut [u8]) {
    LittleEndian::write_u16(bytes, value as u16);
}

pub fn encode_d24(value: u32, bytes: &mut [u8]) {
    LittleEndian::write_u24(bytes, value & 0xFF_FFFF);
}

pub fn encode_d24s8(depth: u32, stencil: u8, bytes: &mut [u8]) {
    encode_d24x8(depth, bytes);
    encode_x24s8(stencil, bytes);
}

/// Write only the depth field of a D24S8 pixel.
pub fn encode_d24x8(depth: u32, bytes: &mut [u8]) {
    LittleEndian::write_u24(bytes, depth & 0xFF_FFFF);
}

/// Write only the stencil field of a D24S8 pixel.
pub fn encode_x24s8(stencil: u8, bytes: &mut [u8]) {
    bytes[3] = stencil;
}

// ── Shadow map texel ────────────────────────────────────────────────────────

/// Decoded shadow map texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowTexel {
    /// 24-bit depth; lower is closer to the light.
    pub depth: u32,
    pub stencil: u8,
}

pub fn decode_d24s8_shadow(bytes: &[u8]) -> ShadowTexel {
    ShadowTexel {
        depth: BigEndian::read_u24(bytes),
        stencil: bytes[3],
    }
}

/// Write only the depth field of a shadow texel.
pub fn encode_d24x8_shadow(depth: u32, bytes: &mut [u8]) {
    BigEndian::write_u24(bytes, depth & 0xFF_FFFF);
}

/// Write only the stencil field of a shadow texel.
pub fn encode_x24s8_shadow(stencil: u8, bytes: &mut [u8]) {
    bytes[3] = stencil;
}
