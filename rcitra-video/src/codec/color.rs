// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Packed color formats.
//!
//! Colors are `[r, g, b, a]`. Narrow channels expand to 8 bits by bit
//! replication on decode and are truncated on encode. 16-bit formats are
//! little-endian words; RGBA8 and RGB8 are stored channel-reversed.

use byteorder::{ByteOrder, LittleEndian};

use crate::regs::ColorFormat;

// ── Channel width conversion ────────────────────────────────────────────────

#[inline]
pub const fn convert_1_to_8(value: u8) -> u8 {
    value * 255
}

#[inline]
pub const fn convert_4_to_8(value: u8) -> u8 {
    (value << 4) | value
}

#[inline]
pub const fn convert_5_to_8(value: u8) -> u8 {
    (value << 3) | (value >> 2)
}

#[inline]
pub const fn convert_6_to_8(value: u8) -> u8 {
    (value << 2) | (value >> 4)
}

#[inline]
pub const fn convert_8_to_1(value: u8) -> u8 {
    value >> 7
}

#[inline]
pub const fn convert_8_to_4(value: u8) -> u8 {
    value >> 4
}

#[inline]
pub const fn convert_8_to_5(value: u8) -> u8 {
    value >> 3
}

#[inline]
pub const fn convert_8_to_6(value: u8) -> u8 {
    value >> 2
}

// ── Decode ──────────────────────────────────────────────────────────────────

/// Bytes: A, B, G, R.
pub fn decode_rgba8(bytes: &[u8]) -> [u8; 4] {
    [bytes[3], bytes[2], bytes[1], bytes[0]]
}

/// Bytes: B, G, R. Alpha reads as opaque.
pub fn decode_rgb8(bytes: &[u8]) -> [u8; 4] {
    [bytes[2], bytes[1], bytes[0], 255]
}

pub fn decode_rgb565(bytes: &[u8]) -> [u8; 4] {
    let pixel = LittleEndian::read_u16(bytes);
    [
        convert_5_to_8(((pixel >> 11) & 0x1F) as u8),
        convert_6_to_8(((pixel >> 5) & 0x3F) as u8),
        convert_5_to_8((pixel & 0x1F) as u8),
        255,
    ]
}

pub fn decode_rgb5a1(bytes: &[u8]) -> [u8; 4] {
    let pixel = LittleEndian::read_u16(bytes);
    [
        convert_5_to_8(((pixel >> 11) & 0x1F) as u8),
        convert_5_to_8(((pixel >> 6) & 0x1F) as u8),
        convert_5_to_8(((pixel >> 1) & 0x1F) as u8),
        convert_1_to_8((pixel & 0x1) as u8),
    ]
}

pub fn decode_rgba4(bytes: &[u8]) -> [u8; 4] {
    let pixel = LittleEndian::read_u16(bytes);
    [
        convert_4_to_8(((pixel >> 12) & 0xF) as u8),
        convert_4_to_8(((pixel >> 8) & 0xF) as u8),
        convert_4_to_8(((pixel >> 4) & 0xF) as u8),
        convert_4_to_8((pixel & 0xF) as u8),
    ]
}

/// Decode one pixel of `format` from the start of `bytes`.
pub fn decode(format: ColorFormat, bytes: &[u8]) -> [u8; 4] {
    match format {
        ColorFormat::Rgba8 => decode_rgba8(bytes),
        ColorFormat::Rgb8 => decode_rgb8(bytes),
        ColorFormat::Rgb5a1 => decode_rgb5a1(bytes),
        ColorFormat::Rgb565 => decode_rgb565(bytes),
        ColorFormat::Rgba4 => decode_rgba4(bytes),
    }
}

// ── Encode ──────────────────────────────────────────────────────────────────

pub fn encode_rgba8(color: [u8; 4], bytes: &mut [u8]) {
    bytes[3] = color[0];
    bytes[2] = color[1];
    bytes[1] = color[2];
    bytes[0] = color[3];
}

pub fn encode_rgb8(color: [u8; 4], bytes: &mut [u8]) {
    bytes[2] = color[0];
    bytes[1] = color[1];
    bytes[0] = color[2];
}

pub fn encode_rgb565(color: [u8; 4], bytes: &mut [u8]) {
    let pixel = ((convert_8_to_5(color[0]) as u16) << 11)
        | ((convert_8_to_6(color[1]) as u16) << 5)
        | convert_8_to_5(color[2]) as u16;
    LittleEndian::write_u16(bytes, pixel);
}

pub fn encode_rgb5a1(color: [u8; 4], bytes: &mut [u8]) {
    let pixel = ((convert_8_to_5(color[0]) as u16) << 11)
        | ((convert_8_to_5(color[1]) as u16) << 6)
        | ((convert_8_to_5(color[2]) as u16) << 1)
        | convert_8_to_1(color[3]) as u16;
    LittleEndian::write_u16(bytes, pixel);
}

pub fn encode_rgba4(color: [u8; 4], bytes: &mut [u8]) {
    let pixel = ((convert_8_to_4(color[0]) as u16) << 12)
        | ((convert_8_to_4(color[1]) as u16) << 8)
        | ((convert_8_to_4(color[2]) as u16) << 4)
        | convert_8_to_4(color[3]) as u16;
    LittleEndian::write_u16(bytes, pixel);
}

/// Encode `color` as `format` into the start of `bytes`.
pub fn encode(format: ColorFormat, color: [u8; 4], bytes: &mut [u8]) {
    match format {
        ColorFormat::Rgba8 => encode_rgba8(color, bytes),
        ColorFormat::Rgb8 => encode_rgb8(color, bytes),
        ColorFormat::Rgb5a1 => encode_rgb5a1(color, bytes),
        ColorFormat::Rgb565 => encode_rgb565(color, bytes),
        ColorFormat::Rgba4 => encode_rgba4(color, bytes),
    }
}
