// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! PICA framebuffer and output-merger register definitions.
//!
//! Raw register words are decoded once per draw into typed snapshots. Every
//! selector is a closed enum: values the hardware defines but we do not
//! implement are rejected with [`RegsError::UnsupportedFormat`] instead of
//! being mapped to a default.

use bitflags::bitflags;
use rcitra_common::PAddr;

use crate::error::RegsError;

// ── Pixel formats ───────────────────────────────────────────────────────────

/// Color buffer format (`COLORBUFFER_FORMAT` bits 16..=18).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ColorFormat {
    Rgba8 = 0,
    Rgb8 = 1,
    Rgb5a1 = 2,
    Rgb565 = 3,
    Rgba4 = 4,
}

impl ColorFormat {
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::Rgba8 => 4,
            Self::Rgb8 => 3,
            Self::Rgb5a1 | Self::Rgb565 | Self::Rgba4 => 2,
        }
    }
}

impl TryFrom<u32> for ColorFormat {
    type Error = RegsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Rgba8),
            1 => Ok(Self::Rgb8),
            2 => Ok(Self::Rgb5a1),
            3 => Ok(Self::Rgb565),
            4 => Ok(Self::Rgba4),
            _ => Err(RegsError::unsupported("color format", value)),
        }
    }
}

/// Depth buffer format (`DEPTHBUFFER_FORMAT` bits 0..=1). Value 1 is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum DepthFormat {
    D16 = 0,
    D24 = 2,
    D24S8 = 3,
}

impl DepthFormat {
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::D16 => 2,
            Self::D24 => 3,
            Self::D24S8 => 4,
        }
    }

    /// Bits of depth precision.
    pub const fn bits(self) -> u32 {
        match self {
            Self::D16 => 16,
            Self::D24 | Self::D24S8 => 24,
        }
    }

    /// Largest storable depth value.
    pub const fn max_depth(self) -> u32 {
        (1 << self.bits()) - 1
    }

    pub const fn has_stencil(self) -> bool {
        matches!(self, Self::D24S8)
    }
}

impl TryFrom<u32> for DepthFormat {
    type Error = RegsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::D16),
            2 => Ok(Self::D24),
            3 => Ok(Self::D24S8),
            _ => Err(RegsError::unsupported("depth format", value)),
        }
    }
}

// ── Output merger state ─────────────────────────────────────────────────────

/// Blend equation (`BLEND_FUNC` bits 0..=7 for RGB, 8..=15 for alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum BlendEquation {
    Add = 0,
    Subtract = 1,
    ReverseSubtract = 2,
    Min = 3,
    Max = 4,
}

impl TryFrom<u32> for BlendEquation {
    type Error = RegsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Add),
            1 => Ok(Self::Subtract),
            2 => Ok(Self::ReverseSubtract),
            3 => Ok(Self::Min),
            4 => Ok(Self::Max),
            _ => Err(RegsError::unsupported("blend equation", value)),
        }
    }
}

/// Blend factor (4-bit fields of `BLEND_FUNC`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum BlendFactor {
    Zero = 0,
    One = 1,
    SourceColor = 2,
    OneMinusSourceColor = 3,
    DestColor = 4,
    OneMinusDestColor = 5,
    SourceAlpha = 6,
    OneMinusSourceAlpha = 7,
    DestAlpha = 8,
    OneMinusDestAlpha = 9,
    ConstantColor = 10,
    OneMinusConstantColor = 11,
    ConstantAlpha = 12,
    OneMinusConstantAlpha = 13,
    SourceAlphaSaturate = 14,
}

impl TryFrom<u32> for BlendFactor {
    type Error = RegsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            2 => Ok(Self::SourceColor),
            3 => Ok(Self::OneMinusSourceColor),
            4 => Ok(Self::DestColor),
            5 => Ok(Self::OneMinusDestColor),
            6 => Ok(Self::SourceAlpha),
            7 => Ok(Self::OneMinusSourceAlpha),
            8 => Ok(Self::DestAlpha),
            9 => Ok(Self::OneMinusDestAlpha),
            10 => Ok(Self::ConstantColor),
            11 => Ok(Self::OneMinusConstantColor),
            12 => Ok(Self::ConstantAlpha),
            13 => Ok(Self::OneMinusConstantAlpha),
            14 => Ok(Self::SourceAlphaSaturate),
            _ => Err(RegsError::unsupported("blend factor", value)),
        }
    }
}

/// Bitwise logic operation (`LOGIC_OP` bits 0..=3). All 16 encodings are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum LogicOp {
    Clear = 0,
    And = 1,
    AndReverse = 2,
    Copy = 3,
    Set = 4,
    CopyInverted = 5,
    NoOp = 6,
    Invert = 7,
    Nand = 8,
    Or = 9,
    Nor = 10,
    Xor = 11,
    Equiv = 12,
    AndInverted = 13,
    OrReverse = 14,
    OrInverted = 15,
}

impl LogicOp {
    /// Decode the 4-bit field. Only the low nibble is inspected.
    pub const fn from_raw(value: u32) -> Self {
        match value & 0xF {
            0 => Self::Clear,
            1 => Self::And,
            2 => Self::AndReverse,
            3 => Self::Copy,
            4 => Self::Set,
            5 => Self::CopyInverted,
            6 => Self::NoOp,
            7 => Self::Invert,
            8 => Self::Nand,
            9 => Self::Or,
            10 => Self::Nor,
            11 => Self::Xor,
            12 => Self::Equiv,
            13 => Self::AndInverted,
            14 => Self::OrReverse,
            _ => Self::OrInverted,
        }
    }
}

/// Stencil buffer update action (3-bit fields of `STENCIL_OP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum StencilAction {
    Keep = 0,
    Zero = 1,
    Replace = 2,
    Increment = 3,
    Decrement = 4,
    Invert = 5,
    IncrementWrap = 6,
    DecrementWrap = 7,
}

impl TryFrom<u32> for StencilAction {
    type Error = RegsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Keep),
            1 => Ok(Self::Zero),
            2 => Ok(Self::Replace),
            3 => Ok(Self::Increment),
            4 => Ok(Self::Decrement),
            5 => Ok(Self::Invert),
            6 => Ok(Self::IncrementWrap),
            7 => Ok(Self::DecrementWrap),
            _ => Err(RegsError::unsupported("stencil action", value)),
        }
    }
}

/// Alpha blending configuration, decoded from one `BLEND_FUNC` word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendState {
    pub equation_rgb: BlendEquation,
    pub equation_a: BlendEquation,
    pub factor_source_rgb: BlendFactor,
    pub factor_dest_rgb: BlendFactor,
    pub factor_source_a: BlendFactor,
    pub factor_dest_a: BlendFactor,
}

impl BlendState {
    /// Decode `BLEND_FUNC`:
    /// `[31:28] dst_a [27:24] src_a [23:20] dst_rgb [19:16] src_rgb [15:8] eq_a [7:0] eq_rgb`.
    pub fn from_raw(raw: u32) -> Result<Self, RegsError> {
        Ok(Self {
            equation_rgb: BlendEquation::try_from(raw & 0xFF)?,
            equation_a: BlendEquation::try_from((raw >> 8) & 0xFF)?,
            factor_source_rgb: BlendFactor::try_from((raw >> 16) & 0xF)?,
            factor_dest_rgb: BlendFactor::try_from((raw >> 20) & 0xF)?,
            factor_source_a: BlendFactor::try_from((raw >> 24) & 0xF)?,
            factor_dest_a: BlendFactor::try_from((raw >> 28) & 0xF)?,
        })
    }
}

impl Default for BlendState {
    /// Source-over with straight alpha.
    fn default() -> Self {
        Self {
            equation_rgb: BlendEquation::Add,
            equation_a: BlendEquation::Add,
            factor_source_rgb: BlendFactor::SourceAlpha,
            factor_dest_rgb: BlendFactor::OneMinusSourceAlpha,
            factor_source_a: BlendFactor::SourceAlpha,
            factor_dest_a: BlendFactor::OneMinusSourceAlpha,
        }
    }
}

/// Decode `BLEND_COLOR` into an RGBA constant.
pub fn blend_constant_from_raw(raw: u32) -> [u8; 4] {
    raw.to_le_bytes()
}

bitflags! {
    /// Per-channel color write enables (`DEPTH_COLOR_MASK` bits 8..=11).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ColorWriteMask: u8 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
    }
}

impl ColorWriteMask {
    pub fn from_depth_color_mask(raw: u32) -> Self {
        Self::from_bits_truncate(((raw >> 8) & 0xF) as u8)
    }

    /// Whether channel `index` (0 = R .. 3 = A) is writable.
    pub fn channel_enabled(self, index: usize) -> bool {
        match index {
            0 => self.contains(Self::RED),
            1 => self.contains(Self::GREEN),
            2 => self.contains(Self::BLUE),
            3 => self.contains(Self::ALPHA),
            _ => false,
        }
    }
}

// ── Framebuffer configuration ───────────────────────────────────────────────

/// Shadow attenuation coefficients, raw float16 bit patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadowRegs {
    pub constant: u16,
    pub linear: u16,
}

impl ShadowRegs {
    /// Decode `SHADOW`: `[15:0] constant`, `[31:16] linear`.
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            constant: (raw & 0xFFFF) as u16,
            linear: (raw >> 16) as u16,
        }
    }
}

/// Framebuffer register words as the guest wrote them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFramebufferRegs {
    /// Physical address >> 3.
    pub color_buffer_address: u32,
    /// Physical address >> 3.
    pub depth_buffer_address: u32,
    /// `[10:0] width`, `[21:12] height - 1`.
    pub dimensions: u32,
    /// `[18:16] color format`.
    pub color_format: u32,
    /// `[1:0] depth format`.
    pub depth_format: u32,
    pub shadow: u32,
}

/// Typed framebuffer snapshot. Valid for one draw only; the guest may
/// rewrite the registers between draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferRegs {
    pub color_format: ColorFormat,
    pub depth_format: DepthFormat,
    pub width: u32,
    /// Register value, which is the real height minus one.
    pub height: u32,
    pub color_buffer_address: PAddr,
    pub depth_buffer_address: PAddr,
    pub shadow: ShadowRegs,
}

impl FramebufferRegs {
    /// Decode the raw register words. Unsupported selectors are logged at
    /// error level and returned; the caller must not draw with them.
    pub fn decode(raw: &RawFramebufferRegs) -> Result<Self, RegsError> {
        let decoded = Self::decode_inner(raw);
        if let Err(e) = &decoded {
            log::error!("FramebufferRegs: {}, draw rejected", e);
        }
        decoded
    }

    fn decode_inner(raw: &RawFramebufferRegs) -> Result<Self, RegsError> {
        Ok(Self {
            color_format: ColorFormat::try_from((raw.color_format >> 16) & 0x7)?,
            depth_format: DepthFormat::try_from(raw.depth_format & 0x3)?,
            width: raw.dimensions & 0x7FF,
            height: (raw.dimensions >> 12) & 0x3FF,
            color_buffer_address: decode_address_register(raw.color_buffer_address),
            depth_buffer_address: decode_address_register(raw.depth_buffer_address),
            shadow: ShadowRegs::from_raw(raw.shadow),
        })
    }
}

/// Buffer address registers hold the physical address in 8-byte units.
#[inline]
pub const fn decode_address_register(raw: u32) -> PAddr {
    raw.wrapping_mul(8)
}
