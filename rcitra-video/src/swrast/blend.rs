// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output merger color stage: alpha blending and logic ops.
//!
//! Everything is 8-bit fixed point. Factors are 0..=255 standing for 0..=1,
//! products are renormalised by a truncating divide by 255.

use crate::regs::{BlendEquation, BlendFactor, BlendState, LogicOp};

/// Combine `src` and `dest` with per-channel factors.
///
/// Min and Max compare the raw colors and ignore both factors. This follows
/// the GL definition and has not been checked against hardware.
pub fn evaluate_blend_equation(
    src: [u8; 4],
    src_factor: [u8; 4],
    dest: [u8; 4],
    dest_factor: [u8; 4],
    equation: BlendEquation,
) -> [u8; 4] {
    let mut result = [0u8; 4];
    for i in 0..4 {
        let src_term = src[i] as i32 * src_factor[i] as i32;
        let dest_term = dest[i] as i32 * dest_factor[i] as i32;
        let value = match equation {
            BlendEquation::Add => (src_term + dest_term) / 255,
            BlendEquation::Subtract => (src_term - dest_term) / 255,
            BlendEquation::ReverseSubtract => (dest_term - src_term) / 255,
            BlendEquation::Min => src[i].min(dest[i]) as i32,
            BlendEquation::Max => src[i].max(dest[i]) as i32,
        };
        result[i] = value.clamp(0, 255) as u8;
    }
    result
}

/// Resolve `factor` for color channel `channel` (0 = R .. 3 = A).
pub fn lookup_blend_factor(
    factor: BlendFactor,
    channel: usize,
    src: [u8; 4],
    dest: [u8; 4],
    constant: [u8; 4],
) -> u8 {
    debug_assert!(channel < 4, "blend channel {} out of range", channel);
    match factor {
        BlendFactor::Zero => 0,
        BlendFactor::One => 255,
        BlendFactor::SourceColor => src[channel],
        BlendFactor::OneMinusSourceColor => 255 - src[channel],
        BlendFactor::DestColor => dest[channel],
        BlendFactor::OneMinusDestColor => 255 - dest[channel],
        BlendFactor::SourceAlpha => src[3],
        BlendFactor::OneMinusSourceAlpha => 255 - src[3],
        BlendFactor::DestAlpha => dest[3],
        BlendFactor::OneMinusDestAlpha => 255 - dest[3],
        BlendFactor::ConstantColor => constant[channel],
        BlendFactor::OneMinusConstantColor => 255 - constant[channel],
        BlendFactor::ConstantAlpha => constant[3],
        BlendFactor::OneMinusConstantAlpha => 255 - constant[3],
        BlendFactor::SourceAlphaSaturate => {
            if channel == 3 {
                255
            } else {
                src[3].min(255 - dest[3])
            }
        }
    }
}

/// Full alpha-blend stage: RGB through the RGB equation, alpha through the
/// alpha equation, each with its own factor pair.
pub fn blend(src: [u8; 4], dest: [u8; 4], constant: [u8; 4], state: &BlendState) -> [u8; 4] {
    let factors = |rgb: BlendFactor, alpha: BlendFactor| {
        [
            lookup_blend_factor(rgb, 0, src, dest, constant),
            lookup_blend_factor(rgb, 1, src, dest, constant),
            lookup_blend_factor(rgb, 2, src, dest, constant),
            lookup_blend_factor(alpha, 3, src, dest, constant),
        ]
    };
    let src_factor = factors(state.factor_source_rgb, state.factor_source_a);
    let dest_factor = factors(state.factor_dest_rgb, state.factor_dest_a);

    let mut output =
        evaluate_blend_equation(src, src_factor, dest, dest_factor, state.equation_rgb);
    output[3] =
        evaluate_blend_equation(src, src_factor, dest, dest_factor, state.equation_a)[3];
    output
}

/// Bitwise combine one channel.
pub fn logic_op(src: u8, dest: u8, op: LogicOp) -> u8 {
    match op {
        LogicOp::Clear => 0,
        LogicOp::And => src & dest,
        LogicOp::AndReverse => src & !dest,
        LogicOp::Copy => src,
        LogicOp::Set => 255,
        LogicOp::CopyInverted => !src,
        LogicOp::NoOp => dest,
        LogicOp::Invert => !dest,
        LogicOp::Nand => !(src & dest),
        LogicOp::Or => src | dest,
        LogicOp::Nor => !(src | dest),
        LogicOp::Xor => src ^ dest,
        LogicOp::Equiv => !(src ^ dest),
        LogicOp::AndInverted => !src & dest,
        LogicOp::OrReverse => src | !dest,
        LogicOp::OrInverted => !src | dest,
    }
}

/// Apply `op` to each channel independently.
pub fn logic_op_color(src: [u8; 4], dest: [u8; 4], op: LogicOp) -> [u8; 4] {
    [
        logic_op(src[0], dest[0], op),
        logic_op(src[1], dest[1], op),
        logic_op(src[2], dest[2], op),
        logic_op(src[3], dest[3], op),
    ]
}
