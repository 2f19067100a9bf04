// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! PICA reduced-precision floats.
//!
//! Registers store these as 1.5.10 sign/exponent/mantissa bit patterns.
//! The value is held as an `f32`; arithmetic happens at `f32` precision and
//! is not re-quantised, matching the behaviour we reproduce for the shadow
//! attenuation path.

use std::ops::{Add, Div, Mul};

const MANTISSA_BITS: u32 = 10;
const EXPONENT_BITS: u32 = 5;
/// Difference between the f32 exponent bias (127) and ours (15).
const BIAS_ADJUST: u32 = 128 - (1 << (EXPONENT_BITS - 1));

/// 16-bit PICA float (1 sign, 5 exponent, 10 mantissa bits).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Float16(f32);

impl Float16 {
    /// Decode a raw register bit pattern. Denormals flush to signed zero and
    /// the all-ones exponent maps to infinity/NaN.
    pub fn from_raw(raw: u16) -> Self {
        let raw = raw as u32;
        let mantissa = raw & ((1 << MANTISSA_BITS) - 1);
        let exponent = (raw >> MANTISSA_BITS) & ((1 << EXPONENT_BITS) - 1);
        let sign = (raw >> (MANTISSA_BITS + EXPONENT_BITS)) & 1;

        let bits = if exponent == 0 {
            sign << 31
        } else {
            let exponent = if exponent == (1 << EXPONENT_BITS) - 1 {
                0xFF
            } else {
                exponent + BIAS_ADJUST
            };
            (sign << 31) | (exponent << 23) | (mantissa << (23 - MANTISSA_BITS))
        };
        Self(f32::from_bits(bits))
    }

    pub fn from_f32(value: f32) -> Self {
        Self(value)
    }

    pub fn to_f32(self) -> f32 {
        self.0
    }

    pub fn zero() -> Self {
        Self(0.0)
    }
}

impl Add for Float16 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul for Float16 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let result = self.0 * rhs.0;
        // The GPU produces 0 rather than NaN for inf * 0.
        if result.is_nan() && !self.0.is_nan() && !rhs.0.is_nan() {
            Self(0.0)
        } else {
            Self(result)
        }
    }
}

impl Div for Float16 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self(self.0 / rhs.0)
    }
}
