// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

/// Failure to turn raw PICA register words into a typed snapshot.
///
/// Any of these means the guest selected a hardware mode the pixel pipeline
/// has no implementation for. The draw must stop; there is no fallback pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegsError {
    #[error("unsupported {register} value 0x{value:X}")]
    UnsupportedFormat { register: &'static str, value: u32 },
}

impl RegsError {
    pub(crate) fn unsupported(register: &'static str, value: u32) -> Self {
        Self::UnsupportedFormat { register, value }
    }
}
