// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stencil update actions, applied after the caller has run the stencil and
//! depth tests and picked which action applies.

use crate::regs::StencilAction;

/// Compute the new stencil value for `action`.
pub fn perform_stencil_action(action: StencilAction, old_stencil: u8, reference: u8) -> u8 {
    match action {
        StencilAction::Keep => old_stencil,
        StencilAction::Zero => 0,
        StencilAction::Replace => reference,
        StencilAction::Increment => old_stencil.saturating_add(1),
        StencilAction::Decrement => old_stencil.saturating_sub(1),
        StencilAction::Invert => !old_stencil,
        StencilAction::IncrementWrap => old_stencil.wrapping_add(1),
        StencilAction::DecrementWrap => old_stencil.wrapping_sub(1),
    }
}

/// Merge `new_stencil` into `old_stencil`, keeping bits cleared in `write_mask`.
#[inline]
pub fn apply_write_mask(old_stencil: u8, new_stencil: u8, write_mask: u8) -> u8 {
    (old_stencil & !write_mask) | (new_stencil & write_mask)
}
