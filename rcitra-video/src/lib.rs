// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! PICA200 framebuffer operations for rcitra.
//!
//! Bit-exact packed pixel formats, Morton-tiled addressing and the output
//! merger (blending, logic ops, stencil actions, shadow map updates). Used
//! by the software renderer and as a reference when checking accelerated
//! backends.

pub mod codec;
pub mod error;
pub mod morton;
pub mod pica_float;
pub mod regs;
pub mod swrast;

pub use error::RegsError;
pub use regs::FramebufferRegs;
pub use swrast::Framebuffer;
