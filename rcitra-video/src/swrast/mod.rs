// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Software pixel pipeline.
//!
//! The rasterizer hands each covered fragment to these stages after its own
//! depth/stencil tests: blend or logic-op the color, apply the chosen stencil
//! action, then write through the [`Framebuffer`].

pub mod blend;
pub mod framebuffer;
pub mod stencil;

pub use blend::{blend, evaluate_blend_equation, logic_op, logic_op_color};
pub use framebuffer::Framebuffer;
pub use stencil::perform_stencil_action;
