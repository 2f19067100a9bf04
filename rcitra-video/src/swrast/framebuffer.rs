// SPDX-FileCopyrightText: 2025 rcitra contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-fragment access to the color, depth/stencil and shadow buffers.
//!
//! A [`Framebuffer`] borrows guest memory and the register snapshot for the
//! duration of one draw. Nothing is cached: offsets and formats are derived
//! from the snapshot on every access. Coordinates are window space and are
//! never bounds-checked.

use rcitra_common::{PAddr, PhysicalMemory};

use crate::codec::{color, depth};
use crate::morton::tiled_offset;
use crate::pica_float::Float16;
use crate::regs::{ColorWriteMask, DepthFormat, FramebufferRegs, ShadowRegs, StencilAction};
use crate::swrast::stencil::{apply_write_mask, perform_stencil_action};

/// Shadow maps are always 32 bits per texel regardless of the color format.
const SHADOW_BYTES_PER_PIXEL: u32 = 4;

pub struct Framebuffer<'a, M: PhysicalMemory + ?Sized> {
    memory: &'a mut M,
    regs: &'a FramebufferRegs,
}

impl<'a, M: PhysicalMemory + ?Sized> Framebuffer<'a, M> {
    pub fn new(memory: &'a mut M, regs: &'a FramebufferRegs) -> Self {
        log::trace!(
            "Framebuffer: {}x{} color {:?} @ 0x{:08X}, depth {:?} @ 0x{:08X}",
            regs.width,
            regs.height + 1,
            regs.color_format,
            regs.color_buffer_address,
            regs.depth_format,
            regs.depth_buffer_address
        );
        Self { memory, regs }
    }

    pub fn regs(&self) -> &FramebufferRegs {
        self.regs
    }

    // ── Addressing ─────────────────────────────────────────────────────

    fn pixel_address(&self, base: PAddr, x: u32, y: u32, bytes_per_pixel: u32) -> PAddr {
        base + tiled_offset(x, y, bytes_per_pixel, self.regs.width, self.regs.height)
    }

    fn color_address(&self, x: u32, y: u32) -> PAddr {
        let bpp = self.regs.color_format.bytes_per_pixel();
        self.pixel_address(self.regs.color_buffer_address, x, y, bpp)
    }

    fn depth_address(&self, x: u32, y: u32) -> PAddr {
        let bpp = self.regs.depth_format.bytes_per_pixel();
        self.pixel_address(self.regs.depth_buffer_address, x, y, bpp)
    }

    // ── Color ──────────────────────────────────────────────────────────

    /// Encode `rgba` into the color buffer.
    pub fn draw_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let addr = self.color_address(x, y);
        color::encode(self.regs.color_format, rgba, self.memory.physical_slice_mut(addr));
    }

    /// Write only the channels enabled in `mask`; the rest keep their
    /// current value.
    pub fn draw_masked_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4], mask: ColorWriteMask) {
        if mask.is_empty() {
            return;
        }
        let merged = if mask.is_all() {
            rgba
        } else {
            let dest = self.get_pixel(x, y);
            std::array::from_fn(|i| if mask.channel_enabled(i) { rgba[i] } else { dest[i] })
        };
        self.draw_pixel(x, y, merged);
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let addr = self.color_address(x, y);
        color::decode(self.regs.color_format, self.memory.physical_slice(addr))
    }

    // ── Depth / stencil ────────────────────────────────────────────────

    pub fn get_depth(&self, x: u32, y: u32) -> u32 {
        let bytes = self.memory.physical_slice(self.depth_address(x, y));
        match self.regs.depth_format {
            DepthFormat::D16 => depth::decode_d16(bytes),
            DepthFormat::D24 => depth::decode_d24(bytes),
            DepthFormat::D24S8 => depth::decode_d24s8(bytes).0,
        }
    }

    /// Store `value`, leaving any stencil bits in the pixel untouched.
    pub fn set_depth(&mut self, x: u32, y: u32, value: u32) {
        let format = self.regs.depth_format;
        let addr = self.depth_address(x, y);
        let bytes = self.memory.physical_slice_mut(addr);
        match format {
            DepthFormat::D16 => depth::encode_d16(value, bytes),
            DepthFormat::D24 => depth::encode_d24(value, bytes),
            DepthFormat::D24S8 => depth::encode_d24x8(value, bytes),
        }
    }

    /// Store a normalised `[0, 1]` depth at the buffer's precision.
    pub fn set_normalized_depth(&mut self, x: u32, y: u32, z: f32) {
        let max = self.regs.depth_format.max_depth();
        let value = (z.clamp(0.0, 1.0) * max as f32) as u32;
        self.set_depth(x, y, value.min(max));
    }

    /// Depth-only formats have no stencil; reading one yields 0.
    pub fn get_stencil(&self, x: u32, y: u32) -> u8 {
        match self.regs.depth_format {
            DepthFormat::D24S8 => {
                let bytes = self.memory.physical_slice(self.depth_address(x, y));
                depth::decode_d24s8(bytes).1
            }
            format @ (DepthFormat::D16 | DepthFormat::D24) => {
                log::warn!(
                    "Framebuffer: get_stencil on format {:?} which has no stencil component",
                    format
                );
                0
            }
        }
    }

    /// No-op on depth-only formats.
    pub fn set_stencil(&mut self, x: u32, y: u32, value: u8) {
        match self.regs.depth_format {
            DepthFormat::D16 | DepthFormat::D24 => {}
            DepthFormat::D24S8 => {
                let addr = self.depth_address(x, y);
                depth::encode_x24s8(value, self.memory.physical_slice_mut(addr));
            }
        }
    }

    /// Apply the stencil `action` the caller's test selected, honouring
    /// the stencil write mask.
    pub fn update_stencil(
        &mut self,
        x: u32,
        y: u32,
        action: StencilAction,
        reference: u8,
        write_mask: u8,
    ) {
        if !self.regs.depth_format.has_stencil() {
            return;
        }
        let old = self.get_stencil(x, y);
        let new = perform_stencil_action(action, old, reference);
        self.set_stencil(x, y, apply_write_mask(old, new, write_mask));
    }

    // ── Shadow map ─────────────────────────────────────────────────────

    /// Merge a shadow-pass fragment into the shadow map held in the color
    /// buffer. The branch order is significant:
    ///
    /// 1. a fragment at or behind the stored depth changes nothing,
    /// 2. an unattenuated fragment (`stencil == 0`) replaces only the depth,
    /// 3. otherwise the attenuated stencil replaces the stored stencil only
    ///    when smaller; depth is kept.
    pub fn draw_shadow_map_pixel(&mut self, x: u32, y: u32, depth: u32, stencil: u8) {
        let shadow = self.regs.shadow;
        let addr =
            self.pixel_address(self.regs.color_buffer_address, x, y, SHADOW_BYTES_PER_PIXEL);
        let texel = self.memory.physical_slice_mut(addr);

        let reference = depth::decode_d24s8_shadow(texel);
        if depth >= reference.depth {
            return;
        }

        if stencil == 0 {
            depth::encode_d24x8_shadow(depth, texel);
        } else {
            let attenuated = attenuate_shadow_stencil(stencil, depth, reference.depth, shadow);
            if attenuated < reference.stencil {
                depth::encode_x24s8_shadow(attenuated, texel);
            }
        }
    }
}

/// `stencil / (constant + linear * depth / ref_depth)`, clamped to a byte.
/// `ref_depth` is non-zero because the caller saw `depth < ref_depth`.
fn attenuate_shadow_stencil(stencil: u8, depth: u32, ref_depth: u32, shadow: ShadowRegs) -> u8 {
    let constant = Float16::from_raw(shadow.constant);
    let linear = Float16::from_raw(shadow.linear);
    let x = Float16::from_f32(depth as f32 / ref_depth as f32);
    let attenuated = Float16::from_f32(stencil as f32) / (constant + linear * x);
    attenuated.to_f32().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::ColorFormat;
    use rcitra_common::{RamRegion, VRAM_PADDR};

    const COLOR_ADDR: PAddr = VRAM_PADDR;
    const DEPTH_ADDR: PAddr = VRAM_PADDR + 0x1000;

    // Float16 bit patterns.
    const F16_ZERO: u16 = 0x0000;
    const F16_HALF: u16 = 0x3800;
    const F16_ONE: u16 = 0x3C00;

    /// 16x16 buffers; the height register holds 15.
    fn make_regs(color_format: ColorFormat, depth_format: DepthFormat) -> FramebufferRegs {
        FramebufferRegs {
            color_format,
            depth_format,
            width: 16,
            height: 15,
            color_buffer_address: COLOR_ADDR,
            depth_buffer_address: DEPTH_ADDR,
            shadow: ShadowRegs::default(),
        }
    }

    fn make_vram() -> RamRegion {
        RamRegion::new(VRAM_PADDR, 0x2000)
    }

    fn bytes_at(ram: &RamRegion, addr: PAddr, len: usize) -> Vec<u8> {
        ram.physical_slice(addr)[..len].to_vec()
    }

    #[test]
    fn test_draw_pixel_lands_on_tiled_offset() {
        let mut ram = make_vram();
        let regs = make_regs(ColorFormat::Rgba8, DepthFormat::D24S8);
        let mut fb = Framebuffer::new(&mut ram, &regs);

        // y = 15 is the first stored row; x = 1 is the second Morton slot.
        fb.draw_pixel(1, 15, [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(bytes_at(&ram, COLOR_ADDR + 4, 4), vec![0x44, 0x33, 0x22, 0x11]);
    }

    #[test]
    fn test_draw_pixel_bottom_row_is_second_band() {
        let mut ram = make_vram();
        let regs = make_regs(ColorFormat::Rgb565, DepthFormat::D16);
        let mut fb = Framebuffer::new(&mut ram, &regs);

        fb.draw_pixel(0, 7, [0xFF, 0, 0, 0xFF]);
        // y' = 8: band offset 8 rows * 16 px * 2 bytes.
        assert_eq!(bytes_at(&ram, COLOR_ADDR + 256, 2), vec![0x00, 0xF8]);
    }

    #[test]
    fn test_pixel_round_trip_all_formats() {
        let formats = [
            (ColorFormat::Rgba8, [0x12, 0x34, 0x56, 0x78]),
            (ColorFormat::Rgb8, [0x12, 0x34, 0x56, 0xFF]),
            (ColorFormat::Rgb5a1, [0xFF, 0x84, 0x00, 0xFF]),
            (ColorFormat::Rgb565, [0x84, 0x82, 0xFF, 0xFF]),
            (ColorFormat::Rgba4, [0x11, 0x22, 0x33, 0x44]),
        ];
        for (format, rgba) in formats {
            let mut ram = make_vram();
            let regs = make_regs(format, DepthFormat::D16);
            let mut fb = Framebuffer::new(&mut ram, &regs);
            fb.draw_pixel(5, 3, rgba);
            fb.draw_pixel(6, 3, [0, 0, 0, 0]);
            assert_eq!(fb.get_pixel(5, 3), rgba, "{:?}", format);
        }
    }

    #[test]
    fn test_draw_masked_pixel() {
        let mut ram = make_vram();
        let regs = make_regs(ColorFormat::Rgba8, DepthFormat::D16);
        let mut fb = Framebuffer::new(&mut ram, &regs);

        fb.draw_pixel(2, 2, [10, 20, 30, 40]);
        fb.draw_masked_pixel(2, 2, [99, 99, 99, 99], ColorWriteMask::GREEN | ColorWriteMask::ALPHA);
        assert_eq!(fb.get_pixel(2, 2), [10, 99, 30, 99]);

        fb.draw_masked_pixel(2, 2, [0, 0, 0, 0], ColorWriteMask::empty());
        assert_eq!(fb.get_pixel(2, 2), [10, 99, 30, 99]);

        fb.draw_masked_pixel(2, 2, [1, 2, 3, 4], ColorWriteMask::all());
        assert_eq!(fb.get_pixel(2, 2), [1, 2, 3, 4]);
    }

    #[test]
    fn test_blend_fragment_over_existing_pixel() {
        use crate::regs::{BlendState, LogicOp};
        use crate::swrast::{blend, logic_op_color};

        let mut ram = make_vram();
        let regs = make_regs(ColorFormat::Rgba8, DepthFormat::D24S8);
        let mut fb = Framebuffer::new(&mut ram, &regs);
        fb.draw_pixel(7, 8, [0, 0, 200, 255]);

        let dest = fb.get_pixel(7, 8);
        let out = blend([255, 0, 0, 0], dest, [0; 4], &BlendState::default());
        fb.draw_masked_pixel(7, 8, out, ColorWriteMask::all());
        assert_eq!(fb.get_pixel(7, 8), [0, 0, 200, 255]);

        let dest = fb.get_pixel(7, 8);
        let out = logic_op_color([0xFF, 0xFF, 0xFF, 0xFF], dest, LogicOp::Xor);
        fb.draw_pixel(7, 8, out);
        assert_eq!(fb.get_pixel(7, 8), [0xFF, 0xFF, 55, 0]);
    }

    #[test]
    fn test_depth_round_trip_per_format() {
        for (format, value) in [
            (DepthFormat::D16, 0xBEEF),
            (DepthFormat::D24, 0xAB_CDEF),
            (DepthFormat::D24S8, 0x12_3456),
        ] {
            let mut ram = make_vram();
            let regs = make_regs(ColorFormat::Rgba8, format);
            let mut fb = Framebuffer::new(&mut ram, &regs);
            fb.set_depth(9, 4, value);
            assert_eq!(fb.get_depth(9, 4), value, "{:?}", format);
        }
    }

    #[test]
    fn test_depth_uses_depth_buffer_address() {
        let mut ram = make_vram();
        let regs = make_regs(ColorFormat::Rgba8, DepthFormat::D24);
        let mut fb = Framebuffer::new(&mut ram, &regs);
        fb.set_depth(0, 15, 0x12_3456);
        assert_eq!(bytes_at(&ram, DEPTH_ADDR, 3), vec![0x56, 0x34, 0x12]);
        assert!(bytes_at(&ram, COLOR_ADDR, 4).iter().all(|&b| b == 0));
    }

    #[test]
    fn test_d24s8_depth_and_stencil_are_orthogonal() {
        let mut ram = make_vram();
        let regs = make_regs(ColorFormat::Rgba8, DepthFormat::D24S8);
        let mut fb = Framebuffer::new(&mut ram, &regs);

        fb.set_depth(3, 3, 0xAB_CDEF);
        fb.set_stencil(3, 3, 0x5A);
        assert_eq!(fb.get_depth(3, 3), 0xAB_CDEF);
        assert_eq!(fb.get_stencil(3, 3), 0x5A);

        fb.set_depth(3, 3, 0x00_0001);
        assert_eq!(fb.get_stencil(3, 3), 0x5A);

        fb.set_stencil(3, 3, 0xFF);
        assert_eq!(fb.get_depth(3, 3), 0x00_0001);
    }

    #[test]
    fn test_stencil_on_depth_only_formats() {
        for format in [DepthFormat::D16, DepthFormat::D24] {
            let mut ram = make_vram();
            let regs = make_regs(ColorFormat::Rgba8, format);
            let mut fb = Framebuffer::new(&mut ram, &regs);

            fb.set_depth(1, 1, 0x1234);
            fb.set_stencil(1, 1, 0xFF);
            assert_eq!(fb.get_depth(1, 1), 0x1234);
            assert_eq!(fb.get_stencil(1, 1), 0);

            // Only the two non-zero depth bytes were written.
            let depth_region = &ram.as_bytes()[(DEPTH_ADDR - VRAM_PADDR) as usize..];
            assert_eq!(depth_region.iter().filter(|&&b| b != 0).count(), 2);
        }
    }

    #[test]
    fn test_set_normalized_depth() {
        let mut ram = make_vram();
        let regs = make_regs(ColorFormat::Rgba8, DepthFormat::D16);
        let mut fb = Framebuffer::new(&mut ram, &regs);

        fb.set_normalized_depth(0, 0, 1.0);
        assert_eq!(fb.get_depth(0, 0), 0xFFFF);
        fb.set_normalized_depth(0, 0, 0.5);
        assert_eq!(fb.get_depth(0, 0), 0x7FFF);
        fb.set_normalized_depth(0, 0, -3.0);
        assert_eq!(fb.get_depth(0, 0), 0);
    }

    #[test]
    fn test_update_stencil_with_write_mask() {
        let mut ram = make_vram();
        let regs = make_regs(ColorFormat::Rgba8, DepthFormat::D24S8);
        let mut fb = Framebuffer::new(&mut ram, &regs);

        fb.set_depth(4, 4, 0x77_7777);
        fb.set_stencil(4, 4, 0xF0);
        fb.update_stencil(4, 4, StencilAction::Replace, 0x0F, 0x3C);
        assert_eq!(fb.get_stencil(4, 4), 0xCC);

        fb.update_stencil(4, 4, StencilAction::IncrementWrap, 0, 0xFF);
        assert_eq!(fb.get_stencil(4, 4), 0xCD);
        assert_eq!(fb.get_depth(4, 4), 0x77_7777);
    }

    #[test]
    fn test_update_stencil_ignored_without_stencil() {
        let mut ram = make_vram();
        let regs = make_regs(ColorFormat::Rgba8, DepthFormat::D24);
        let mut fb = Framebuffer::new(&mut ram, &regs);
        fb.set_depth(4, 4, 0x12_3456);
        fb.update_stencil(4, 4, StencilAction::Replace, 0xFF, 0xFF);
        assert_eq!(fb.get_depth(4, 4), 0x12_3456);
    }

    // ── Shadow map ─────────────────────────────────────────────────────

    fn shadow_regs(constant: u16, linear: u16) -> FramebufferRegs {
        FramebufferRegs {
            shadow: ShadowRegs { constant, linear },
            // The color format must not matter for shadow addressing.
            ..make_regs(ColorFormat::Rgb565, DepthFormat::D24S8)
        }
    }

    fn seed_shadow(ram: &mut RamRegion, x: u32, y: u32, depth: u32, stencil: u8) -> PAddr {
        let addr = COLOR_ADDR + tiled_offset(x, y, 4, 16, 15);
        let bytes = ram.physical_slice_mut(addr);
        depth::encode_d24x8_shadow(depth, bytes);
        depth::encode_x24s8_shadow(stencil, bytes);
        addr
    }

    fn read_shadow(ram: &RamRegion, addr: PAddr) -> depth::ShadowTexel {
        depth::decode_d24s8_shadow(ram.physical_slice(addr))
    }

    #[test]
    fn test_shadow_farther_fragment_is_ignored() {
        let regs = shadow_regs(F16_ONE, F16_ZERO);
        for incoming in [0x80_0000, 0x80_0001, 0xFF_FFFF] {
            let mut ram = make_vram();
            let addr = seed_shadow(&mut ram, 3, 9, 0x80_0000, 0x40);
            let before = bytes_at(&ram, addr, 4);

            Framebuffer::new(&mut ram, &regs).draw_shadow_map_pixel(3, 9, incoming, 0x10);
            assert_eq!(bytes_at(&ram, addr, 4), before);

            Framebuffer::new(&mut ram, &regs).draw_shadow_map_pixel(3, 9, incoming, 0);
            assert_eq!(bytes_at(&ram, addr, 4), before);
        }
    }

    #[test]
    fn test_shadow_zero_stencil_writes_depth_only() {
        let mut ram = make_vram();
        let regs = shadow_regs(F16_ONE, F16_ZERO);
        let addr = seed_shadow(&mut ram, 3, 9, 0x80_0000, 0x40);

        Framebuffer::new(&mut ram, &regs).draw_shadow_map_pixel(3, 9, 0x12_3456, 0);
        assert_eq!(bytes_at(&ram, addr, 4), vec![0x12, 0x34, 0x56, 0x40]);
    }

    #[test]
    fn test_shadow_attenuated_stencil_replaces_larger() {
        let mut ram = make_vram();
        // constant 0, linear 1: stencil / (depth / ref) = 10 / 0.5 = 20
        let regs = shadow_regs(F16_ZERO, F16_ONE);
        let addr = seed_shadow(&mut ram, 12, 0, 0x80_0000, 50);

        Framebuffer::new(&mut ram, &regs).draw_shadow_map_pixel(12, 0, 0x40_0000, 10);
        let texel = read_shadow(&ram, addr);
        assert_eq!(texel.stencil, 20);
        assert_eq!(texel.depth, 0x80_0000);
    }

    #[test]
    fn test_shadow_attenuated_stencil_keeps_smaller() {
        let mut ram = make_vram();
        let regs = shadow_regs(F16_ZERO, F16_ONE);
        let addr = seed_shadow(&mut ram, 12, 0, 0x80_0000, 15);
        let before = bytes_at(&ram, addr, 4);

        Framebuffer::new(&mut ram, &regs).draw_shadow_map_pixel(12, 0, 0x40_0000, 10);
        assert_eq!(bytes_at(&ram, addr, 4), before);
    }

    #[test]
    fn test_attenuate_shadow_stencil() {
        let regs = |constant, linear| ShadowRegs { constant, linear };
        // 100 / (1 + 1 * 0.5) = 66.67, truncated.
        assert_eq!(attenuate_shadow_stencil(100, 1, 2, regs(F16_ONE, F16_ONE)), 66);
        // 200 / 0.5 = 400, clamped.
        assert_eq!(attenuate_shadow_stencil(200, 1, 2, regs(F16_HALF, F16_ZERO)), 255);
        // Zero denominator divides to infinity, clamped.
        assert_eq!(attenuate_shadow_stencil(1, 1, 2, regs(F16_ZERO, F16_ZERO)), 255);
        assert_eq!(attenuate_shadow_stencil(7, 0, 2, regs(F16_ONE, F16_ONE)), 7);
    }
}
