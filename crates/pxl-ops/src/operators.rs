//! The composite operator table.
//!
//! Thirty-five named binary operators over two canonical scanlines,
//! `dst = op(src, dst)`, addressed by [`CompositeOp`]. The values and
//! their names are stable across versions.
//!
//! Three families:
//!
//! - **Arithmetic**: copy, keep-destination, clear, the classic alpha
//!   blend, clamped add, and both subtraction directions.
//! - **Porter-Duff**: the full weighted two-term family
//!   (`dst = Fs*src + Fd*dst`) in straight-alpha and premultiplied
//!   conventions. Straight operators premultiply, composite, then
//!   un-premultiply; premultiplied operators work on the lanes as given.
//! - **Artistic**: premultiplied blend, 50/50 average, multiply tint,
//!   absolute difference, darken, lighten, screen, overlay. Every
//!   artistic operator checks the source alpha first and leaves the
//!   destination element untouched when it is zero.
//!
//! Operators are pure per-element functions; no state crosses pixels.

use pxl_core::algebra::over_pixel;
use pxl_core::tables::{lerp8, mul8, unmul8};
use pxl_core::Argb;

/// The compositing operators, in their stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CompositeOp {
    /// Source replaces destination.
    #[default]
    Copy = 0,
    /// Destination is kept unchanged.
    Dest = 1,
    /// Destination is cleared to transparent black.
    Clear = 2,
    /// Classic straight-alpha blend.
    AlphaBlend = 3,
    /// Clamped channel sum.
    Add = 4,
    /// Destination minus source, clamped at zero.
    Sub = 5,
    /// Source minus destination, clamped at zero.
    SubRev = 6,
    /// Porter-Duff XOR, straight alpha.
    Xor = 7,
    /// Porter-Duff PLUS, straight alpha.
    Plus = 8,
    /// Source over destination, straight alpha.
    SrcOver = 9,
    /// Source where destination is, straight alpha.
    SrcIn = 10,
    /// Source where destination is not, straight alpha.
    SrcOut = 11,
    /// Source atop destination, straight alpha.
    SrcAtop = 12,
    /// Destination over source, straight alpha.
    DstOver = 13,
    /// Destination where source is, straight alpha.
    DstIn = 14,
    /// Destination where source is not, straight alpha.
    DstOut = 15,
    /// Destination atop source, straight alpha.
    DstAtop = 16,
    /// Porter-Duff XOR on premultiplied lanes.
    PremulXor = 17,
    /// Porter-Duff PLUS on premultiplied lanes.
    PremulPlus = 18,
    /// Source over destination on premultiplied lanes.
    PremulSrcOver = 19,
    /// Source where destination is, premultiplied.
    PremulSrcIn = 20,
    /// Source where destination is not, premultiplied.
    PremulSrcOut = 21,
    /// Source atop destination, premultiplied.
    PremulSrcAtop = 22,
    /// Destination over source, premultiplied.
    PremulDstOver = 23,
    /// Destination where source is, premultiplied.
    PremulDstIn = 24,
    /// Destination where source is not, premultiplied.
    PremulDstOut = 25,
    /// Destination atop source, premultiplied.
    PremulDstAtop = 26,
    /// Premultiplied blend (source-over accumulation).
    PremulBlend = 27,
    /// 50/50 average of the two elements.
    Average = 28,
    /// Multiply tint: destination color scaled by source color.
    Tint = 29,
    /// Absolute channel difference.
    Diff = 30,
    /// Channel-wise minimum.
    Darken = 31,
    /// Channel-wise maximum.
    Lighten = 32,
    /// Inverse multiply (lighten).
    Screen = 33,
    /// Contrast-enhancing multiply/screen split.
    Overlay = 34,
}

/// Number of compositing operators.
pub const COMPOSITE_OP_COUNT: usize = 35;

/// Every operator in stable order.
pub static ALL_OPS: [CompositeOp; COMPOSITE_OP_COUNT] = [
    CompositeOp::Copy,
    CompositeOp::Dest,
    CompositeOp::Clear,
    CompositeOp::AlphaBlend,
    CompositeOp::Add,
    CompositeOp::Sub,
    CompositeOp::SubRev,
    CompositeOp::Xor,
    CompositeOp::Plus,
    CompositeOp::SrcOver,
    CompositeOp::SrcIn,
    CompositeOp::SrcOut,
    CompositeOp::SrcAtop,
    CompositeOp::DstOver,
    CompositeOp::DstIn,
    CompositeOp::DstOut,
    CompositeOp::DstAtop,
    CompositeOp::PremulXor,
    CompositeOp::PremulPlus,
    CompositeOp::PremulSrcOver,
    CompositeOp::PremulSrcIn,
    CompositeOp::PremulSrcOut,
    CompositeOp::PremulSrcAtop,
    CompositeOp::PremulDstOver,
    CompositeOp::PremulDstIn,
    CompositeOp::PremulDstOut,
    CompositeOp::PremulDstAtop,
    CompositeOp::PremulBlend,
    CompositeOp::Average,
    CompositeOp::Tint,
    CompositeOp::Diff,
    CompositeOp::Darken,
    CompositeOp::Lighten,
    CompositeOp::Screen,
    CompositeOp::Overlay,
];

impl CompositeOp {
    /// Stable identifier, 0-34.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Looks an identifier up; `None` past the table.
    #[inline]
    pub fn from_id(id: u8) -> Option<Self> {
        ALL_OPS.get(id as usize).copied()
    }

    /// Fixed human-readable name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Dest => "dest",
            Self::Clear => "clear",
            Self::AlphaBlend => "blend",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::SubRev => "sub-rev",
            Self::Xor => "xor",
            Self::Plus => "plus",
            Self::SrcOver => "src-over",
            Self::SrcIn => "src-in",
            Self::SrcOut => "src-out",
            Self::SrcAtop => "src-atop",
            Self::DstOver => "dst-over",
            Self::DstIn => "dst-in",
            Self::DstOut => "dst-out",
            Self::DstAtop => "dst-atop",
            Self::PremulXor => "premul-xor",
            Self::PremulPlus => "premul-plus",
            Self::PremulSrcOver => "premul-src-over",
            Self::PremulSrcIn => "premul-src-in",
            Self::PremulSrcOut => "premul-src-out",
            Self::PremulSrcAtop => "premul-src-atop",
            Self::PremulDstOver => "premul-dst-over",
            Self::PremulDstIn => "premul-dst-in",
            Self::PremulDstOut => "premul-dst-out",
            Self::PremulDstAtop => "premul-dst-atop",
            Self::PremulBlend => "premul-blend",
            Self::Average => "average",
            Self::Tint => "tint",
            Self::Diff => "diff",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
        }
    }
}

impl std::fmt::Display for CompositeOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Porter-Duff source/destination weights for one element, on the 0-255
/// scale. `sa`/`da` are the (effective) alphas.
#[inline]
const fn pd_weights(op: CompositeOp, sa: u8, da: u8) -> (u8, u8) {
    match op {
        CompositeOp::Xor | CompositeOp::PremulXor => (255 - da, 255 - sa),
        CompositeOp::Plus | CompositeOp::PremulPlus => (255, 255),
        CompositeOp::SrcOver | CompositeOp::PremulSrcOver => (255, 255 - sa),
        CompositeOp::SrcIn | CompositeOp::PremulSrcIn => (da, 0),
        CompositeOp::SrcOut | CompositeOp::PremulSrcOut => (255 - da, 0),
        CompositeOp::SrcAtop | CompositeOp::PremulSrcAtop => (da, 255 - sa),
        CompositeOp::DstOver | CompositeOp::PremulDstOver => (255 - da, 255),
        CompositeOp::DstIn | CompositeOp::PremulDstIn => (0, sa),
        CompositeOp::DstOut | CompositeOp::PremulDstOut => (0, 255 - sa),
        CompositeOp::DstAtop | CompositeOp::PremulDstAtop => (255 - da, sa),
        _ => unreachable!(),
    }
}

/// Weighted two-term composite on premultiplied lanes.
#[inline]
fn pd_premul(op: CompositeOp, s: Argb, d: Argb) -> Argb {
    let (fs, fd) = pd_weights(op, s.a(), d.a());
    Argb::new(
        mul8(fs, s.a()).saturating_add(mul8(fd, d.a())),
        mul8(fs, s.r()).saturating_add(mul8(fd, d.r())),
        mul8(fs, s.g()).saturating_add(mul8(fd, d.g())),
        mul8(fs, s.b()).saturating_add(mul8(fd, d.b())),
    )
}

/// Straight-alpha Porter-Duff: premultiply both sides, composite, then
/// renormalize by the result alpha.
#[inline]
fn pd_straight(op: CompositeOp, s: Argb, d: Argb) -> Argb {
    let sp = premul_pixel(s);
    let dp = premul_pixel(d);
    let out = pd_premul(op, sp, dp);
    let a = out.a();
    Argb::new(a, unmul8(a, out.r()), unmul8(a, out.g()), unmul8(a, out.b()))
}

#[inline]
fn premul_pixel(p: Argb) -> Argb {
    let a = p.a();
    if a == 0xff {
        return p;
    }
    Argb::new(a, mul8(a, p.r()), mul8(a, p.g()), mul8(a, p.b()))
}

/// Applies one operator to a single element pair.
pub fn apply_pixel(op: CompositeOp, s: Argb, d: Argb) -> Argb {
    match op {
        CompositeOp::Copy => s,
        CompositeOp::Dest => d,
        CompositeOp::Clear => Argb::TRANSPARENT,
        CompositeOp::AlphaBlend => {
            let sa = s.a();
            Argb::new(
                sa + mul8(255 - sa, d.a()),
                lerp8(d.r(), s.r(), sa),
                lerp8(d.g(), s.g(), sa),
                lerp8(d.b(), s.b(), sa),
            )
        }
        CompositeOp::Add => Argb::new(
            d.a().saturating_add(s.a()),
            d.r().saturating_add(s.r()),
            d.g().saturating_add(s.g()),
            d.b().saturating_add(s.b()),
        ),
        CompositeOp::Sub => Argb::new(
            d.a(),
            d.r().saturating_sub(s.r()),
            d.g().saturating_sub(s.g()),
            d.b().saturating_sub(s.b()),
        ),
        CompositeOp::SubRev => Argb::new(
            d.a(),
            s.r().saturating_sub(d.r()),
            s.g().saturating_sub(d.g()),
            s.b().saturating_sub(d.b()),
        ),
        CompositeOp::Xor
        | CompositeOp::Plus
        | CompositeOp::SrcOver
        | CompositeOp::SrcIn
        | CompositeOp::SrcOut
        | CompositeOp::SrcAtop
        | CompositeOp::DstOver
        | CompositeOp::DstIn
        | CompositeOp::DstOut
        | CompositeOp::DstAtop => pd_straight(op, s, d),
        CompositeOp::PremulXor
        | CompositeOp::PremulPlus
        | CompositeOp::PremulSrcOver
        | CompositeOp::PremulSrcIn
        | CompositeOp::PremulSrcOut
        | CompositeOp::PremulSrcAtop
        | CompositeOp::PremulDstOver
        | CompositeOp::PremulDstIn
        | CompositeOp::PremulDstOut
        | CompositeOp::PremulDstAtop => pd_premul(op, s, d),
        // Artistic operators: a transparent source never touches the
        // destination.
        CompositeOp::PremulBlend => {
            if s.is_transparent() {
                d
            } else {
                over_pixel(s, d)
            }
        }
        CompositeOp::Average => {
            if s.is_transparent() {
                d
            } else {
                Argb::new(
                    avg(s.a(), d.a()),
                    avg(s.r(), d.r()),
                    avg(s.g(), d.g()),
                    avg(s.b(), d.b()),
                )
            }
        }
        CompositeOp::Tint => {
            if s.is_transparent() {
                d
            } else {
                Argb::new(d.a(), mul8(s.r(), d.r()), mul8(s.g(), d.g()), mul8(s.b(), d.b()))
            }
        }
        CompositeOp::Diff => {
            if s.is_transparent() {
                d
            } else {
                Argb::new(
                    d.a(),
                    s.r().abs_diff(d.r()),
                    s.g().abs_diff(d.g()),
                    s.b().abs_diff(d.b()),
                )
            }
        }
        CompositeOp::Darken => {
            if s.is_transparent() {
                d
            } else {
                Argb::new(d.a(), s.r().min(d.r()), s.g().min(d.g()), s.b().min(d.b()))
            }
        }
        CompositeOp::Lighten => {
            if s.is_transparent() {
                d
            } else {
                Argb::new(d.a(), s.r().max(d.r()), s.g().max(d.g()), s.b().max(d.b()))
            }
        }
        CompositeOp::Screen => {
            if s.is_transparent() {
                d
            } else {
                Argb::new(
                    d.a(),
                    screen(s.r(), d.r()),
                    screen(s.g(), d.g()),
                    screen(s.b(), d.b()),
                )
            }
        }
        CompositeOp::Overlay => {
            if s.is_transparent() {
                d
            } else {
                Argb::new(
                    d.a(),
                    overlay(s.r(), d.r()),
                    overlay(s.g(), d.g()),
                    overlay(s.b(), d.b()),
                )
            }
        }
    }
}

#[inline]
const fn avg(a: u8, b: u8) -> u8 {
    ((a as u16 + b as u16) >> 1) as u8
}

#[inline]
fn screen(s: u8, d: u8) -> u8 {
    255 - mul8(255 - s, 255 - d)
}

#[inline]
fn overlay(s: u8, d: u8) -> u8 {
    if d < 128 {
        let v = 2 * mul8(s, d) as u16;
        if v > 255 { 255 } else { v as u8 }
    } else {
        let v = 2 * mul8(255 - s, 255 - d) as u16;
        255 - if v > 255 { 255 } else { v as u8 }
    }
}

/// Applies one operator across a scanline pair: `dst[i] = op(src[i], dst[i])`.
pub fn apply(op: CompositeOp, src: &[Argb], dst: &mut [Argb]) {
    assert_eq!(src.len(), dst.len(), "operator scanlines must match");
    match op {
        // The three trivial operators skip the per-element loop.
        CompositeOp::Copy => dst.copy_from_slice(src),
        CompositeOp::Dest => {}
        CompositeOp::Clear => dst.fill(Argb::TRANSPARENT),
        _ => {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = apply_pixel(op, s, *d);
            }
        }
    }
}
