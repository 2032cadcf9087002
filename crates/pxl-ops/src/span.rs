//! Span and hline drawing: scanline compositing into a native row.
//!
//! A *span* draws from a scanline of canonical pixels, an *hline* draws
//! one constant color across a run. Both exist for every format and every
//! [`DrawMode`], and both take an optional per-pixel coverage buffer.
//!
//! Blend policy:
//!
//! - A fully transparent source pixel (after coverage) touches nothing.
//! - A fully opaque, full-coverage source pixel is stored verbatim, so
//!   repeated blending of opaque pixels never drifts.
//! - Destinations without a native alpha channel blend with the constant
//!   lerp driven only by the source alpha.
//! - Destinations with alpha run the general two-sided blend with
//!   table-driven renormalization.
//!
//! Indexed and sub-byte destinations go through the generic bit-packed
//! cell accessors. The canonical 32-bit layout gets a dedicated loop,
//! which the generic path is tested against bit-for-bit.

use pxl_core::algebra::{over_pixel, scale_premul};
use pxl_core::tables::{lerp8, mul8, unmul8};
use pxl_core::Argb;
use pxl_formats::{fetch_cell, read_cell, store_cell, write_cell, FormatCtx, PixelFormat};

/// How source pixels land on the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    /// Store verbatim, no blending. Coverage is ignored.
    #[default]
    Copy,
    /// Straight-alpha blend.
    Blend,
    /// Premultiplied source-over accumulation.
    Over,
    /// Clamped channel sum.
    Add,
}

impl DrawMode {
    /// Fixed name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Blend => "blend",
            Self::Over => "over",
            Self::Add => "add",
        }
    }
}

/// Number of draw modes, the size of per-format procedure tables.
pub const DRAW_MODE_COUNT: usize = 4;

impl DrawMode {
    /// Dense index for procedure tables.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Copy => 0,
            Self::Blend => 1,
            Self::Over => 2,
            Self::Add => 3,
        }
    }
}

/// Straight-alpha blend of one source pixel onto one destination pixel,
/// with the source alpha already coverage-scaled.
///
/// `dst_has_alpha` selects between the two-sided blend and the plain
/// lerp destinations without alpha get.
#[inline]
fn blend_pixel(s: Argb, sa: u8, d: Argb, dst_has_alpha: bool) -> Argb {
    if !dst_has_alpha {
        return Argb::new(
            0xff,
            lerp8(d.r(), s.r(), sa),
            lerp8(d.g(), s.g(), sa),
            lerp8(d.b(), s.b(), sa),
        );
    }
    let da = d.a();
    let out_a = sa + mul8(255 - sa, da);
    if out_a == 0 {
        return Argb::TRANSPARENT;
    }
    let fd = mul8(255 - sa, da);
    let sum_r = mul8(sa, s.r()) + mul8(fd, d.r());
    let sum_g = mul8(sa, s.g()) + mul8(fd, d.g());
    let sum_b = mul8(sa, s.b()) + mul8(fd, d.b());
    Argb::new(
        out_a,
        unmul8(out_a, sum_r),
        unmul8(out_a, sum_g),
        unmul8(out_a, sum_b),
    )
}

/// Additive combine, all four lanes clamped.
#[inline]
fn add_pixel(s: Argb, d: Argb) -> Argb {
    Argb::new(
        d.a().saturating_add(s.a()),
        d.r().saturating_add(s.r()),
        d.g().saturating_add(s.g()),
        d.b().saturating_add(s.b()),
    )
}

#[inline]
fn coverage_at(cover: Option<&[u8]>, i: usize) -> u8 {
    cover.map_or(0xff, |c| c[i])
}

/// Draws `src.len()` pixels onto a native row starting at pixel `x`.
pub fn draw_span(
    format: PixelFormat,
    mode: DrawMode,
    row: &mut [u8],
    x: usize,
    src: &[Argb],
    cover: Option<&[u8]>,
    ctx: &FormatCtx<'_>,
) {
    if format == PixelFormat::Argb8888 {
        if let Some(c) = cover {
            assert_eq!(c.len(), src.len(), "coverage length must match span");
        }
        return span_argb8888(mode, row, x, src, cover);
    }
    draw_span_desc(format.desc(), mode, row, x, src, cover, ctx);
}

/// [`draw_span`] driven by a descriptor instead of a catalog format, the
/// path free formats run on.
pub fn draw_span_desc(
    desc: &pxl_formats::FormatDesc,
    mode: DrawMode,
    row: &mut [u8],
    x: usize,
    src: &[Argb],
    cover: Option<&[u8]>,
    ctx: &FormatCtx<'_>,
) {
    if let Some(c) = cover {
        assert_eq!(c.len(), src.len(), "coverage length must match span");
    }
    match mode {
        DrawMode::Copy => {
            for (i, &p) in src.iter().enumerate() {
                write_cell(desc.bits, row, x + i, store_cell(desc, p, ctx));
            }
        }
        DrawMode::Blend => {
            let has_alpha = desc.has_alpha();
            for (i, &p) in src.iter().enumerate() {
                let sa = mul8(coverage_at(cover, i), p.a());
                if sa == 0 {
                    continue;
                }
                if sa == 0xff {
                    write_cell(desc.bits, row, x + i, store_cell(desc, p, ctx));
                    continue;
                }
                let d = fetch_cell(desc, read_cell(desc.bits, row, x + i), ctx);
                let out = blend_pixel(p, sa, d, has_alpha);
                write_cell(desc.bits, row, x + i, store_cell(desc, out, ctx));
            }
        }
        DrawMode::Over => {
            for (i, &p) in src.iter().enumerate() {
                let s = scale_premul(p, coverage_at(cover, i));
                if s.is_transparent() {
                    continue;
                }
                if s.is_opaque() {
                    write_cell(desc.bits, row, x + i, store_cell(desc, s, ctx));
                    continue;
                }
                let d = fetch_cell(desc, read_cell(desc.bits, row, x + i), ctx);
                let out = over_pixel(s, d);
                write_cell(desc.bits, row, x + i, store_cell(desc, out, ctx));
            }
        }
        DrawMode::Add => {
            for (i, &p) in src.iter().enumerate() {
                let s = scale_premul(p, coverage_at(cover, i));
                if s == Argb::TRANSPARENT {
                    continue;
                }
                let d = fetch_cell(desc, read_cell(desc.bits, row, x + i), ctx);
                let out = add_pixel(s, d);
                write_cell(desc.bits, row, x + i, store_cell(desc, out, ctx));
            }
        }
    }
}

/// Draws `w` pixels of one constant color starting at pixel `x`.
///
/// The constant-color form of [`draw_span`], used for solid fills; the
/// encoded cell is computed once per call where the mode allows it.
pub fn draw_hline(
    format: PixelFormat,
    mode: DrawMode,
    row: &mut [u8],
    x: usize,
    w: usize,
    color: Argb,
    cover: Option<&[u8]>,
    ctx: &FormatCtx<'_>,
) {
    draw_hline_desc(format.desc(), mode, row, x, w, color, cover, ctx);
}

/// [`draw_hline`] driven by a descriptor instead of a catalog format.
pub fn draw_hline_desc(
    desc: &pxl_formats::FormatDesc,
    mode: DrawMode,
    row: &mut [u8],
    x: usize,
    w: usize,
    color: Argb,
    cover: Option<&[u8]>,
    ctx: &FormatCtx<'_>,
) {
    if let Some(c) = cover {
        assert_eq!(c.len(), w, "coverage length must match run");
    }
    match mode {
        DrawMode::Copy => {
            let cell = store_cell(desc, color, ctx);
            for i in 0..w {
                write_cell(desc.bits, row, x + i, cell);
            }
        }
        DrawMode::Blend => {
            // Without coverage the whole run shares one source alpha.
            if cover.is_none() {
                if color.a() == 0 {
                    return;
                }
                if color.is_opaque() {
                    return draw_hline_desc(desc, DrawMode::Copy, row, x, w, color, None, ctx);
                }
            }
            let has_alpha = desc.has_alpha();
            let opaque_cell = store_cell(desc, color, ctx);
            for i in 0..w {
                let sa = mul8(coverage_at(cover, i), color.a());
                if sa == 0 {
                    continue;
                }
                if sa == 0xff {
                    write_cell(desc.bits, row, x + i, opaque_cell);
                    continue;
                }
                let d = fetch_cell(desc, read_cell(desc.bits, row, x + i), ctx);
                let out = blend_pixel(color, sa, d, has_alpha);
                write_cell(desc.bits, row, x + i, store_cell(desc, out, ctx));
            }
        }
        DrawMode::Over => {
            for i in 0..w {
                let s = scale_premul(color, coverage_at(cover, i));
                if s.is_transparent() {
                    continue;
                }
                let d = fetch_cell(desc, read_cell(desc.bits, row, x + i), ctx);
                let out = if s.is_opaque() { s } else { over_pixel(s, d) };
                write_cell(desc.bits, row, x + i, store_cell(desc, out, ctx));
            }
        }
        DrawMode::Add => {
            for i in 0..w {
                let s = scale_premul(color, coverage_at(cover, i));
                if s == Argb::TRANSPARENT {
                    continue;
                }
                let d = fetch_cell(desc, read_cell(desc.bits, row, x + i), ctx);
                write_cell(desc.bits, row, x + i, store_cell(desc, add_pixel(s, d), ctx));
            }
        }
    }
}

/// Dedicated loop for the canonical 32-bit layout: cells are canonical
/// values, so fetch and store collapse to word moves.
fn span_argb8888(
    mode: DrawMode,
    row: &mut [u8],
    x: usize,
    src: &[Argb],
    cover: Option<&[u8]>,
) {
    const BITS: u8 = 32;
    match mode {
        DrawMode::Copy => {
            for (i, &p) in src.iter().enumerate() {
                write_cell(BITS, row, x + i, p.0);
            }
        }
        DrawMode::Blend => {
            for (i, &p) in src.iter().enumerate() {
                let sa = mul8(coverage_at(cover, i), p.a());
                if sa == 0 {
                    continue;
                }
                if sa == 0xff {
                    write_cell(BITS, row, x + i, p.0);
                    continue;
                }
                let d = Argb(read_cell(BITS, row, x + i));
                write_cell(BITS, row, x + i, blend_pixel(p, sa, d, true).0);
            }
        }
        DrawMode::Over => {
            for (i, &p) in src.iter().enumerate() {
                let s = scale_premul(p, coverage_at(cover, i));
                if s.is_transparent() {
                    continue;
                }
                let d = Argb(read_cell(BITS, row, x + i));
                write_cell(BITS, row, x + i, over_pixel(s, d).0);
            }
        }
        DrawMode::Add => {
            for (i, &p) in src.iter().enumerate() {
                let s = scale_premul(p, coverage_at(cover, i));
                if s == Argb::TRANSPARENT {
                    continue;
                }
                let d = Argb(read_cell(BITS, row, x + i));
                write_cell(BITS, row, x + i, add_pixel(s, d).0);
            }
        }
    }
}

/// The generic span loop with no format dispatch, exposed so the
/// specialized paths can be checked against it.
#[cfg(test)]
pub(crate) fn draw_span_generic(
    format: PixelFormat,
    mode: DrawMode,
    row: &mut [u8],
    x: usize,
    src: &[Argb],
    cover: Option<&[u8]>,
    ctx: &FormatCtx<'_>,
) {
    let desc = format.desc();
    for (i, &p) in src.iter().enumerate() {
        let c = coverage_at(cover, i);
        let d = fetch_cell(desc, read_cell(desc.bits, row, x + i), ctx);
        let out = match mode {
            DrawMode::Copy => p,
            DrawMode::Blend => {
                let sa = mul8(c, p.a());
                if sa == 0 {
                    continue;
                }
                if sa == 0xff {
                    p
                } else {
                    blend_pixel(p, sa, d, desc.has_alpha())
                }
            }
            DrawMode::Over => {
                let s = scale_premul(p, c);
                if s.is_transparent() {
                    continue;
                }
                over_pixel(s, d)
            }
            DrawMode::Add => {
                let s = scale_premul(p, c);
                if s == Argb::TRANSPARENT {
                    continue;
                }
                add_pixel(s, d)
            }
        };
        write_cell(desc.bits, row, x + i, store_cell(desc, out, ctx));
    }
}
