//! Conversion, blending, compositing and fill entry points.
//!
//! These compose the rest of the engine: clip through the shared clip
//! algorithm, fetch source scanlines into caller-supplied working memory,
//! run the scanline algebra, and draw through the span procedures.
//!
//! # Two-phase working memory
//!
//! [`blend`], [`convert`] and [`composite`] never allocate. Call them
//! once with `scratch: None` to learn the required working-memory size in
//! bytes for the requested source width (one canonical scanline; two for
//! `composite`), allocate once, and call again with the buffer:
//!
//! ```rust
//! use pxl_core::{Argb, ClipRect};
//! use pxl_formats::PixelFormat;
//! use pxl_ops::{convert, BlitFlags, Procs, Surface, SurfaceMut};
//!
//! let procs = Procs::new();
//! let src_px = [0u8; 16 * 2];
//! let mut dst_px = [0u8; 16 * 4];
//! let src = Surface::new(&src_px, 32, 16, 1, PixelFormat::Rgb565).unwrap();
//! let mut dst = SurfaceMut::new(&mut dst_px, 64, 16, 1, PixelFormat::Argb8888).unwrap();
//!
//! let rect = ClipRect::from_size(16, 1);
//! let bytes = convert(&procs, &mut dst, 0, 0, &src, rect, 0, BlitFlags::empty(), None);
//! assert_eq!(bytes, 16 * 4);
//!
//! let mut scratch = vec![Argb::TRANSPARENT; bytes / 4];
//! convert(&procs, &mut dst, 0, 0, &src, rect, 0, BlitFlags::empty(), Some(&mut scratch));
//! ```
//!
//! # Dispatch
//!
//! `convert` picks the cheapest route that preserves semantics: identical
//! non-indexed layouts go to the raw blitter (plain or keyed), anything
//! without a colorkey goes through `blend` with an opaque white tint and
//! Copy mode, and keyed cross-format work runs a per-pixel loop over the
//! native cells. Free formats without a catalog alias run the same loops
//! through their descriptors.
//!
//! Degenerate geometry - empty clips, no overlap, everything clipped
//! away - draws nothing and is not an error.

use bitflags::bitflags;
use pxl_core::{clip_blit, Argb, BlitRect, ClipRect};
use pxl_formats::{fetch_cell, fetch_row_desc, read_cell, store_cell, write_cell, Access};
use tracing::{debug, trace};

use crate::blit::RawBlit;
use crate::operators::{self, CompositeOp};
use crate::registry::{BlitProc, Procs};
use crate::span::{draw_hline_desc, draw_span_desc, DrawMode};
use crate::surface::{Surface, SurfaceMut};

bitflags! {
    /// Mode flags for the conversion entry points, freely combinable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlitFlags: u32 {
        /// Honor the surfaces' clip windows (surface bounds always clip).
        const CLIP = 1 << 0;
        /// Treat source cells equal to the key as transparent.
        const COLORKEY = 1 << 1;
        /// Mirror horizontally.
        const FLIP_X = 1 << 2;
        /// Mirror vertically.
        const FLIP_Y = 1 << 3;
    }
}

/// Bytes of working memory one canonical scanline of `width` pixels
/// needs.
#[inline]
const fn scanline_bytes(width: usize) -> usize {
    width * std::mem::size_of::<Argb>()
}

fn effective_clips(
    dst: &SurfaceMut<'_>,
    src: &Surface<'_>,
    flags: BlitFlags,
) -> (ClipRect, ClipRect) {
    let d = if flags.contains(BlitFlags::CLIP) {
        dst.clip.intersect(&dst.bounds())
    } else {
        dst.bounds()
    };
    let s = if flags.contains(BlitFlags::CLIP) {
        src.clip.intersect(&src.bounds())
    } else {
        src.bounds()
    };
    (d, s)
}

/// Draws a source rectangle onto a destination with format conversion,
/// draw-mode blending, constant-color modulation and optional mirroring.
///
/// With `scratch: None`, returns the required working-memory size in
/// bytes for `src_rect`'s width and draws nothing. With a buffer of at
/// least that size, draws and returns the same size. Degenerate or
/// fully clipped geometry draws nothing.
#[allow(clippy::too_many_arguments)]
pub fn blend(
    procs: &Procs,
    dst: &mut SurfaceMut<'_>,
    dst_x: i32,
    dst_y: i32,
    src: &Surface<'_>,
    src_rect: ClipRect,
    mode: DrawMode,
    tint: Argb,
    flags: BlitFlags,
    scratch: Option<&mut [Argb]>,
) -> usize {
    let w = src_rect.width().max(0) as usize;
    let required = scanline_bytes(w);
    let Some(scratch) = scratch else {
        return required;
    };
    assert!(
        scratch.len() >= w,
        "working memory holds {} pixels, the queried width needs {}",
        scratch.len(),
        w
    );

    let (dclip, sclip) = effective_clips(dst, src, flags);
    let Ok(r) = clip_blit(
        dclip,
        sclip,
        dst_x,
        dst_y,
        src_rect,
        flags.contains(BlitFlags::FLIP_X),
        flags.contains(BlitFlags::FLIP_Y),
    ) else {
        return required;
    };
    debug!(
        src = src.format().id(),
        dst = dst.format().id(),
        mode = mode.name(),
        w = r.width,
        h = r.height,
        "blend"
    );
    blend_clipped(procs, dst, src, r, mode, tint, flags, scratch);
    required
}

#[allow(clippy::too_many_arguments)]
fn blend_clipped(
    procs: &Procs,
    dst: &mut SurfaceMut<'_>,
    src: &Surface<'_>,
    r: BlitRect,
    mode: DrawMode,
    tint: Argb,
    flags: BlitFlags,
    scratch: &mut [Argb],
) {
    let (w, h) = (r.width as usize, r.height as usize);
    let line = &mut scratch[..w];
    let sctx = src.ctx();
    let dctx = dst.ctx();
    let sfmt = src.format();
    let dfmt = dst.format();
    let flip_x = flags.contains(BlitFlags::FLIP_X);
    let flip_y = flags.contains(BlitFlags::FLIP_Y);

    for j in 0..h {
        let sy = if flip_y {
            r.src_y as usize + h - 1 - j
        } else {
            r.src_y as usize + j
        };
        match sfmt.builtin() {
            Some(f) => (procs.fetch(f))(f, Access::Fast, src.row(sy), r.src_x as usize, line, &sctx),
            None => fetch_row_desc(sfmt.desc(), src.row(sy), r.src_x as usize, line, &sctx),
        }
        if flip_x {
            (procs.algebra.reverse)(line);
        }
        if tint != Argb::WHITE {
            (procs.algebra.tint)(line, tint);
        }
        let drow = dst.row_mut(r.dst_y as usize + j);
        match dfmt.builtin() {
            Some(f) => (procs.span(f, mode))(f, drow, r.dst_x as usize, line, None, &dctx),
            None => draw_span_desc(dfmt.desc(), mode, drow, r.dst_x as usize, line, None, &dctx),
        }
    }
}

/// Converts a source rectangle into the destination's format, with
/// optional colorkey transparency and mirroring.
///
/// Same two-phase contract as [`blend`]. The key compares against the
/// source's *native* cell values and is only honored with
/// [`BlitFlags::COLORKEY`].
#[allow(clippy::too_many_arguments)]
pub fn convert(
    procs: &Procs,
    dst: &mut SurfaceMut<'_>,
    dst_x: i32,
    dst_y: i32,
    src: &Surface<'_>,
    src_rect: ClipRect,
    key: u32,
    flags: BlitFlags,
    scratch: Option<&mut [Argb]>,
) -> usize {
    let w = src_rect.width().max(0) as usize;
    let required = scanline_bytes(w);
    let keyed = flags.contains(BlitFlags::COLORKEY);

    let sdesc = *src.format().desc();
    let ddesc = *dst.format().desc();
    let same_layout = sdesc == ddesc && !matches!(sdesc.class, pxl_formats::FormatClass::Indexed);

    if scratch.is_none() {
        return required;
    }
    let scratch = scratch.unwrap();
    assert!(
        scratch.len() >= w,
        "working memory holds {} pixels, the queried width needs {}",
        scratch.len(),
        w
    );

    let (dclip, sclip) = effective_clips(dst, src, flags);
    let Ok(r) = clip_blit(
        dclip,
        sclip,
        dst_x,
        dst_y,
        src_rect,
        flags.contains(BlitFlags::FLIP_X),
        flags.contains(BlitFlags::FLIP_Y),
    ) else {
        return required;
    };
    debug!(
        src = src.format().id(),
        dst = dst.format().id(),
        keyed,
        same_layout,
        w = r.width,
        h = r.height,
        "convert"
    );

    if same_layout {
        let proc: BlitProc = match (keyed, dst.format().builtin()) {
            (false, Some(f)) => procs.blit_plain(f),
            (true, Some(f)) => procs.blit_keyed(f),
            (false, None) => crate::blit::blit_plain,
            (true, None) => crate::blit::blit_keyed,
        };
        let (src_stride, dst_stride) = (src.stride(), dst.stride());
        proc(RawBlit {
            dst: dst.data_mut(),
            dst_stride,
            dst_x: r.dst_x as usize,
            dst_y: r.dst_y as usize,
            src: src.data(),
            src_stride,
            src_x: r.src_x as usize,
            src_y: r.src_y as usize,
            width: r.width as usize,
            height: r.height as usize,
            bits: sdesc.bits,
            key,
            flip_x: flags.contains(BlitFlags::FLIP_X),
            flip_y: flags.contains(BlitFlags::FLIP_Y),
        });
        return required;
    }

    if !keyed {
        blend_clipped(procs, dst, src, r, DrawMode::Copy, Argb::WHITE, flags, scratch);
        return required;
    }

    // Keyed cross-format conversion: the slow per-pixel loop over native
    // cells. Also the catch-all for free-format pairs.
    trace!("keyed per-pixel conversion");
    let sctx = src.ctx();
    let dctx = dst.ctx();
    let (w, h) = (r.width as usize, r.height as usize);
    let flip_x = flags.contains(BlitFlags::FLIP_X);
    let flip_y = flags.contains(BlitFlags::FLIP_Y);
    for j in 0..h {
        let sy = if flip_y {
            r.src_y as usize + h - 1 - j
        } else {
            r.src_y as usize + j
        };
        let srow = src.row(sy);
        let drow = dst.row_mut(r.dst_y as usize + j);
        for i in 0..w {
            let sx = if flip_x {
                r.src_x as usize + w - 1 - i
            } else {
                r.src_x as usize + i
            };
            let cell = read_cell(sdesc.bits, srow, sx);
            if cell == key {
                continue;
            }
            let p = fetch_cell(&sdesc, cell, &sctx);
            write_cell(
                ddesc.bits,
                drow,
                r.dst_x as usize + i,
                store_cell(&ddesc, p, &dctx),
            );
        }
    }
    required
}

/// Composites a source rectangle onto the destination through one of the
/// 35 [`CompositeOp`]s.
///
/// Same two-phase contract as [`blend`], but the working memory holds
/// *two* canonical scanlines (source and destination).
#[allow(clippy::too_many_arguments)]
pub fn composite(
    procs: &Procs,
    dst: &mut SurfaceMut<'_>,
    dst_x: i32,
    dst_y: i32,
    src: &Surface<'_>,
    src_rect: ClipRect,
    op: CompositeOp,
    flags: BlitFlags,
    scratch: Option<&mut [Argb]>,
) -> usize {
    let w = src_rect.width().max(0) as usize;
    let required = 2 * scanline_bytes(w);
    let Some(scratch) = scratch else {
        return required;
    };
    assert!(
        scratch.len() >= 2 * w,
        "working memory holds {} pixels, the queried width needs {}",
        scratch.len(),
        2 * w
    );

    let (dclip, sclip) = effective_clips(dst, src, flags);
    let Ok(r) = clip_blit(
        dclip,
        sclip,
        dst_x,
        dst_y,
        src_rect,
        flags.contains(BlitFlags::FLIP_X),
        flags.contains(BlitFlags::FLIP_Y),
    ) else {
        return required;
    };
    debug!(
        src = src.format().id(),
        dst = dst.format().id(),
        op = op.name(),
        w = r.width,
        h = r.height,
        "composite"
    );

    let (sline, dline) = scratch.split_at_mut(w);
    let (cw, ch) = (r.width as usize, r.height as usize);
    let sline = &mut sline[..cw];
    let dline = &mut dline[..cw];
    let sctx = src.ctx();
    let dctx = dst.ctx();
    let sfmt = src.format();
    let dfmt = dst.format();
    let flip_x = flags.contains(BlitFlags::FLIP_X);
    let flip_y = flags.contains(BlitFlags::FLIP_Y);

    for j in 0..ch {
        let sy = if flip_y {
            r.src_y as usize + ch - 1 - j
        } else {
            r.src_y as usize + j
        };
        match sfmt.builtin() {
            Some(f) => {
                (procs.fetch(f))(f, Access::Fast, src.row(sy), r.src_x as usize, sline, &sctx)
            }
            None => fetch_row_desc(sfmt.desc(), src.row(sy), r.src_x as usize, sline, &sctx),
        }
        if flip_x {
            (procs.algebra.reverse)(sline);
        }

        let dy = r.dst_y as usize + j;
        match dfmt.builtin() {
            Some(f) => {
                (procs.fetch(f))(f, Access::Fast, dst.row_mut(dy), r.dst_x as usize, dline, &dctx)
            }
            None => fetch_row_desc(dfmt.desc(), dst.row_mut(dy), r.dst_x as usize, dline, &dctx),
        }

        operators::apply(op, sline, dline);

        let drow = dst.row_mut(dy);
        match dfmt.builtin() {
            Some(f) => (procs.store(f))(f, drow, r.dst_x as usize, dline, &dctx),
            None => pxl_formats::store_row_desc(dfmt.desc(), drow, r.dst_x as usize, dline, &dctx),
        }
    }
    required
}

/// Stretches a source window onto a destination window of a different
/// size, format-preserving, nearest neighbor.
///
/// Sampling steps with the same error-accumulating walk a line
/// rasterizer uses, so a clipped destination window reads exactly the
/// source cells the unclipped stretch would have. Both surfaces must
/// share a bit depth (a caller contract); no channel reinterpretation
/// happens. Needs no working memory. Degenerate windows draw nothing.
pub fn stretch(
    dst: &mut SurfaceMut<'_>,
    dst_rect: ClipRect,
    src: &Surface<'_>,
    src_rect: ClipRect,
    key: u32,
    flags: BlitFlags,
) {
    let sdesc = *src.format().desc();
    let ddesc = *dst.format().desc();
    assert_eq!(
        sdesc.bits, ddesc.bits,
        "raw stretch requires matching bit depths"
    );

    let sclip = if flags.contains(BlitFlags::CLIP) {
        src.clip.intersect(&src.bounds())
    } else {
        src.bounds()
    };
    let sw = src_rect.intersect(&sclip);
    if sw.is_empty() || dst_rect.is_empty() {
        return;
    }

    let dclip = if flags.contains(BlitFlags::CLIP) {
        dst.clip.intersect(&dst.bounds())
    } else {
        dst.bounds()
    };
    let dw = dst_rect.intersect(&dclip);
    if dw.is_empty() {
        return;
    }
    debug!(
        src = src.format().id(),
        dst = dst.format().id(),
        sw = sw.width(),
        sh = sw.height(),
        dw = dst_rect.width(),
        dh = dst_rect.height(),
        "stretch"
    );

    let (src_stride, dst_stride) = (src.stride(), dst.stride());
    crate::blit::stretch(crate::blit::RawStretch {
        dst: dst.data_mut(),
        dst_stride,
        dst_x: dw.x0 as usize,
        dst_y: dw.y0 as usize,
        dst_w: dst_rect.width() as usize,
        dst_h: dst_rect.height() as usize,
        skip_x: (dw.x0 - dst_rect.x0) as usize,
        skip_y: (dw.y0 - dst_rect.y0) as usize,
        width: dw.width() as usize,
        height: dw.height() as usize,
        src: src.data(),
        src_stride,
        src_x: sw.x0 as usize,
        src_y: sw.y0 as usize,
        src_w: sw.width() as usize,
        src_h: sw.height() as usize,
        bits: sdesc.bits,
        key: flags.contains(BlitFlags::COLORKEY).then_some(key),
        flip_x: flags.contains(BlitFlags::FLIP_X),
        flip_y: flags.contains(BlitFlags::FLIP_Y),
    });
}

/// Fills a rectangle with one color through the hline procedures.
///
/// Needs no working memory. The rectangle is clipped against the surface
/// bounds (and the clip window with [`BlitFlags::CLIP`]).
pub fn fill_rect(
    procs: &Procs,
    dst: &mut SurfaceMut<'_>,
    rect: ClipRect,
    color: Argb,
    mode: DrawMode,
    flags: BlitFlags,
) {
    let clip = if flags.contains(BlitFlags::CLIP) {
        dst.clip.intersect(&dst.bounds())
    } else {
        dst.bounds()
    };
    let r = rect.intersect(&clip);
    if r.is_empty() {
        return;
    }
    debug!(dst = dst.format().id(), mode = mode.name(), "fill");
    let dctx = dst.ctx();
    let dfmt = dst.format();
    let (x, w) = (r.x0 as usize, r.width() as usize);
    for y in r.y0..r.y1 {
        let drow = dst.row_mut(y as usize);
        match dfmt.builtin() {
            Some(f) => (procs.hline(f, mode))(f, drow, x, w, color, None, &dctx),
            None => draw_hline_desc(dfmt.desc(), mode, drow, x, w, color, None, &dctx),
        }
    }
}
