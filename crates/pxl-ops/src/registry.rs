//! The overridable procedure registry.
//!
//! Every per-format procedure the engine dispatches through - fetch,
//! store, single-pixel fetch, span and hline drawing in each mode, the
//! raw blit pair - plus the scanline algebra operations, lives in a
//! [`Procs`] table. The conversion entry points take the table as an
//! explicit argument; there is no hidden process-wide instance. Hosts
//! install overrides once at startup and hand the table to their
//! workers.
//!
//! Passing `None` to any setter restores the built-in default for that
//! slot; [`Procs::reset`] restores everything.
//!
//! # Example
//!
//! ```rust
//! use pxl_core::Argb;
//! use pxl_formats::{FormatCtx, PixelFormat};
//! use pxl_ops::{DrawMode, Procs, SpanProc};
//!
//! fn log_span(
//!     format: PixelFormat,
//!     row: &mut [u8],
//!     x: usize,
//!     src: &[Argb],
//!     cover: Option<&[u8]>,
//!     ctx: &FormatCtx<'_>,
//! ) {
//!     // ... instrumentation, then forward to the default:
//!     Procs::default_span(DrawMode::Blend)(format, row, x, src, cover, ctx);
//! }
//!
//! let mut procs = Procs::new();
//! procs.set_span(PixelFormat::Argb8888, DrawMode::Blend, Some(log_span as SpanProc));
//! procs.set_span(PixelFormat::Argb8888, DrawMode::Blend, None); // back to builtin
//! ```

use pxl_core::algebra;
use pxl_core::{Argb, LaneSelect};
use pxl_formats::{Access, FormatCtx, PixelFormat, FORMAT_COUNT};

use crate::blit::RawBlit;
use crate::span::{self, DrawMode, DRAW_MODE_COUNT};

/// Scanline fetch procedure: row, pixel offset, output scanline.
pub type FetchProc =
    fn(PixelFormat, Access, &[u8], usize, &mut [Argb], &FormatCtx<'_>);

/// Scanline store procedure: row, pixel offset, input scanline.
pub type StoreProc = fn(PixelFormat, &mut [u8], usize, &[Argb], &FormatCtx<'_>);

/// Single-pixel fetch procedure.
pub type FetchPixelProc = fn(PixelFormat, &[u8], usize, &FormatCtx<'_>) -> Argb;

/// Span drawing procedure: row, pixel offset, source scanline, coverage.
pub type SpanProc =
    fn(PixelFormat, &mut [u8], usize, &[Argb], Option<&[u8]>, &FormatCtx<'_>);

/// Hline drawing procedure: row, pixel offset, width, color, coverage.
pub type HlineProc =
    fn(PixelFormat, &mut [u8], usize, usize, Argb, Option<&[u8]>, &FormatCtx<'_>);

/// Raw rectangle blit procedure.
pub type BlitProc = for<'a> fn(RawBlit<'a>);

/// Scanline algebra procedures, overridable as one group.
#[derive(Clone, Copy)]
pub struct AlgebraProcs {
    /// Mirror element order.
    pub reverse: fn(&mut [Argb]),
    /// Multiply by a constant color.
    pub tint: fn(&mut [Argb], Argb),
    /// Channel-wise multiply by a second scanline.
    pub mask: fn(&mut [Argb], &[Argb]),
    /// Scale alphas by a coverage buffer.
    pub attenuate: fn(&mut [Argb], &[u8]),
    /// Premultiplied source-over.
    pub over: fn(&mut [Argb], &[Argb]),
    /// Premultiplied source-over with coverage.
    pub over_cover: fn(&mut [Argb], &[Argb], &[u8]),
    /// Permute byte lanes.
    pub shuffle: fn(&mut [Argb], LaneSelect),
}

impl AlgebraProcs {
    /// The built-in implementations.
    pub const fn builtin() -> Self {
        Self {
            reverse: algebra::reverse,
            tint: algebra::tint,
            mask: algebra::mask_buf,
            attenuate: algebra::attenuate,
            over: algebra::over,
            over_cover: algebra::over_cover,
            shuffle: algebra::shuffle,
        }
    }
}

impl Default for AlgebraProcs {
    fn default() -> Self {
        Self::builtin()
    }
}

fn default_fetch(
    format: PixelFormat,
    access: Access,
    row: &[u8],
    x: usize,
    out: &mut [Argb],
    ctx: &FormatCtx<'_>,
) {
    pxl_formats::fetch_row(format, access, row, x, out, ctx);
}

fn default_store(
    format: PixelFormat,
    row: &mut [u8],
    x: usize,
    src: &[Argb],
    ctx: &FormatCtx<'_>,
) {
    pxl_formats::store_row(format, row, x, src, ctx);
}

fn default_fetch_pixel(format: PixelFormat, row: &[u8], x: usize, ctx: &FormatCtx<'_>) -> Argb {
    pxl_formats::fetch_pixel(format, row, x, ctx)
}

macro_rules! default_span_fn {
    ($name:ident, $mode:expr) => {
        fn $name(
            format: PixelFormat,
            row: &mut [u8],
            x: usize,
            src: &[Argb],
            cover: Option<&[u8]>,
            ctx: &FormatCtx<'_>,
        ) {
            span::draw_span(format, $mode, row, x, src, cover, ctx);
        }
    };
}

default_span_fn!(default_span_copy, DrawMode::Copy);
default_span_fn!(default_span_blend, DrawMode::Blend);
default_span_fn!(default_span_over, DrawMode::Over);
default_span_fn!(default_span_add, DrawMode::Add);

macro_rules! default_hline_fn {
    ($name:ident, $mode:expr) => {
        fn $name(
            format: PixelFormat,
            row: &mut [u8],
            x: usize,
            w: usize,
            color: Argb,
            cover: Option<&[u8]>,
            ctx: &FormatCtx<'_>,
        ) {
            span::draw_hline(format, $mode, row, x, w, color, cover, ctx);
        }
    };
}

default_hline_fn!(default_hline_copy, DrawMode::Copy);
default_hline_fn!(default_hline_blend, DrawMode::Blend);
default_hline_fn!(default_hline_over, DrawMode::Over);
default_hline_fn!(default_hline_add, DrawMode::Add);

/// The dispatch table of current procedures.
///
/// Construct once, optionally install overrides, then pass by reference
/// to the entry points. Overriding a slot while another thread draws
/// through the same table is a race; clone per thread or install before
/// spawning.
#[derive(Clone)]
pub struct Procs {
    fetch: [FetchProc; FORMAT_COUNT],
    store: [StoreProc; FORMAT_COUNT],
    fetch_pixel: [FetchPixelProc; FORMAT_COUNT],
    span: [[SpanProc; DRAW_MODE_COUNT]; FORMAT_COUNT],
    hline: [[HlineProc; DRAW_MODE_COUNT]; FORMAT_COUNT],
    blit_plain: [BlitProc; FORMAT_COUNT],
    blit_keyed: [BlitProc; FORMAT_COUNT],
    /// Scanline algebra slots.
    pub algebra: AlgebraProcs,
}

impl Procs {
    /// A table of built-in defaults.
    pub fn new() -> Self {
        Self {
            fetch: [default_fetch; FORMAT_COUNT],
            store: [default_store; FORMAT_COUNT],
            fetch_pixel: [default_fetch_pixel; FORMAT_COUNT],
            span: [Self::default_span_row(); FORMAT_COUNT],
            hline: [Self::default_hline_row(); FORMAT_COUNT],
            blit_plain: [crate::blit::blit_plain; FORMAT_COUNT],
            blit_keyed: [crate::blit::blit_keyed; FORMAT_COUNT],
            algebra: AlgebraProcs::builtin(),
        }
    }

    const fn default_span_row() -> [SpanProc; DRAW_MODE_COUNT] {
        [
            default_span_copy,
            default_span_blend,
            default_span_over,
            default_span_add,
        ]
    }

    const fn default_hline_row() -> [HlineProc; DRAW_MODE_COUNT] {
        [
            default_hline_copy,
            default_hline_blend,
            default_hline_over,
            default_hline_add,
        ]
    }

    /// The built-in span procedure for a mode.
    pub const fn default_span(mode: DrawMode) -> SpanProc {
        Self::default_span_row()[mode.index()]
    }

    /// The built-in hline procedure for a mode.
    pub const fn default_hline(mode: DrawMode) -> HlineProc {
        Self::default_hline_row()[mode.index()]
    }

    /// Current fetch procedure for a format.
    #[inline]
    pub fn fetch(&self, format: PixelFormat) -> FetchProc {
        self.fetch[format.id() as usize]
    }

    /// Current store procedure for a format.
    #[inline]
    pub fn store(&self, format: PixelFormat) -> StoreProc {
        self.store[format.id() as usize]
    }

    /// Current single-pixel fetch procedure for a format.
    #[inline]
    pub fn fetch_pixel(&self, format: PixelFormat) -> FetchPixelProc {
        self.fetch_pixel[format.id() as usize]
    }

    /// Current span procedure for a format and mode.
    #[inline]
    pub fn span(&self, format: PixelFormat, mode: DrawMode) -> SpanProc {
        self.span[format.id() as usize][mode.index()]
    }

    /// Current hline procedure for a format and mode.
    #[inline]
    pub fn hline(&self, format: PixelFormat, mode: DrawMode) -> HlineProc {
        self.hline[format.id() as usize][mode.index()]
    }

    /// Current plain raw-blit procedure for a format.
    #[inline]
    pub fn blit_plain(&self, format: PixelFormat) -> BlitProc {
        self.blit_plain[format.id() as usize]
    }

    /// Current colorkey raw-blit procedure for a format.
    #[inline]
    pub fn blit_keyed(&self, format: PixelFormat) -> BlitProc {
        self.blit_keyed[format.id() as usize]
    }

    /// Installs or clears a fetch override.
    pub fn set_fetch(&mut self, format: PixelFormat, proc: Option<FetchProc>) {
        self.fetch[format.id() as usize] = proc.unwrap_or(default_fetch);
    }

    /// Installs or clears a store override.
    pub fn set_store(&mut self, format: PixelFormat, proc: Option<StoreProc>) {
        self.store[format.id() as usize] = proc.unwrap_or(default_store);
    }

    /// Installs or clears a single-pixel fetch override.
    pub fn set_fetch_pixel(&mut self, format: PixelFormat, proc: Option<FetchPixelProc>) {
        self.fetch_pixel[format.id() as usize] = proc.unwrap_or(default_fetch_pixel);
    }

    /// Installs or clears a span override for one mode.
    pub fn set_span(&mut self, format: PixelFormat, mode: DrawMode, proc: Option<SpanProc>) {
        self.span[format.id() as usize][mode.index()] =
            proc.unwrap_or(Self::default_span(mode));
    }

    /// Installs or clears an hline override for one mode.
    pub fn set_hline(&mut self, format: PixelFormat, mode: DrawMode, proc: Option<HlineProc>) {
        self.hline[format.id() as usize][mode.index()] =
            proc.unwrap_or(Self::default_hline(mode));
    }

    /// Installs or clears a plain raw-blit override.
    pub fn set_blit_plain(&mut self, format: PixelFormat, proc: Option<BlitProc>) {
        self.blit_plain[format.id() as usize] = proc.unwrap_or(crate::blit::blit_plain);
    }

    /// Installs or clears a colorkey raw-blit override.
    pub fn set_blit_keyed(&mut self, format: PixelFormat, proc: Option<BlitProc>) {
        self.blit_keyed[format.id() as usize] = proc.unwrap_or(crate::blit::blit_keyed);
    }

    /// Restores every slot to its built-in default.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Procs {
    fn default() -> Self {
        Self::new()
    }
}
