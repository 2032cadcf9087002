//! # pxl-ops
//!
//! Scanline compositing and conversion for the pxl-rs engine.
//!
//! This crate composes the lower layers into the public drawing surface:
//!
//! - [`span`] - per-format span/hline drawing in four [`DrawMode`]s with
//!   optional coverage
//! - [`operators`] - the 35-entry [`CompositeOp`] table
//! - [`blit`] - the raw bit-depth blitter and rectangle stretcher
//!   (plain and colorkeyed, both mirror axes)
//! - [`convert`](mod@convert) - the [`blend`], [`convert`],
//!   [`composite`], [`stretch`] and [`fill_rect`] entry points, the
//!   first three with two-phase working memory sizing
//! - [`registry`] - the overridable [`Procs`] dispatch table
//!
//! # Example
//!
//! ```rust
//! use pxl_core::{Argb, ClipRect};
//! use pxl_formats::PixelFormat;
//! use pxl_ops::{blend, BlitFlags, DrawMode, Procs, Surface, SurfaceMut};
//!
//! let procs = Procs::new();
//!
//! // One row of RGB565 over an ARGB8888 destination.
//! let src_px: Vec<u8> = [0xf800u16, 0x07e0].iter().flat_map(|c| c.to_ne_bytes()).collect();
//! let mut dst_px = vec![0u8; 2 * 4];
//! let src = Surface::new(&src_px, 4, 2, 1, PixelFormat::Rgb565).unwrap();
//! let mut dst = SurfaceMut::new(&mut dst_px, 8, 2, 1, PixelFormat::Argb8888).unwrap();
//!
//! let rect = ClipRect::from_size(2, 1);
//! let bytes = blend(&procs, &mut dst, 0, 0, &src, rect, DrawMode::Blend,
//!     Argb::WHITE, BlitFlags::empty(), None);
//! let mut scratch = vec![Argb::TRANSPARENT; bytes / 4];
//! blend(&procs, &mut dst, 0, 0, &src, rect, DrawMode::Blend,
//!     Argb::WHITE, BlitFlags::empty(), Some(&mut scratch));
//! ```
//!
//! # Concurrency
//!
//! Every operation is a synchronous scan over caller-owned memory. The
//! lazy lookup tables initialize thread-safely; [`init`] pins the cost up
//! front. [`Procs`] tables are plain values - share them read-only, or
//! clone per thread if a worker needs its own overrides.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod blit;
pub mod convert;
mod error;
pub mod operators;
pub mod registry;
pub mod span;
mod surface;

pub use convert::{blend, composite, convert, fill_rect, stretch, BlitFlags};
pub use error::{OpsError, OpsResult};
pub use operators::{apply, apply_pixel, CompositeOp, ALL_OPS, COMPOSITE_OP_COUNT};
pub use registry::{
    AlgebraProcs, BlitProc, FetchPixelProc, FetchProc, HlineProc, Procs, SpanProc, StoreProc,
};
pub use span::{draw_hline, draw_span, DrawMode, DRAW_MODE_COUNT};
pub use surface::{Surface, SurfaceMut};

/// Forces construction of every lazily built table the engine uses: the
/// multiply/divide tables, the palette distance tables, and the
/// per-format expansion tables.
///
/// Purely a warm-up for hosts that want deterministic startup cost;
/// first use builds them safely otherwise.
pub fn init() {
    pxl_core::tables::init();
    pxl_palette::init();
    pxl_formats::init();
}
