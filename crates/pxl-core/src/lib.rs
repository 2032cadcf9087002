//! # pxl-core
//!
//! Canonical pixel representation and scanline primitives for the pxl-rs
//! compositing engine.
//!
//! This crate is the foundation of the workspace and has no internal
//! dependencies:
//!
//! - [`Argb`] - the canonical 32-bit ARGB pixel every operation works on
//! - [`algebra`] - array-level operations on canonical scanlines
//!   (reverse, tint, mask, coverage, premultiplied over, lane shuffle)
//! - [`clip`] - the shared mirror-aware blit clipping algorithm
//! - [`tables`] - the lazily built 8-bit multiply/divide tables behind
//!   the engine's fast alpha math
//!
//! ## Crate Structure
//!
//! ```text
//! pxl-core (this crate)
//!    ^
//!    |
//!    +-- pxl-palette (nearest-color search, index cache)
//!    +-- pxl-formats (descriptors, fetch/store)
//!    +-- pxl-ops     (spans, operators, blitter, conversion)
//! ```
//!
//! ## Ownership model
//!
//! Scanline buffers (`&mut [Argb]`), coverage buffers (`&[u8]`) and all
//! working memory are caller-owned; nothing in this crate allocates on an
//! operation path. The only allocation anywhere is the one-time build of
//! the lookup tables, which [`tables::init`] can force up front.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod algebra;
pub mod argb;
pub mod clip;
pub mod tables;

pub use argb::{Argb, Lane, LaneSelect, LANES_ABGR, LANES_ARGB};
pub use clip::{clip_blit, BlitRect, ClipRect, ClipReject};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use pxl_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algebra;
    pub use crate::argb::{Argb, Lane, LaneSelect, LANES_ABGR, LANES_ARGB};
    pub use crate::clip::{clip_blit, BlitRect, ClipRect, ClipReject};
    pub use crate::tables::{lerp8, mul255, mul8, unmul255, unmul8};
}
