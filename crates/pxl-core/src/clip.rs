//! The shared blit clipping algorithm.
//!
//! Every rectangular operation in the engine (blit, convert, blend,
//! composite) clips through this one function before touching pixels.
//! It clamps a destination position and source rectangle against both a
//! destination clip and a source clip, accounting for mirrored blits:
//! when a destination edge is clamped, the *non-flipped* source edge
//! absorbs the cut on a plain blit, and the *opposite* edge absorbs it
//! when that axis is mirrored.
//!
//! Rejections are ordinary outcomes, not errors: callers treat every
//! [`ClipReject`] as "draw nothing". The variants stay distinguishable
//! (and carry the classic small negative codes) for diagnostics.
//!
//! # Example
//!
//! ```rust
//! use pxl_core::clip::{clip_blit, ClipRect};
//!
//! let dst_clip = ClipRect::from_size(100, 100);
//! let src_clip = ClipRect::from_size(50, 50);
//! let r = clip_blit(dst_clip, src_clip, 90, 90, ClipRect::from_size(50, 50), false, false)
//!     .unwrap();
//! assert_eq!((r.dst_x, r.dst_y, r.width, r.height), (90, 90, 10, 10));
//! assert_eq!((r.src_x, r.src_y), (0, 0));
//! ```

use thiserror::Error;

/// A clip window: half-open `[x0, x1) x [y0, y1)` in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClipRect {
    /// Left edge (inclusive).
    pub x0: i32,
    /// Top edge (inclusive).
    pub y0: i32,
    /// Right edge (exclusive).
    pub x1: i32,
    /// Bottom edge (exclusive).
    pub y1: i32,
}

impl ClipRect {
    /// Builds a clip window from its edges.
    #[inline]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// A window anchored at the origin.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// A window at `(x, y)` with the given size.
    #[inline]
    pub const fn at(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Window width; negative when the edges are crossed.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    /// Window height; negative when the edges are crossed.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    /// `true` when the window covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// The window both clips share; empty when they are disjoint.
    #[inline]
    pub fn intersect(&self, other: &ClipRect) -> ClipRect {
        ClipRect::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        )
    }
}

/// A clipped blit: where to write, where to read, and how much.
///
/// `src_x`/`src_y` name the surviving source origin in un-mirrored source
/// coordinates; mirrored blits read the same window in the opposite
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitRect {
    /// Destination X of the surviving rectangle.
    pub dst_x: i32,
    /// Destination Y of the surviving rectangle.
    pub dst_y: i32,
    /// Source X of the surviving rectangle.
    pub src_x: i32,
    /// Source Y of the surviving rectangle.
    pub src_y: i32,
    /// Surviving width, always positive.
    pub width: i32,
    /// Surviving height, always positive.
    pub height: i32,
}

/// Why a blit rectangle survived no clipping; always means "draw nothing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClipReject {
    /// The destination clip window is empty.
    #[error("destination clip window is empty")]
    DegenerateDestClip,
    /// The source clip window is empty.
    #[error("source clip window is empty")]
    DegenerateSourceClip,
    /// The rectangles share no pixels at all.
    #[error("rectangles do not overlap")]
    NoOverlap,
    /// Everything fell left of / above the destination window.
    #[error("clipped out at destination left/top edge")]
    DestMin,
    /// Everything fell right of / below the destination window.
    #[error("clipped out at destination right/bottom edge")]
    DestMax,
    /// Everything fell left of / above the source window.
    #[error("clipped out at source left/top edge")]
    SourceMin,
    /// Everything fell right of / below the source window.
    #[error("clipped out at source right/bottom edge")]
    SourceMax,
}

impl ClipReject {
    /// The classic small negative diagnostic code for this rejection.
    #[inline]
    pub const fn code(self) -> i32 {
        match self {
            Self::DegenerateDestClip => -1,
            Self::DegenerateSourceClip => -2,
            Self::NoOverlap => -3,
            Self::DestMin => -4,
            Self::DestMax => -5,
            Self::SourceMin => -6,
            Self::SourceMax => -7,
        }
    }
}

/// Clips a blit of `src_rect` to position `(dst_x, dst_y)` against both
/// windows, with mirror-aware edge bookkeeping.
///
/// Clamping proceeds in four steps - destination min edges, destination
/// max edges, source min edges, source max edges - and reports which step
/// emptied the rectangle. See the module docs for the flip rule.
pub fn clip_blit(
    dst_clip: ClipRect,
    src_clip: ClipRect,
    dst_x: i32,
    dst_y: i32,
    src_rect: ClipRect,
    flip_x: bool,
    flip_y: bool,
) -> Result<BlitRect, ClipReject> {
    if dst_clip.is_empty() {
        return Err(ClipReject::DegenerateDestClip);
    }
    if src_clip.is_empty() {
        return Err(ClipReject::DegenerateSourceClip);
    }

    let mut w = src_rect.width();
    let mut h = src_rect.height();
    if w <= 0 || h <= 0 {
        return Err(ClipReject::NoOverlap);
    }

    let (mut dx, mut dy) = (dst_x, dst_y);
    let (mut sx, mut sy) = (src_rect.x0, src_rect.y0);

    // Fully disjoint cases are one outcome regardless of which edge is
    // responsible.
    if dx >= dst_clip.x1
        || dy >= dst_clip.y1
        || dx + w <= dst_clip.x0
        || dy + h <= dst_clip.y0
        || sx >= src_clip.x1
        || sy >= src_clip.y1
        || sx + w <= src_clip.x0
        || sy + h <= src_clip.y0
    {
        return Err(ClipReject::NoOverlap);
    }

    // Step 1: destination left/top.
    let cut = dst_clip.x0 - dx;
    if cut > 0 {
        w -= cut;
        if w <= 0 {
            return Err(ClipReject::DestMin);
        }
        dx = dst_clip.x0;
        if !flip_x {
            sx += cut;
        }
    }
    let cut = dst_clip.y0 - dy;
    if cut > 0 {
        h -= cut;
        if h <= 0 {
            return Err(ClipReject::DestMin);
        }
        dy = dst_clip.y0;
        if !flip_y {
            sy += cut;
        }
    }

    // Step 2: destination right/bottom. A mirrored axis consumes from the
    // opposite source edge.
    let cut = (dx + w) - dst_clip.x1;
    if cut > 0 {
        w -= cut;
        if w <= 0 {
            return Err(ClipReject::DestMax);
        }
        if flip_x {
            sx += cut;
        }
    }
    let cut = (dy + h) - dst_clip.y1;
    if cut > 0 {
        h -= cut;
        if h <= 0 {
            return Err(ClipReject::DestMax);
        }
        if flip_y {
            sy += cut;
        }
    }

    // Step 3: source left/top.
    let cut = src_clip.x0 - sx;
    if cut > 0 {
        w -= cut;
        if w <= 0 {
            return Err(ClipReject::SourceMin);
        }
        sx = src_clip.x0;
        if !flip_x {
            dx += cut;
        }
    }
    let cut = src_clip.y0 - sy;
    if cut > 0 {
        h -= cut;
        if h <= 0 {
            return Err(ClipReject::SourceMin);
        }
        sy = src_clip.y0;
        if !flip_y {
            dy += cut;
        }
    }

    // Step 4: source right/bottom.
    let cut = (sx + w) - src_clip.x1;
    if cut > 0 {
        w -= cut;
        if w <= 0 {
            return Err(ClipReject::SourceMax);
        }
        if flip_x {
            dx += cut;
        }
    }
    let cut = (sy + h) - src_clip.y1;
    if cut > 0 {
        h -= cut;
        if h <= 0 {
            return Err(ClipReject::SourceMax);
        }
        if flip_y {
            dy += cut;
        }
    }

    Ok(BlitRect {
        dst_x: dx,
        dst_y: dy,
        src_x: sx,
        src_y: sy,
        width: w,
        height: h,
    })
}
