//! Surface views over raw pixel memory.
//!
//! The entry points accept pixel memory as plain `(data, stride, x/y)`
//! views; nothing here owns pixels or allocates. A [`Surface`] is a
//! read-only source, a [`SurfaceMut`] a writable destination. Both carry
//! their format, a clip window (honored when the caller passes the clip
//! flag), and the optional [`ColorIndex`] indexed formats transcode
//! through.
//!
//! Construction validates the geometry: the stride must cover one row
//! and the buffer must cover `height` rows. These are the only
//! recoverable errors in this crate - everything after construction
//! either draws or silently draws nothing.

use pxl_core::ClipRect;
use pxl_formats::{FormatCtx, FormatRef};
use pxl_palette::ColorIndex;

use crate::error::{OpsError, OpsResult};

fn check_geometry(
    len: usize,
    stride: usize,
    width: usize,
    height: usize,
    bits: u8,
) -> OpsResult<()> {
    let min_stride = (width * bits as usize).div_ceil(8);
    if stride < min_stride {
        return Err(OpsError::StrideTooSmall { stride, min_stride, width });
    }
    let needed = (height.saturating_sub(1)) * stride + min_stride;
    if height > 0 && len < needed {
        return Err(OpsError::BufferTooSmall { len, height, stride });
    }
    Ok(())
}

/// A read-only pixel surface.
#[derive(Debug, Clone, Copy)]
pub struct Surface<'a> {
    data: &'a [u8],
    stride: usize,
    width: usize,
    height: usize,
    format: FormatRef<'a>,
    /// Clip window honored by clipped operations. Defaults to the full
    /// surface.
    pub clip: ClipRect,
    index: Option<&'a ColorIndex>,
}

impl<'a> Surface<'a> {
    /// Builds a view over `data` with the given geometry.
    pub fn new(
        data: &'a [u8],
        stride: usize,
        width: usize,
        height: usize,
        format: impl Into<FormatRef<'a>>,
    ) -> OpsResult<Self> {
        let format = format.into();
        check_geometry(data.len(), stride, width, height, format.desc().bits)?;
        Ok(Self {
            data,
            stride,
            width,
            height,
            format,
            clip: ClipRect::from_size(width as i32, height as i32),
            index: None,
        })
    }

    /// Attaches the color cache indexed formats need.
    #[must_use]
    pub fn with_index(mut self, index: &'a ColorIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Restricts the clip window.
    #[must_use]
    pub fn with_clip(mut self, clip: ClipRect) -> Self {
        self.clip = clip;
        self
    }

    /// Surface width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Surface height in rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The pixel format.
    #[inline]
    pub fn format(&self) -> FormatRef<'a> {
        self.format
    }

    /// The full extent as a clip window.
    #[inline]
    pub fn bounds(&self) -> ClipRect {
        ClipRect::from_size(self.width as i32, self.height as i32)
    }

    /// Raw bytes of row `y` (and everything after it).
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        &self.data[y * self.stride..]
    }

    /// The whole underlying buffer.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Transcoding context carrying this surface's palette cache.
    #[inline]
    pub fn ctx(&self) -> FormatCtx<'a> {
        FormatCtx { index: self.index }
    }
}

/// A writable pixel surface.
#[derive(Debug)]
pub struct SurfaceMut<'a> {
    data: &'a mut [u8],
    stride: usize,
    width: usize,
    height: usize,
    format: FormatRef<'a>,
    /// Clip window honored by clipped operations. Defaults to the full
    /// surface.
    pub clip: ClipRect,
    index: Option<&'a ColorIndex>,
}

impl<'a> SurfaceMut<'a> {
    /// Builds a writable view over `data` with the given geometry.
    pub fn new(
        data: &'a mut [u8],
        stride: usize,
        width: usize,
        height: usize,
        format: impl Into<FormatRef<'a>>,
    ) -> OpsResult<Self> {
        let format = format.into();
        check_geometry(data.len(), stride, width, height, format.desc().bits)?;
        Ok(Self {
            data,
            stride,
            width,
            height,
            format,
            clip: ClipRect::from_size(width as i32, height as i32),
            index: None,
        })
    }

    /// Attaches the color cache indexed formats need.
    #[must_use]
    pub fn with_index(mut self, index: &'a ColorIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Restricts the clip window.
    #[must_use]
    pub fn with_clip(mut self, clip: ClipRect) -> Self {
        self.clip = clip;
        self
    }

    /// Surface width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Surface height in rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The pixel format.
    #[inline]
    pub fn format(&self) -> FormatRef<'a> {
        self.format
    }

    /// The full extent as a clip window.
    #[inline]
    pub fn bounds(&self) -> ClipRect {
        ClipRect::from_size(self.width as i32, self.height as i32)
    }

    /// Raw bytes of row `y` (and everything after it).
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.data[y * self.stride..]
    }

    /// The whole underlying buffer.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.data
    }

    /// Transcoding context carrying this surface's palette cache.
    #[inline]
    pub fn ctx(&self) -> FormatCtx<'a> {
        FormatCtx { index: self.index }
    }

    /// A read-only view of the same surface.
    #[inline]
    pub fn as_surface(&self) -> Surface<'_> {
        Surface {
            data: self.data,
            stride: self.stride,
            width: self.width,
            height: self.height,
            format: self.format,
            clip: self.clip,
            index: self.index,
        }
    }
}
