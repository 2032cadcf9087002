//! The raw bit-depth blitter.
//!
//! Copies rectangles between buffers of the same depth with no channel
//! reinterpretation: bytes (or packed cells) move as they are. Two axes
//! of variation: depth (8/16/32-bit rows copy as slices, 1/4/24-bit rows
//! go through the packed cell accessors) and transparency (plain copy,
//! or skip cells equal to a colorkey).
//!
//! Mirroring: horizontal flip reverses the read direction within each
//! row; vertical flip starts reading at the far row and walks backwards,
//! so the inner loop is identical for both flip states.
//!
//! Geometry is the caller's problem: the entry points in
//! [`convert`](mod@crate::convert) clip first and hand this module only
//! in-bounds rectangles. Mismatched depths between the two surfaces are
//! a caller bug, checked by assertion.

use pxl_formats::{read_cell, write_cell};
use tracing::trace;

/// One clipped raw blit: geometry in pixels, strides in bytes.
///
/// `src_x`/`src_y` name the source window in un-mirrored coordinates;
/// the flip flags choose the read direction over that window.
pub struct RawBlit<'a> {
    /// Destination buffer.
    pub dst: &'a mut [u8],
    /// Destination stride in bytes.
    pub dst_stride: usize,
    /// Destination X in pixels.
    pub dst_x: usize,
    /// Destination Y in rows.
    pub dst_y: usize,
    /// Source buffer.
    pub src: &'a [u8],
    /// Source stride in bytes.
    pub src_stride: usize,
    /// Source X in pixels.
    pub src_x: usize,
    /// Source Y in rows.
    pub src_y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in rows.
    pub height: usize,
    /// Bits per pixel of both buffers.
    pub bits: u8,
    /// Cell value treated as transparent by the keyed variant.
    pub key: u32,
    /// Read each row right-to-left.
    pub flip_x: bool,
    /// Read rows bottom-to-top.
    pub flip_y: bool,
}

impl RawBlit<'_> {
    /// Source row index feeding destination row `j`.
    #[inline]
    fn src_row(&self, j: usize) -> usize {
        if self.flip_y {
            self.src_y + self.height - 1 - j
        } else {
            self.src_y + j
        }
    }

    /// Source pixel index feeding destination pixel `i`.
    #[inline]
    fn src_col(&self, i: usize) -> usize {
        if self.flip_x {
            self.src_x + self.width - 1 - i
        } else {
            self.src_x + i
        }
    }
}

/// Copies every cell of the rectangle.
pub fn blit_plain(args: RawBlit<'_>) {
    trace!(
        bits = args.bits,
        w = args.width,
        h = args.height,
        "raw blit"
    );
    let whole_bytes = args.bits as usize / 8;
    if whole_bytes > 0 && !args.flip_x && args.bits != 24 {
        // Straight rows of whole cells move as one slice copy. The 24-bit
        // depth shares the packed loop so a flipped pixel never splits.
        for j in 0..args.height {
            let so = args.src_row(j) * args.src_stride + args.src_x * whole_bytes;
            let doff = (args.dst_y + j) * args.dst_stride + args.dst_x * whole_bytes;
            let n = args.width * whole_bytes;
            args.dst[doff..doff + n].copy_from_slice(&args.src[so..so + n]);
        }
        return;
    }
    for j in 0..args.height {
        let src_row = &args.src[args.src_row(j) * args.src_stride..];
        let dst_off = (args.dst_y + j) * args.dst_stride;
        for i in 0..args.width {
            let cell = read_cell(args.bits, src_row, args.src_col(i));
            write_cell(args.bits, &mut args.dst[dst_off..], args.dst_x + i, cell);
        }
    }
}

/// One clipped raw stretch: a source window resampled onto a
/// destination window of a different size, nearest neighbor.
pub struct RawStretch<'a> {
    /// Destination buffer.
    pub dst: &'a mut [u8],
    /// Destination stride in bytes.
    pub dst_stride: usize,
    /// Destination X in pixels.
    pub dst_x: usize,
    /// Destination Y in rows.
    pub dst_y: usize,
    /// Destination width in pixels.
    pub dst_w: usize,
    /// Destination height in rows.
    pub dst_h: usize,
    /// Leading destination columns already clipped away.
    pub skip_x: usize,
    /// Leading destination rows already clipped away.
    pub skip_y: usize,
    /// Surviving width in pixels.
    pub width: usize,
    /// Surviving height in rows.
    pub height: usize,
    /// Source buffer.
    pub src: &'a [u8],
    /// Source stride in bytes.
    pub src_stride: usize,
    /// Source X in pixels.
    pub src_x: usize,
    /// Source Y in rows.
    pub src_y: usize,
    /// Source width in pixels.
    pub src_w: usize,
    /// Source height in rows.
    pub src_h: usize,
    /// Bits per pixel of both buffers.
    pub bits: u8,
    /// Cell value treated as transparent by the keyed variant.
    pub key: Option<u32>,
    /// Mirror horizontally.
    pub flip_x: bool,
    /// Mirror vertically.
    pub flip_y: bool,
}

/// An error-accumulating axis stepper: walks `dst_extent` output cells
/// over `src_extent` input cells, advancing the source index the way a
/// line rasterizer advances its minor axis.
struct Stepper {
    index: usize,
    err: usize,
    src_extent: usize,
    dst_extent: usize,
}

impl Stepper {
    /// A stepper pre-advanced past `skip` output cells.
    fn new(src_extent: usize, dst_extent: usize, skip: usize) -> Self {
        let total = skip * src_extent;
        Self {
            index: total / dst_extent,
            err: total % dst_extent,
            src_extent,
            dst_extent,
        }
    }

    /// Current source cell, then advance one output cell.
    fn next(&mut self) -> usize {
        let i = self.index;
        self.err += self.src_extent;
        while self.err >= self.dst_extent {
            self.err -= self.dst_extent;
            self.index += 1;
        }
        i
    }
}

/// Stretches a source window onto a destination window, nearest
/// neighbor, optionally skipping cells equal to a key.
///
/// `skip_x`/`skip_y` pre-advance the sampling so a clipped destination
/// window still reads the same source cells the unclipped stretch would
/// have.
pub fn stretch(args: RawStretch<'_>) {
    trace!(
        bits = args.bits,
        sw = args.src_w,
        sh = args.src_h,
        dw = args.dst_w,
        dh = args.dst_h,
        "raw stretch"
    );
    if args.width == 0 || args.height == 0 || args.src_w == 0 || args.src_h == 0 {
        return;
    }
    let mut rows = Stepper::new(args.src_h, args.dst_h, args.skip_y);
    for j in 0..args.height {
        let sj = rows.next();
        let sy = if args.flip_y {
            args.src_y + args.src_h - 1 - sj
        } else {
            args.src_y + sj
        };
        let src_row = &args.src[sy * args.src_stride..];
        let dst_off = (args.dst_y + j) * args.dst_stride;
        let mut cols = Stepper::new(args.src_w, args.dst_w, args.skip_x);
        for i in 0..args.width {
            let si = cols.next();
            let sx = if args.flip_x {
                args.src_x + args.src_w - 1 - si
            } else {
                args.src_x + si
            };
            let cell = read_cell(args.bits, src_row, sx);
            if args.key == Some(cell) {
                continue;
            }
            write_cell(args.bits, &mut args.dst[dst_off..], args.dst_x + i, cell);
        }
    }
}

/// Copies every cell of the rectangle except those equal to the key.
pub fn blit_keyed(args: RawBlit<'_>) {
    trace!(
        bits = args.bits,
        key = args.key,
        w = args.width,
        h = args.height,
        "keyed raw blit"
    );
    for j in 0..args.height {
        let src_row = &args.src[args.src_row(j) * args.src_stride..];
        let dst_off = (args.dst_y + j) * args.dst_stride;
        for i in 0..args.width {
            let cell = read_cell(args.bits, src_row, args.src_col(i));
            if cell == args.key {
                continue;
            }
            write_cell(args.bits, &mut args.dst[dst_off..], args.dst_x + i, cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blit8(
        dst: &mut [u8],
        dst_w: usize,
        src: &[u8],
        src_w: usize,
        rect: (usize, usize, usize, usize, usize, usize),
        key: Option<u32>,
        flip_x: bool,
        flip_y: bool,
    ) {
        let (dst_x, dst_y, src_x, src_y, w, h) = rect;
        let args = RawBlit {
            dst,
            dst_stride: dst_w,
            dst_x,
            dst_y,
            src,
            src_stride: src_w,
            src_x,
            src_y,
            width: w,
            height: h,
            bits: 8,
            key: key.unwrap_or(0),
            flip_x,
            flip_y,
        };
        match key {
            Some(_) => blit_keyed(args),
            None => blit_plain(args),
        }
    }

    #[test]
    fn test_plain_copy() {
        let src = [1u8, 2, 3, 4, 5, 6];
        let mut dst = [0u8; 6];
        blit8(&mut dst, 3, &src, 3, (0, 0, 0, 0, 3, 2), None, false, false);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_offset_copy() {
        let src = [1u8, 2, 3, 4];
        let mut dst = [9u8; 9];
        // 2x2 source into the bottom-right corner of a 3x3 destination.
        blit8(&mut dst, 3, &src, 2, (1, 1, 0, 0, 2, 2), None, false, false);
        assert_eq!(dst, [9, 9, 9, 9, 1, 2, 9, 3, 4]);
    }

    #[test]
    fn test_colorkey_skips() {
        let src = [5u8, 7, 5, 9];
        let mut dst = [1u8; 4];
        blit8(&mut dst, 4, &src, 4, (0, 0, 0, 0, 4, 1), Some(5), false, false);
        assert_eq!(dst, [1, 7, 1, 9]);
    }

    #[test]
    fn test_flip_x() {
        let src = [1u8, 2, 3];
        let mut dst = [0u8; 3];
        blit8(&mut dst, 3, &src, 3, (0, 0, 0, 0, 3, 1), None, true, false);
        assert_eq!(dst, [3, 2, 1]);
    }

    #[test]
    fn test_flip_y() {
        let src = [1u8, 2, 3, 4];
        let mut dst = [0u8; 4];
        blit8(&mut dst, 2, &src, 2, (0, 0, 0, 0, 2, 2), None, false, true);
        assert_eq!(dst, [3, 4, 1, 2]);
    }

    #[test]
    fn test_flip_both() {
        let src = [1u8, 2, 3, 4];
        let mut dst = [0u8; 4];
        blit8(&mut dst, 2, &src, 2, (0, 0, 0, 0, 2, 2), None, true, true);
        assert_eq!(dst, [4, 3, 2, 1]);
    }

    #[test]
    fn test_sub_byte_blit() {
        // 1-bit: copy 4 pixels from offset 2 to offset 3.
        let src = [0b0011_0100u8];
        let mut dst = [0u8];
        let args = RawBlit {
            dst: &mut dst,
            dst_stride: 1,
            dst_x: 3,
            dst_y: 0,
            src: &src,
            src_stride: 1,
            src_x: 2,
            src_y: 0,
            width: 4,
            height: 1,
            bits: 1,
            key: 0,
            flip_x: false,
            flip_y: false,
        };
        blit_plain(args);
        assert_eq!(dst, [0b0001_1010]);
    }

    #[test]
    fn test_16bit_rows() {
        let cells: Vec<u16> = vec![10, 11, 12, 20, 21, 22];
        let src: Vec<u8> = cells.iter().flat_map(|c| c.to_ne_bytes()).collect();
        let mut dst = vec![0u8; src.len()];
        let args = RawBlit {
            dst: &mut dst,
            dst_stride: 6,
            dst_x: 0,
            dst_y: 0,
            src: &src,
            src_stride: 6,
            src_x: 1,
            src_y: 0,
            width: 2,
            height: 2,
            bits: 16,
            key: 0,
            flip_x: false,
            flip_y: false,
        };
        blit_plain(args);
        let out: Vec<u16> = dst
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes(c.try_into().unwrap()))
            .collect();
        assert_eq!(out, [11, 12, 0, 21, 22, 0]);
    }

    fn stretch8(
        dst: &mut [u8],
        dst_w: usize,
        dst_rect: (usize, usize),
        src: &[u8],
        src_w: usize,
        src_rect: (usize, usize),
        skip: (usize, usize),
        out: (usize, usize, usize, usize),
        key: Option<u32>,
    ) {
        let (dw, dh) = dst_rect;
        let (sw, sh) = src_rect;
        let (dst_x, dst_y, width, height) = out;
        stretch(RawStretch {
            dst,
            dst_stride: dst_w,
            dst_x,
            dst_y,
            dst_w: dw,
            dst_h: dh,
            skip_x: skip.0,
            skip_y: skip.1,
            width,
            height,
            src,
            src_stride: src_w,
            src_x: 0,
            src_y: 0,
            src_w: sw,
            src_h: sh,
            bits: 8,
            key,
            flip_x: false,
            flip_y: false,
        });
    }

    #[test]
    fn test_stretch_identity_matches_copy() {
        let src = [1u8, 2, 3, 4, 5, 6];
        let mut dst = [0u8; 6];
        stretch8(&mut dst, 3, (3, 2), &src, 3, (3, 2), (0, 0), (0, 0, 3, 2), None);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_stretch_doubles() {
        let src = [1u8, 2];
        let mut dst = [0u8; 4];
        stretch8(&mut dst, 4, (4, 1), &src, 2, (2, 1), (0, 0), (0, 0, 4, 1), None);
        assert_eq!(dst, [1, 1, 2, 2]);
    }

    #[test]
    fn test_stretch_halves() {
        let src = [1u8, 2, 3, 4];
        let mut dst = [0u8; 2];
        stretch8(&mut dst, 2, (2, 1), &src, 4, (4, 1), (0, 0), (0, 0, 2, 1), None);
        assert_eq!(dst, [1, 3]);
    }

    #[test]
    fn test_stretch_rows() {
        let src = [7u8, 8];
        let mut dst = [0u8; 6];
        // One source row replicated over three destination rows.
        stretch8(&mut dst, 2, (2, 3), &src, 2, (2, 1), (0, 0), (0, 0, 2, 3), None);
        assert_eq!(dst, [7, 8, 7, 8, 7, 8]);
    }

    #[test]
    fn test_stretch_skip_reads_same_cells() {
        // A clipped window reproduces the tail of the unclipped stretch.
        let src = [1u8, 2, 3];
        let mut whole = [0u8; 6];
        stretch8(&mut whole, 6, (6, 1), &src, 3, (3, 1), (0, 0), (0, 0, 6, 1), None);
        let mut tail = [0u8; 6];
        stretch8(&mut tail, 6, (6, 1), &src, 3, (3, 1), (2, 0), (2, 0, 4, 1), None);
        assert_eq!(&tail[2..], &whole[2..]);
    }

    #[test]
    fn test_stretch_keyed() {
        let src = [5u8, 9];
        let mut dst = [1u8; 4];
        stretch8(&mut dst, 4, (4, 1), &src, 2, (2, 1), (0, 0), (0, 0, 4, 1), Some(5));
        assert_eq!(dst, [1, 1, 9, 9]);
    }

    #[test]
    fn test_24bit_flip_x() {
        // Three 24-bit pixels reversed in place.
        let src = [1u8, 1, 1, 2, 2, 2, 3, 3, 3];
        let mut dst = [0u8; 9];
        let args = RawBlit {
            dst: &mut dst,
            dst_stride: 9,
            dst_x: 0,
            dst_y: 0,
            src: &src,
            src_stride: 9,
            src_x: 0,
            src_y: 0,
            width: 3,
            height: 1,
            bits: 24,
            key: 0,
            flip_x: true,
            flip_y: false,
        };
        blit_plain(args);
        assert_eq!(dst, [3, 3, 3, 2, 2, 2, 1, 1, 1]);
    }
}
