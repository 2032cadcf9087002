//! Array-level operations on canonical-pixel scanlines.
//!
//! These are the building blocks the span and conversion layers compose:
//! every operation walks one caller-owned scanline of [`Argb`] values in
//! place. Nothing here allocates.
//!
//! The scaled operations (`tint`, `mask_buf`, `attenuate`, `over`) use the
//! fast fixed-point tables by default; each has an `_exact` twin using
//! rounded `/255` division for callers that need it.
//!
//! # Example
//!
//! ```rust
//! use pxl_core::{algebra, Argb};
//!
//! let mut line = [Argb::from_rgb(200, 100, 50); 4];
//! algebra::tint(&mut line, Argb::new(255, 128, 255, 255));
//! assert!(line[0].r() < 200); // red halved
//! assert_eq!(line[0].g(), 100);
//! ```

use crate::argb::{Argb, LaneSelect};
use crate::tables::{mul255, mul8};

/// Mirrors the element order of a scanline.
///
/// Used by horizontally flipped blits: the source row is fetched forward
/// and reversed once, so every downstream consumer sees a plain run.
#[inline]
pub fn reverse(buf: &mut [Argb]) {
    buf.reverse();
}

/// Multiplies every channel of every element by the matching channel of
/// one constant color, fast fixed point.
///
/// Tinting by [`Argb::WHITE`] is the identity.
pub fn tint(buf: &mut [Argb], color: Argb) {
    if color == Argb::WHITE {
        return;
    }
    let (ca, cr, cg, cb) = (color.a(), color.r(), color.g(), color.b());
    for p in buf.iter_mut() {
        *p = Argb::new(
            mul8(ca, p.a()),
            mul8(cr, p.r()),
            mul8(cg, p.g()),
            mul8(cb, p.b()),
        );
    }
}

/// Exact-division counterpart of [`tint`].
pub fn tint_exact(buf: &mut [Argb], color: Argb) {
    if color == Argb::WHITE {
        return;
    }
    let (ca, cr, cg, cb) = (color.a(), color.r(), color.g(), color.b());
    for p in buf.iter_mut() {
        *p = Argb::new(
            mul255(ca, p.a()),
            mul255(cr, p.r()),
            mul255(cg, p.g()),
            mul255(cb, p.b()),
        );
    }
}

/// Channel-wise multiply against a second scanline of the same length.
///
/// Used for soft masks: the mask buffer's channels scale the target's.
pub fn mask_buf(buf: &mut [Argb], mask: &[Argb]) {
    assert_eq!(buf.len(), mask.len(), "mask length must match scanline");
    for (p, m) in buf.iter_mut().zip(mask) {
        *p = Argb::new(
            mul8(m.a(), p.a()),
            mul8(m.r(), p.r()),
            mul8(m.g(), p.g()),
            mul8(m.b(), p.b()),
        );
    }
}

/// Exact-division counterpart of [`mask_buf`].
pub fn mask_buf_exact(buf: &mut [Argb], mask: &[Argb]) {
    assert_eq!(buf.len(), mask.len(), "mask length must match scanline");
    for (p, m) in buf.iter_mut().zip(mask) {
        *p = Argb::new(
            mul255(m.a(), p.a()),
            mul255(m.r(), p.r()),
            mul255(m.g(), p.g()),
            mul255(m.b(), p.b()),
        );
    }
}

/// Scales every element's alpha by the matching 8-bit coverage value.
///
/// Coverage 255 leaves the element untouched; coverage 0 makes it fully
/// transparent. Color lanes are not changed.
pub fn attenuate(buf: &mut [Argb], cover: &[u8]) {
    assert_eq!(buf.len(), cover.len(), "coverage length must match scanline");
    for (p, &c) in buf.iter_mut().zip(cover) {
        *p = p.with_alpha(mul8(c, p.a()));
    }
}

/// Exact-division counterpart of [`attenuate`].
pub fn attenuate_exact(buf: &mut [Argb], cover: &[u8]) {
    assert_eq!(buf.len(), cover.len(), "coverage length must match scanline");
    for (p, &c) in buf.iter_mut().zip(cover) {
        *p = p.with_alpha(mul255(c, p.a()));
    }
}

/// Premultiplied source-over of one scanline onto another.
///
/// Both scanlines hold premultiplied pixels: `dst = src + (1 - src.a) * dst`
/// in every lane. A transparent source element leaves the destination
/// untouched; an opaque one replaces it verbatim.
pub fn over(dst: &mut [Argb], src: &[Argb]) {
    assert_eq!(dst.len(), src.len(), "source length must match scanline");
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = over_pixel(s, *d);
    }
}

/// [`over`] with a per-element coverage buffer.
///
/// Coverage scales the source element (all four lanes, keeping it
/// premultiplied) before the over step.
pub fn over_cover(dst: &mut [Argb], src: &[Argb], cover: &[u8]) {
    assert_eq!(dst.len(), src.len(), "source length must match scanline");
    assert_eq!(dst.len(), cover.len(), "coverage length must match scanline");
    for ((d, &s), &c) in dst.iter_mut().zip(src).zip(cover) {
        let s = scale_premul(s, c);
        *d = over_pixel(s, *d);
    }
}

/// Exact-division counterpart of [`over`].
pub fn over_exact(dst: &mut [Argb], src: &[Argb]) {
    assert_eq!(dst.len(), src.len(), "source length must match scanline");
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = over_pixel_exact(s, *d);
    }
}

/// Applies one lane permutation to every element.
pub fn shuffle(buf: &mut [Argb], sel: LaneSelect) {
    for p in buf.iter_mut() {
        *p = p.shuffle(sel);
    }
}

/// Premultiplied source-over of a single pixel.
#[inline]
pub fn over_pixel(s: Argb, d: Argb) -> Argb {
    if s.is_transparent() {
        return d;
    }
    if s.is_opaque() {
        return s;
    }
    let na = 255 - s.a();
    Argb::new(
        s.a() + mul8(na, d.a()),
        s.r() + mul8(na, d.r()),
        s.g() + mul8(na, d.g()),
        s.b() + mul8(na, d.b()),
    )
}

/// Exact-division counterpart of [`over_pixel`].
#[inline]
pub fn over_pixel_exact(s: Argb, d: Argb) -> Argb {
    if s.is_transparent() {
        return d;
    }
    if s.is_opaque() {
        return s;
    }
    let na = 255 - s.a();
    Argb::new(
        s.a().saturating_add(mul255(na, d.a())),
        s.r().saturating_add(mul255(na, d.r())),
        s.g().saturating_add(mul255(na, d.g())),
        s.b().saturating_add(mul255(na, d.b())),
    )
}

/// Scales all four lanes of a premultiplied pixel by an 8-bit factor.
#[inline]
pub fn scale_premul(p: Argb, f: u8) -> Argb {
    match f {
        255 => p,
        0 => Argb::TRANSPARENT,
        _ => Argb::new(
            mul8(f, p.a()),
            mul8(f, p.r()),
            mul8(f, p.g()),
            mul8(f, p.b()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse() {
        let mut buf = [Argb(1), Argb(2), Argb(3)];
        reverse(&mut buf);
        assert_eq!(buf, [Argb(3), Argb(2), Argb(1)]);
    }

    #[test]
    fn test_tint_white_is_identity() {
        let orig = [Argb::new(10, 20, 30, 40), Argb::new(250, 240, 230, 220)];
        let mut buf = orig;
        tint(&mut buf, Argb::WHITE);
        assert_eq!(buf, orig);
        let mut buf = orig;
        tint_exact(&mut buf, Argb::WHITE);
        assert_eq!(buf, orig);
    }

    #[test]
    fn test_tint_black_zeroes_color() {
        let mut buf = [Argb::new(255, 200, 100, 50)];
        tint(&mut buf, Argb::BLACK);
        assert_eq!(buf[0], Argb::new(255, 0, 0, 0));
    }

    #[test]
    fn test_mask_buf_white_is_identity() {
        let orig = [Argb::new(1, 2, 3, 4); 3];
        let mut buf = orig;
        mask_buf(&mut buf, &[Argb::WHITE; 3]);
        assert_eq!(buf, orig);
    }

    #[test]
    fn test_attenuate() {
        let mut buf = [Argb::new(200, 10, 20, 30); 3];
        attenuate(&mut buf, &[255, 128, 0]);
        assert_eq!(buf[0].a(), 200);
        assert!(buf[1].a() < 200 && buf[1].a() > 0);
        assert_eq!(buf[2].a(), 0);
        // Color lanes untouched.
        for p in &buf {
            assert_eq!((p.r(), p.g(), p.b()), (10, 20, 30));
        }
    }

    #[test]
    fn test_over_transparent_source_is_noop() {
        let dst_orig = [Argb::new(200, 1, 2, 3); 4];
        let mut dst = dst_orig;
        over(&mut dst, &[Argb::TRANSPARENT; 4]);
        assert_eq!(dst, dst_orig);
    }

    #[test]
    fn test_over_opaque_source_replaces() {
        let src = [Argb::from_rgb(9, 8, 7); 2];
        let mut dst = [Argb::from_rgb(1, 2, 3); 2];
        over(&mut dst, &src);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_over_accumulates_alpha() {
        // Two 50% premultiplied layers leave less than 25% transparency.
        let half = Argb::new(128, 64, 64, 64);
        let mut dst = [Argb::TRANSPARENT];
        over(&mut dst, &[half]);
        over(&mut dst, &[half]);
        assert!(dst[0].a() > 128 + 60);
    }

    #[test]
    fn test_over_cover_zero_is_noop() {
        let dst_orig = [Argb::new(77, 5, 6, 7); 2];
        let mut dst = dst_orig;
        over_cover(&mut dst, &[Argb::WHITE; 2], &[0, 0]);
        assert_eq!(dst, dst_orig);
    }

    #[test]
    fn test_over_cover_full_matches_over() {
        let src = [Argb::new(100, 50, 40, 30); 3];
        let mut a = [Argb::new(200, 90, 80, 70); 3];
        let mut b = a;
        over(&mut a, &src);
        over_cover(&mut b, &src, &[255; 3]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_buffer() {
        use crate::argb::LANES_ABGR;
        let mut buf = [Argb::new(1, 2, 3, 4); 2];
        shuffle(&mut buf, LANES_ABGR);
        assert_eq!(buf[0], Argb::new(1, 4, 3, 2));
    }
}
