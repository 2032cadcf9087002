//! Bit-exact agreement between the specialized paths and the generic
//! reference they shadow.

use pxl_core::{Argb, ClipRect};
use pxl_formats::{
    fetch_row, fetch_row_desc, Access, FormatClass, FormatCtx, FreeFormat, PixelFormat,
    ALL_FORMATS,
};
use pxl_ops::{convert, BlitFlags, Procs, Surface, SurfaceMut};

fn fast_eligible(format: PixelFormat) -> bool {
    let desc = format.desc();
    (desc.bits == 8 || desc.bits == 16)
        && !desc.has_alpha()
        && !matches!(desc.class, FormatClass::Indexed)
}

#[test]
fn fast_fetch_agrees_with_accurate_exhaustively() {
    // Every cell value of every table-driven format decodes identically
    // through the table and through the mask arithmetic.
    let ctx = FormatCtx::none();
    for format in ALL_FORMATS.into_iter().filter(|f| fast_eligible(*f)) {
        match format.desc().bits {
            8 => {
                let row: Vec<u8> = (0..=255).collect();
                let mut fast = vec![Argb::TRANSPARENT; 256];
                let mut accurate = fast.clone();
                fetch_row(format, Access::Fast, &row, 0, &mut fast, &ctx);
                fetch_row(format, Access::Accurate, &row, 0, &mut accurate, &ctx);
                assert_eq!(fast, accurate, "{format}");
            }
            16 => {
                let row: Vec<u8> = (0..=u16::MAX).flat_map(|c| c.to_ne_bytes()).collect();
                let mut fast = vec![Argb::TRANSPARENT; 1 << 16];
                let mut accurate = fast.clone();
                fetch_row(format, Access::Fast, &row, 0, &mut fast, &ctx);
                fetch_row(format, Access::Accurate, &row, 0, &mut accurate, &ctx);
                for cell in 0..1usize << 16 {
                    assert_eq!(fast[cell], accurate[cell], "{format} cell {cell:#x}");
                }
            }
            _ => unreachable!(),
        }
    }
}

#[test]
fn alpha_formats_share_the_accurate_path() {
    // Formats outside the table set give identical results in both
    // modes because Fast falls back.
    let ctx = FormatCtx::none();
    for format in ALL_FORMATS.into_iter().filter(|f| !fast_eligible(*f)) {
        if matches!(format.desc().class, FormatClass::Indexed) {
            continue;
        }
        let row = vec![0x5au8; 32];
        let n = 32 * 8 / format.desc().bits as usize;
        let mut fast = vec![Argb::TRANSPARENT; n.min(16)];
        let mut accurate = fast.clone();
        fetch_row(format, Access::Fast, &row, 0, &mut fast, &ctx);
        fetch_row(format, Access::Accurate, &row, 0, &mut accurate, &ctx);
        assert_eq!(fast, accurate, "{format}");
    }
}

#[test]
fn free_format_alias_matches_builtin() {
    // A free 5-6-5 descriptor decodes exactly like the catalog entry.
    let free = FreeFormat::new(16, 0, 0xf800, 0x07e0, 0x001f).unwrap();
    assert_eq!(free.alias(), Some(PixelFormat::Rgb565));
    let ctx = FormatCtx::none();
    let row: Vec<u8> = (0..=u16::MAX)
        .step_by(119)
        .flat_map(|c| c.to_ne_bytes())
        .collect();
    let n = row.len() / 2;
    let mut via_desc = vec![Argb::TRANSPARENT; n];
    let mut via_builtin = via_desc.clone();
    fetch_row_desc(free.desc(), &row, 0, &mut via_desc, &ctx);
    fetch_row(PixelFormat::Rgb565, Access::Fast, &row, 0, &mut via_builtin, &ctx);
    assert_eq!(via_desc, via_builtin);
}

#[test]
fn unaliased_free_format_converts_generically() {
    // A 4-4-2 layout exists only as a free format; converting out of it
    // must still work through the descriptor path.
    let free = FreeFormat::new(16, 0, 0x03c0, 0x003c, 0x0003).unwrap();
    assert_eq!(free.alias(), None);

    let procs = Procs::new();
    // Full red, full green, full blue in 4-4-2.
    let cells = [0x03c0u16, 0x003c, 0x0003];
    let src_px: Vec<u8> = cells.iter().flat_map(|c| c.to_ne_bytes()).collect();
    let mut dst_px = [0u8; 12];
    let src = Surface::new(&src_px, 6, 3, 1, &free).unwrap();
    let mut dst = SurfaceMut::new(&mut dst_px, 12, 3, 1, PixelFormat::Argb8888).unwrap();
    let mut scratch = [Argb::TRANSPARENT; 3];
    convert(
        &procs,
        &mut dst,
        0,
        0,
        &src,
        ClipRect::from_size(3, 1),
        0,
        BlitFlags::empty(),
        Some(&mut scratch),
    );
    let out: Vec<Argb> = dst_px
        .chunks_exact(4)
        .map(|c| Argb(u32::from_ne_bytes(c.try_into().unwrap())))
        .collect();
    assert_eq!(out[0], Argb::from_rgb(255, 0, 0));
    assert_eq!(out[1], Argb::from_rgb(0, 255, 0));
    assert_eq!(out[2], Argb::from_rgb(0, 0, 255));
}

#[test]
fn equal_free_formats_take_the_raw_blit_path() {
    // Two identical unaliased descriptors copy bytes verbatim, so cells
    // that mean nothing to the channel masks still survive.
    let a = FreeFormat::new(16, 0, 0x03c0, 0x003c, 0x0003).unwrap();
    let b = FreeFormat::new(16, 0, 0x03c0, 0x003c, 0x0003).unwrap();
    let procs = Procs::new();
    let src_px: Vec<u8> = [0xfadeu16, 0xbeef].iter().flat_map(|c| c.to_ne_bytes()).collect();
    let mut dst_px = [0u8; 4];
    let src = Surface::new(&src_px, 4, 2, 1, &a).unwrap();
    let mut dst = SurfaceMut::new(&mut dst_px, 4, 2, 1, &b).unwrap();
    let mut scratch = [Argb::TRANSPARENT; 2];
    convert(
        &procs,
        &mut dst,
        0,
        0,
        &src,
        ClipRect::from_size(2, 1),
        0,
        BlitFlags::empty(),
        Some(&mut scratch),
    );
    assert_eq!(dst_px.as_slice(), src_px.as_slice());
}
