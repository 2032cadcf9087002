//! Behavioral contracts of the engine, exercised end to end.

use pxl_core::{clip_blit, Argb, ClipRect};
use pxl_formats::{
    fetch_cell, store_cell, Access, FormatClass, FormatCtx, PixelFormat, ALL_FORMATS,
};
use pxl_ops::{
    blend, composite, convert, fill_rect, apply_pixel, BlitFlags, CompositeOp, DrawMode, Procs,
    Surface, SurfaceMut,
};
use pxl_palette::{ColorIndex, Palette};

/// Every representable cell for depths up to 16 bits, a dense sample
/// above that.
fn cells_for(bits: u8) -> Vec<u32> {
    if bits <= 16 {
        (0..1u32 << bits).collect()
    } else {
        let mask = ((1u64 << bits) - 1) as u32;
        (0..=u16::MAX)
            .map(|v| {
                let v = v as u32;
                (v | v << 16) & mask
            })
            .collect()
    }
}

#[test]
fn round_trip_is_idempotent_for_every_format() {
    // store(fetch(store(fetch(x)))) == store(fetch(x)) for all x, every
    // format; the first conversion may quantize, the second must not.
    let idx = ColorIndex::build(&Palette::gray_ramp());
    let ctx = FormatCtx::with_index(&idx);
    for format in ALL_FORMATS {
        let desc = format.desc();
        for cell in cells_for(desc.bits) {
            let once = store_cell(desc, fetch_cell(desc, cell, &ctx), &ctx);
            let twice = store_cell(desc, fetch_cell(desc, once, &ctx), &ctx);
            assert_eq!(once, twice, "{format} cell {cell:#x}");
        }
    }
}

#[test]
fn opaque_formats_round_trip_bit_exact() {
    let ctx = FormatCtx::none();
    for format in ALL_FORMATS {
        let desc = format.desc();
        if desc.has_alpha() || matches!(desc.class, FormatClass::Indexed) {
            continue;
        }
        let defined = desc.r.mask | desc.g.mask | desc.b.mask;
        for cell in cells_for(desc.bits) {
            let cell = cell & defined;
            let back = store_cell(desc, fetch_cell(desc, cell, &ctx), &ctx);
            assert_eq!(back, cell, "{format} cell {cell:#x}");
        }
    }
}

#[test]
fn channel_loss_is_symmetric() {
    // Expanding a narrowed channel and re-narrowing reproduces it, for
    // every channel of every format.
    for format in ALL_FORMATS {
        let desc = format.desc();
        for ch in [desc.a, desc.r, desc.g, desc.b] {
            if !ch.is_present() {
                continue;
            }
            for v in 0..(1u32 << ch.width()) {
                let wide = ch.expand(ch.pack_raw(v));
                assert_eq!((wide >> ch.loss) as u32, v, "{format} width {}", ch.width());
            }
        }
    }
}

#[test]
fn compositing_identities() {
    let samples: Vec<(Argb, Argb)> = (0..64u32)
        .map(|i| {
            (
                Argb::new((i * 4) as u8, (i * 7) as u8, (255 - i) as u8, (i * 13) as u8),
                Argb::new((255 - i * 4) as u8, i as u8, (i * 3) as u8, (i * 11) as u8),
            )
        })
        .collect();
    for &(s, d) in &samples {
        assert_eq!(apply_pixel(CompositeOp::Copy, s, d), s);
        assert_eq!(apply_pixel(CompositeOp::Dest, s, d), d);
        assert_eq!(apply_pixel(CompositeOp::Clear, s, d), Argb::TRANSPARENT);
    }
}

#[test]
fn artistic_operators_skip_transparent_sources() {
    let artistic = [
        CompositeOp::PremulBlend,
        CompositeOp::Average,
        CompositeOp::Tint,
        CompositeOp::Diff,
        CompositeOp::Darken,
        CompositeOp::Lighten,
        CompositeOp::Screen,
        CompositeOp::Overlay,
    ];
    for op in artistic {
        for d_val in (0..=u16::MAX).step_by(997) {
            let d = Argb(d_val as u32 | (d_val as u32) << 16);
            for s_color in [0u32, 0x00ff_ffff, 0x0012_3456] {
                assert_eq!(
                    apply_pixel(op, Argb(s_color), d),
                    d,
                    "{op} src {s_color:#x}"
                );
            }
        }
    }
}

#[test]
fn clip_clamps_at_destination_far_edge() {
    let r = clip_blit(
        ClipRect::from_size(100, 100),
        ClipRect::from_size(50, 50),
        90,
        90,
        ClipRect::from_size(50, 50),
        false,
        false,
    )
    .unwrap();
    assert_eq!(r.dst_x, 90);
    assert_eq!(r.dst_y, 90);
    assert_eq!(r.src_x, 0);
    assert_eq!(r.src_y, 0);
    assert_eq!(r.width, 10);
    assert_eq!(r.height, 10);
}

#[test]
fn flipped_clip_consumes_opposite_source_edge() {
    let r = clip_blit(
        ClipRect::from_size(100, 100),
        ClipRect::from_size(50, 50),
        90,
        90,
        ClipRect::from_size(50, 50),
        true,
        false,
    )
    .unwrap();
    assert_eq!(r.src_x, 40);
    assert_eq!(r.src_y, 0);
    assert_eq!(r.width, 10);
    assert_eq!(r.height, 10);
    assert_eq!(r.dst_x, 90);
}

#[test]
fn colorkey_blit_skips_key_cells() {
    let procs = Procs::new();
    let src_px = [5u8, 7, 5, 9];
    let mut dst_px = [1u8; 4];
    let src = Surface::new(&src_px, 4, 4, 1, PixelFormat::C8).unwrap();
    let mut dst = SurfaceMut::new(&mut dst_px, 4, 4, 1, PixelFormat::C8).unwrap();
    let mut scratch = [Argb::TRANSPARENT; 4];
    convert(
        &procs,
        &mut dst,
        0,
        0,
        &src,
        ClipRect::from_size(4, 1),
        5,
        BlitFlags::COLORKEY,
        Some(&mut scratch),
    );
    assert_eq!(dst_px, [1, 7, 1, 9]);
}

#[test]
fn palette_exact_entry_wins() {
    let pal = Palette::new(&[
        Argb::from_rgb(10, 20, 31),  // closer in blue alone
        Argb::from_rgb(10, 21, 30),  // closer in green alone
        Argb::from_rgb(10, 20, 30),  // exact
        Argb::from_rgb(11, 20, 30),
    ])
    .unwrap();
    let (i, d) = pal.nearest_with_distance(Argb::from_rgb(10, 20, 30));
    assert_eq!(i, 2);
    assert_eq!(d, 0);
}

#[test]
fn two_phase_sizing_contract() {
    let procs = Procs::new();
    let src_px = [0u8; 32];
    let mut dst_px = [0u8; 64];
    let src = Surface::new(&src_px, 32, 16, 1, PixelFormat::Rgb565).unwrap();
    let mut dst = SurfaceMut::new(&mut dst_px, 64, 16, 1, PixelFormat::Argb8888).unwrap();
    let rect = ClipRect::from_size(16, 1);

    for entry in ["blend", "convert", "composite"] {
        let bytes = match entry {
            "blend" => blend(
                &procs, &mut dst, 0, 0, &src, rect, DrawMode::Blend, Argb::WHITE,
                BlitFlags::empty(), None,
            ),
            "convert" => convert(
                &procs, &mut dst, 0, 0, &src, rect, 0, BlitFlags::empty(), None,
            ),
            _ => composite(
                &procs, &mut dst, 0, 0, &src, rect, CompositeOp::SrcOver,
                BlitFlags::empty(), None,
            ),
        };
        assert!(bytes > 0, "{entry}");
        assert_eq!(bytes % 4, 0, "{entry}");

        // Exactly the queried size must draw without faulting.
        let mut scratch = vec![Argb::TRANSPARENT; bytes / 4];
        let again = match entry {
            "blend" => blend(
                &procs, &mut dst, 0, 0, &src, rect, DrawMode::Blend, Argb::WHITE,
                BlitFlags::empty(), Some(&mut scratch),
            ),
            "convert" => convert(
                &procs, &mut dst, 0, 0, &src, rect, 0, BlitFlags::empty(),
                Some(&mut scratch),
            ),
            _ => composite(
                &procs, &mut dst, 0, 0, &src, rect, CompositeOp::SrcOver,
                BlitFlags::empty(), Some(&mut scratch),
            ),
        };
        assert_eq!(again, bytes, "{entry}");
    }
}

#[test]
fn convert_round_trips_between_catalog_families() {
    // 8888 -> 565 -> 8888 keeps every channel within its quantization
    // error, and a second pass is exact.
    let procs = Procs::new();
    let w = 64usize;
    let orig: Vec<Argb> = (0..w as u32)
        .map(|i| Argb::from_rgb((i * 4) as u8, (255 - i * 3) as u8, (i * 7) as u8))
        .collect();
    let src_px: Vec<u8> = orig.iter().flat_map(|p| p.0.to_ne_bytes()).collect();
    let mut mid_px = vec![0u8; w * 2];
    let mut back_px = vec![0u8; w * 4];
    let mut scratch = vec![Argb::TRANSPARENT; w];
    let rect = ClipRect::from_size(w as i32, 1);

    let src = Surface::new(&src_px, w * 4, w, 1, PixelFormat::Argb8888).unwrap();
    let mut mid = SurfaceMut::new(&mut mid_px, w * 2, w, 1, PixelFormat::Rgb565).unwrap();
    convert(&procs, &mut mid, 0, 0, &src, rect, 0, BlitFlags::empty(), Some(&mut scratch));

    let mid = Surface::new(&mid_px, w * 2, w, 1, PixelFormat::Rgb565).unwrap();
    let mut back = SurfaceMut::new(&mut back_px, w * 4, w, 1, PixelFormat::Argb8888).unwrap();
    convert(&procs, &mut back, 0, 0, &mid, rect, 0, BlitFlags::empty(), Some(&mut scratch));

    for (i, p) in orig.iter().enumerate() {
        let got = Argb(u32::from_ne_bytes(back_px[i * 4..i * 4 + 4].try_into().unwrap()));
        assert!((got.r() as i32 - p.r() as i32).abs() <= 8, "pixel {i}");
        assert!((got.g() as i32 - p.g() as i32).abs() <= 4, "pixel {i}");
        assert!((got.b() as i32 - p.b() as i32).abs() <= 8, "pixel {i}");
        assert_eq!(got.a(), 255);
    }
}

#[test]
fn indexed_conversion_through_explicit_palette() {
    let procs = Procs::new();
    let pal = Palette::new(&[
        Argb::from_rgb(0, 0, 0),
        Argb::from_rgb(255, 0, 0),
        Argb::from_rgb(0, 255, 0),
        Argb::from_rgb(0, 0, 255),
    ])
    .unwrap();
    let idx = ColorIndex::build(&pal);

    let src_px = [0u8, 1, 2, 3];
    let mut dst_px = [0u8; 16];
    let src = Surface::new(&src_px, 4, 4, 1, PixelFormat::C8)
        .unwrap()
        .with_index(&idx);
    let mut dst = SurfaceMut::new(&mut dst_px, 16, 4, 1, PixelFormat::Argb8888).unwrap();
    let mut scratch = [Argb::TRANSPARENT; 4];
    convert(
        &procs,
        &mut dst,
        0,
        0,
        &src,
        ClipRect::from_size(4, 1),
        0,
        BlitFlags::empty(),
        Some(&mut scratch),
    );
    for (i, want) in pal.colors().iter().enumerate() {
        let got = Argb(u32::from_ne_bytes(dst_px[i * 4..i * 4 + 4].try_into().unwrap()));
        assert_eq!(got, *want, "entry {i}");
    }
}

#[test]
fn mirrored_convert_matches_manual_reverse() {
    let procs = Procs::new();
    let w = 8usize;
    let src_vals: Vec<u8> = (10..10 + w as u8).collect();
    let mut plain = vec![0u8; w];
    let mut flipped = vec![0u8; w];
    let mut scratch = vec![Argb::TRANSPARENT; w];
    let rect = ClipRect::from_size(w as i32, 1);
    let src = Surface::new(&src_vals, w, w, 1, PixelFormat::Gray8).unwrap();

    let mut dst = SurfaceMut::new(&mut plain, w, w, 1, PixelFormat::Gray8).unwrap();
    convert(&procs, &mut dst, 0, 0, &src, rect, 0, BlitFlags::empty(), Some(&mut scratch));
    let mut dst = SurfaceMut::new(&mut flipped, w, w, 1, PixelFormat::Gray8).unwrap();
    convert(&procs, &mut dst, 0, 0, &src, rect, 0, BlitFlags::FLIP_X, Some(&mut scratch));

    let mut reversed = plain.clone();
    reversed.reverse();
    assert_eq!(flipped, reversed);
}

#[test]
fn fill_and_blend_agree_on_solid_color() {
    // Filling with an opaque color and blending a solid span of it land
    // on identical bytes.
    let procs = Procs::new();
    let w = 6usize;
    let color = Argb::from_rgb(200, 150, 100);

    let mut filled = vec![0u8; w * 2];
    let mut dst = SurfaceMut::new(&mut filled, w * 2, w, 1, PixelFormat::Rgb565).unwrap();
    fill_rect(
        &procs,
        &mut dst,
        ClipRect::from_size(w as i32, 1),
        color,
        DrawMode::Blend,
        BlitFlags::empty(),
    );

    let src_vals = vec![color; w];
    let src_px: Vec<u8> = src_vals.iter().flat_map(|p| p.0.to_ne_bytes()).collect();
    let src = Surface::new(&src_px, w * 4, w, 1, PixelFormat::Argb8888).unwrap();
    let mut blended = vec![0u8; w * 2];
    let mut dst = SurfaceMut::new(&mut blended, w * 2, w, 1, PixelFormat::Rgb565).unwrap();
    let mut scratch = vec![Argb::TRANSPARENT; w];
    blend(
        &procs,
        &mut dst,
        0,
        0,
        &src,
        ClipRect::from_size(w as i32, 1),
        DrawMode::Blend,
        Argb::WHITE,
        BlitFlags::empty(),
        Some(&mut scratch),
    );

    assert_eq!(filled, blended);
}

#[test]
fn accurate_mode_exists_for_every_format() {
    // The accurate fetch path runs for the whole catalog without a
    // palette, except the indexed class which requires one.
    let idx = ColorIndex::build(&Palette::gray_ramp());
    for format in ALL_FORMATS {
        let desc = format.desc();
        let ctx = if matches!(desc.class, FormatClass::Indexed) {
            FormatCtx::with_index(&idx)
        } else {
            FormatCtx::none()
        };
        let row = vec![0xa5u8; 64];
        let mut out = [Argb::TRANSPARENT; 4];
        pxl_formats::fetch_row(format, Access::Accurate, &row, 0, &mut out, &ctx);
        pxl_formats::fetch_row(format, Access::Fast, &row, 0, &mut out, &ctx);
    }
}
