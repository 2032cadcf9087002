//! Lazily built 8-bit multiply and un-premultiply tables.
//!
//! The engine's alpha math is table-driven: a 256x256 fast-multiply table
//! (`(a+1)*b >> 8`) and a 256x256 un-premultiply table (`b*255 / a`,
//! saturated). Both are built once on first use and shared for the life of
//! the process.
//!
//! First-use initialization is thread safe (`once_cell::sync::Lazy`);
//! hosts that want the build cost at a deterministic point call [`init`]
//! before spawning workers.
//!
//! # Used By
//!
//! - [`crate::algebra`] - tint, mask, coverage, over
//! - `pxl-ops` - span blending and the composite operator table

use once_cell::sync::Lazy;

/// 64 KiB fast-multiply table: `MUL[a][b] = (a+1)*b >> 8`.
///
/// Exact at both endpoints: scaling by 0 yields 0, scaling by 255 yields
/// `b` unchanged. Mid-range entries may sit one below the exact rounded
/// product.
static MUL: Lazy<Box<[[u8; 256]; 256]>> = Lazy::new(|| {
    let mut t = Box::new([[0u8; 256]; 256]);
    for a in 0..256usize {
        for b in 0..256usize {
            t[a][b] = (((a + 1) * b) >> 8) as u8;
        }
    }
    t
});

/// 64 KiB un-premultiply table: `UNMUL[a][v] = min(255, v*255 / a)`,
/// with `UNMUL[0][v] = 0`.
static UNMUL: Lazy<Box<[[u8; 256]; 256]>> = Lazy::new(|| {
    let mut t = Box::new([[0u8; 256]; 256]);
    for a in 1..256usize {
        for v in 0..256usize {
            let s = (v * 255 + a / 2) / a;
            t[a][v] = if s > 255 { 255 } else { s as u8 };
        }
    }
    t
});

/// Fast channel scale: `(a+1)*b >> 8`.
///
/// The engine-wide default for alpha math. See [`mul255`] for the exact
/// form.
#[inline]
pub fn mul8(a: u8, b: u8) -> u8 {
    MUL[a as usize][b as usize]
}

/// Exact channel scale: `a*b / 255`, rounded to nearest.
#[inline]
pub const fn mul255(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

/// Un-premultiplies a channel: straight value of `v` given alpha `a`,
/// saturated at 255. Zero alpha yields zero.
#[inline]
pub fn unmul8(a: u8, v: u8) -> u8 {
    UNMUL[a as usize][v as usize]
}

/// Exact un-premultiply, identical contract to [`unmul8`] but computed
/// directly instead of through the table.
#[inline]
pub const fn unmul255(a: u8, v: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let s = (v as u32 * 255 + a as u32 / 2) / a as u32;
    if s > 255 { 255 } else { s as u8 }
}

/// Linear interpolation `d + (s - d) * a`, table-driven.
///
/// Exact at both endpoints: `a = 0` yields `d`, `a = 255` yields `s`.
/// The sum of the two partial products never exceeds 255.
#[inline]
pub fn lerp8(d: u8, s: u8, a: u8) -> u8 {
    mul8(a, s) + mul8(255 - a, d)
}

/// Exact-division counterpart of [`lerp8`].
#[inline]
pub const fn lerp255(d: u8, s: u8, a: u8) -> u8 {
    let x = a as u32 * s as u32 + (255 - a) as u32 * d as u32;
    ((x + 127) / 255) as u8
}

/// Saturating channel add.
#[inline]
pub const fn add8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Forces construction of every lazy table.
///
/// Single-threaded hosts never need this; multithreaded hosts call it once
/// at startup to pin the build cost.
pub fn init() {
    Lazy::force(&MUL);
    Lazy::force(&UNMUL);
}
