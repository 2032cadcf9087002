//! Fetch and store: scanline transcoding between native layouts and the
//! canonical representation.
//!
//! For every format there are three primitive procedures: *fetch* (native
//! row, pixel offset, width -> canonical pixels), *store* (the inverse)
//! and *fetch one pixel*. Two access modes exist:
//!
//! - [`Access::Accurate`] always computes through the descriptor's
//!   masks, shifts and loss tables. This is the reference path; it is
//!   correct for every format.
//! - [`Access::Fast`] substitutes a precomputed 256-entry (8-bit
//!   formats) or 512-entry (16-bit formats, one bank per byte half)
//!   expansion table for formats without per-pixel variable alpha.
//!   The tables are built *from* the accurate path, so agreement is
//!   bit-exact by construction; formats without a table fall back to
//!   the accurate loop.
//!
//! Indexed formats transcode through the [`ColorIndex`] supplied in the
//! [`FormatCtx`]; calling them without one is a caller bug and panics.
//! All other classes ignore the context.
//!
//! Cell access is native-endian for 16/32-bit cells, low-byte-first for
//! 24-bit cells, and MSB-first within a byte for the 1/4-bit depths.

use once_cell::sync::Lazy;
use pxl_core::tables::{mul255, unmul255};
use pxl_core::Argb;
use pxl_palette::ColorIndex;

use crate::catalog::{PixelFormat, ALL_FORMATS, FORMAT_COUNT};
use crate::desc::{FormatClass, FormatDesc};

/// Which fetch implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    /// Mask/shift arithmetic; the reference path, valid for every format.
    #[default]
    Accurate,
    /// Expansion-table path where one exists, accurate otherwise.
    Fast,
}

/// Per-call context for the transcoding procedures.
///
/// Only indexed formats read it; everything else ignores it. Palettes are
/// always passed here explicitly, there is no process default.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatCtx<'a> {
    /// Color cache for indexed sources/destinations.
    pub index: Option<&'a ColorIndex>,
}

impl<'a> FormatCtx<'a> {
    /// A context with no palette attached.
    #[inline]
    pub const fn none() -> Self {
        Self { index: None }
    }

    /// A context carrying the given color cache.
    #[inline]
    pub const fn with_index(index: &'a ColorIndex) -> Self {
        Self { index: Some(index) }
    }

    #[inline]
    fn require_index(&self) -> &'a ColorIndex {
        self.index
            .expect("indexed pixel formats require a ColorIndex in the FormatCtx")
    }
}

// ---------------------------------------------------------------------------
// Raw cell access
// ---------------------------------------------------------------------------

/// Reads the native cell of pixel `x` in a row of the given depth.
#[inline]
pub fn read_cell(bits: u8, row: &[u8], x: usize) -> u32 {
    match bits {
        32 => {
            let o = x * 4;
            u32::from_ne_bytes(row[o..o + 4].try_into().unwrap())
        }
        24 => {
            let o = x * 3;
            row[o] as u32 | (row[o + 1] as u32) << 8 | (row[o + 2] as u32) << 16
        }
        16 => {
            let o = x * 2;
            u16::from_ne_bytes(row[o..o + 2].try_into().unwrap()) as u32
        }
        8 => row[x] as u32,
        4 => {
            let b = row[x / 2];
            (if x & 1 == 0 { b >> 4 } else { b & 0x0f }) as u32
        }
        1 => ((row[x / 8] >> (7 - (x & 7))) & 1) as u32,
        bits => unreachable!("unsupported depth {bits}"),
    }
}

/// Writes the native cell of pixel `x` in a row. Sub-byte depths
/// read-modify-write their byte; whole-cell depths overwrite.
#[inline]
pub fn write_cell(bits: u8, row: &mut [u8], x: usize, cell: u32) {
    match bits {
        32 => {
            let o = x * 4;
            row[o..o + 4].copy_from_slice(&cell.to_ne_bytes());
        }
        24 => {
            let o = x * 3;
            row[o] = cell as u8;
            row[o + 1] = (cell >> 8) as u8;
            row[o + 2] = (cell >> 16) as u8;
        }
        16 => {
            let o = x * 2;
            row[o..o + 2].copy_from_slice(&(cell as u16).to_ne_bytes());
        }
        8 => row[x] = cell as u8,
        4 => {
            let b = &mut row[x / 2];
            if x & 1 == 0 {
                *b = (*b & 0x0f) | ((cell as u8) << 4);
            } else {
                *b = (*b & 0xf0) | (cell as u8 & 0x0f);
            }
        }
        1 => {
            let bit = 7 - (x & 7) as u8;
            let b = &mut row[x / 8];
            *b = (*b & !(1 << bit)) | (((cell as u8) & 1) << bit);
        }
        bits => unreachable!("unsupported depth {bits}"),
    }
}

// ---------------------------------------------------------------------------
// Single-cell transcoding (the accurate reference)
// ---------------------------------------------------------------------------

/// Decodes one native cell to a canonical pixel.
pub fn fetch_cell(desc: &FormatDesc, cell: u32, ctx: &FormatCtx<'_>) -> Argb {
    match desc.class {
        FormatClass::Argb => Argb::new(
            desc.a.expand(cell),
            desc.r.expand(cell),
            desc.g.expand(cell),
            desc.b.expand(cell),
        ),
        FormatClass::Rgb => Argb::new(
            0xff,
            desc.r.expand(cell),
            desc.g.expand(cell),
            desc.b.expand(cell),
        ),
        FormatClass::Gray => {
            let y = desc.g.expand(cell);
            let a = if desc.a.is_present() { desc.a.expand(cell) } else { 0xff };
            Argb::new(a, y, y, y)
        }
        FormatClass::Alpha => Argb::new(desc.a.expand(cell), 0, 0, 0),
        FormatClass::Indexed => {
            let index = ctx.require_index();
            index.color(desc.index_field().extract(cell) as u8)
        }
        FormatClass::Premultiplied => {
            let a = desc.a.expand(cell);
            Argb::new(
                a,
                unmul255(a, desc.r.expand(cell)),
                unmul255(a, desc.g.expand(cell)),
                unmul255(a, desc.b.expand(cell)),
            )
        }
    }
}

/// Encodes one canonical pixel to a native cell.
pub fn store_cell(desc: &FormatDesc, p: Argb, ctx: &FormatCtx<'_>) -> u32 {
    match desc.class {
        FormatClass::Argb => {
            desc.a.pack(p.a()) | desc.r.pack(p.r()) | desc.g.pack(p.g()) | desc.b.pack(p.b())
        }
        FormatClass::Rgb => desc.r.pack(p.r()) | desc.g.pack(p.g()) | desc.b.pack(p.b()),
        FormatClass::Gray => desc.a.pack(p.a()) | desc.g.pack(p.luma()),
        FormatClass::Alpha => desc.a.pack(p.a()),
        FormatClass::Indexed => {
            let index = ctx.require_index();
            desc.index_field().pack_raw(index.index_of(p) as u32)
        }
        FormatClass::Premultiplied => {
            let a = p.a();
            desc.a.pack(a)
                | desc.r.pack(mul255(a, p.r()))
                | desc.g.pack(mul255(a, p.g()))
                | desc.b.pack(mul255(a, p.b()))
        }
    }
}

// ---------------------------------------------------------------------------
// Expansion tables (the fast mode)
// ---------------------------------------------------------------------------

/// One bank of 256 entries for 8-bit formats, two banks (low byte, high
/// byte) for 16-bit formats. Entries hold partial canonical values whose
/// lanes OR together; bit replication spreads each source bit to fixed
/// output bits, so the per-byte parts combine exactly.
type FastTable = Box<[Argb]>;

static FAST: Lazy<[Option<FastTable>; FORMAT_COUNT]> = Lazy::new(|| {
    let ctx = FormatCtx::none();
    std::array::from_fn(|id| {
        let format = ALL_FORMATS[id];
        let desc = format.desc();
        if !fast_eligible(desc) {
            return None;
        }
        match desc.bits {
            8 => Some(
                (0..256u32)
                    .map(|cell| fetch_cell(desc, cell, &ctx))
                    .collect(),
            ),
            16 => {
                let mut t = Vec::with_capacity(512);
                t.extend((0..256u32).map(|lo| fetch_cell(desc, lo, &ctx)));
                t.extend((0..256u32).map(|hi| fetch_cell(desc, hi << 8, &ctx)));
                Some(t.into_boxed_slice())
            }
            _ => None,
        }
    })
});

/// Fast mode covers the byte-and-word formats whose alpha never varies
/// per pixel; everything else stays on the accurate path.
const fn fast_eligible(desc: &FormatDesc) -> bool {
    (desc.bits == 8 || desc.bits == 16)
        && !desc.has_alpha()
        && !matches!(desc.class, FormatClass::Indexed)
}

/// The expansion table for a format, if fast mode covers it.
#[inline]
fn fast_table(format: PixelFormat) -> Option<&'static [Argb]> {
    FAST[format.id() as usize].as_deref()
}

/// Forces construction of every expansion table.
pub fn init() {
    Lazy::force(&FAST);
}

// ---------------------------------------------------------------------------
// Scanline procedures
// ---------------------------------------------------------------------------

/// Fetches `out.len()` pixels starting at pixel `x` of a native row.
pub fn fetch_row(
    format: PixelFormat,
    mode: Access,
    row: &[u8],
    x: usize,
    out: &mut [Argb],
    ctx: &FormatCtx<'_>,
) {
    let desc = format.desc();
    if matches!(mode, Access::Fast) {
        if let Some(t) = fast_table(format) {
            match desc.bits {
                8 => {
                    for (i, o) in out.iter_mut().enumerate() {
                        *o = t[row[x + i] as usize];
                    }
                }
                16 => {
                    let (lo, hi) = t.split_at(256);
                    for (i, o) in out.iter_mut().enumerate() {
                        let off = (x + i) * 2;
                        let v = u16::from_ne_bytes(row[off..off + 2].try_into().unwrap());
                        *o = Argb(lo[(v & 0xff) as usize].0 | hi[(v >> 8) as usize].0);
                    }
                }
                _ => unreachable!("fast tables only exist for 8/16-bit formats"),
            }
            return;
        }
    }
    for (i, o) in out.iter_mut().enumerate() {
        *o = fetch_cell(desc, read_cell(desc.bits, row, x + i), ctx);
    }
}

/// Stores `src.len()` pixels starting at pixel `x` of a native row.
///
/// Storing narrows through the descriptor's loss values in both access
/// modes; there is no separate table path on this side.
pub fn store_row(
    format: PixelFormat,
    row: &mut [u8],
    x: usize,
    src: &[Argb],
    ctx: &FormatCtx<'_>,
) {
    let desc = format.desc();
    for (i, &p) in src.iter().enumerate() {
        write_cell(desc.bits, row, x + i, store_cell(desc, p, ctx));
    }
}

/// Descriptor-driven fetch, always accurate.
///
/// This is the path free formats without a catalog alias run on, and the
/// reference every specialized fetch is tested against.
pub fn fetch_row_desc(
    desc: &FormatDesc,
    row: &[u8],
    x: usize,
    out: &mut [Argb],
    ctx: &FormatCtx<'_>,
) {
    for (i, o) in out.iter_mut().enumerate() {
        *o = fetch_cell(desc, read_cell(desc.bits, row, x + i), ctx);
    }
}

/// Descriptor-driven store, the inverse of [`fetch_row_desc`].
pub fn store_row_desc(
    desc: &FormatDesc,
    row: &mut [u8],
    x: usize,
    src: &[Argb],
    ctx: &FormatCtx<'_>,
) {
    for (i, &p) in src.iter().enumerate() {
        write_cell(desc.bits, row, x + i, store_cell(desc, p, ctx));
    }
}

/// Fetches the single pixel at `x` of a native row.
#[inline]
pub fn fetch_pixel(format: PixelFormat, row: &[u8], x: usize, ctx: &FormatCtx<'_>) -> Argb {
    let desc = format.desc();
    fetch_cell(desc, read_cell(desc.bits, row, x), ctx)
}

/// Stores a single pixel at `x` of a native row.
#[inline]
pub fn store_pixel(format: PixelFormat, row: &mut [u8], x: usize, p: Argb, ctx: &FormatCtx<'_>) {
    let desc = format.desc();
    write_cell(desc.bits, row, x, store_cell(desc, p, ctx));
}
