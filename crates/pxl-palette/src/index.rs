//! The indexed-format color cache.
//!
//! Indexed pixel formats transcode through a [`ColorIndex`]: fetching an
//! index reads one of 256 canonical entries, and storing a color looks up
//! the nearest palette index in a 32,768-entry table keyed by the
//! quantized 15-bit RGB value. The cache is built once per palette with
//! the full nearest-color search and is read-only afterwards; changing
//! the palette means building a new cache.
//!
//! The one-time 32k build is the only palette operation heavy enough to
//! parallelize; with the default `parallel` feature it fans out over
//! rayon.

use pxl_core::Argb;

use crate::palette::Palette;

/// Number of quantized RGB keys (5 bits per channel).
const QUICK_SIZE: usize = 1 << 15;

/// Expands a 5-bit channel back to 8 bits by bit replication.
#[inline]
const fn expand5(v: u8) -> u8 {
    (v << 3) | (v >> 2)
}

/// Nearest-index cache for one palette.
///
/// # Example
///
/// ```rust
/// use pxl_core::Argb;
/// use pxl_palette::{ColorIndex, Palette};
///
/// let pal = Palette::new(&[Argb::from_rgb(0, 0, 0), Argb::from_rgb(255, 0, 0)]).unwrap();
/// let idx = ColorIndex::build(&pal);
/// assert_eq!(idx.index_of(Argb::from_rgb(250, 10, 10)), 1);
/// assert_eq!(idx.color(1), Argb::from_rgb(255, 0, 0));
/// ```
#[derive(Debug, Clone)]
pub struct ColorIndex {
    entries: Box<[Argb; 256]>,
    quick: Box<[u8; QUICK_SIZE]>,
    len: usize,
}

impl ColorIndex {
    /// Builds the cache for `palette`: 256 canonical entries (padded with
    /// opaque black past the palette's end) and the quantized
    /// nearest-index table.
    pub fn build(palette: &Palette) -> Self {
        let mut entries = Box::new([Argb::BLACK; 256]);
        for (e, &c) in entries.iter_mut().zip(palette.colors()) {
            *e = c;
        }

        let mut quick = vec![0u8; QUICK_SIZE].into_boxed_slice();
        Self::fill_quick(palette, &mut quick);
        let quick: Box<[u8; QUICK_SIZE]> = quick.try_into().expect("quick table size");

        Self {
            entries,
            quick,
            len: palette.len(),
        }
    }

    #[cfg(feature = "parallel")]
    fn fill_quick(palette: &Palette, quick: &mut [u8]) {
        use rayon::prelude::*;
        quick
            .par_chunks_mut(1 << 10)
            .enumerate()
            .for_each(|(chunk, out)| {
                let base = chunk << 10;
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = palette.nearest(Self::key_color(base + i));
                }
            });
    }

    #[cfg(not(feature = "parallel"))]
    fn fill_quick(palette: &Palette, quick: &mut [u8]) {
        for (key, slot) in quick.iter_mut().enumerate() {
            *slot = palette.nearest(Self::key_color(key));
        }
    }

    /// The color a quantized key stands for.
    #[inline]
    const fn key_color(key: usize) -> Argb {
        Argb::from_rgb(
            expand5((key >> 10) as u8 & 0x1f),
            expand5((key >> 5) as u8 & 0x1f),
            expand5(key as u8 & 0x1f),
        )
    }

    /// The quantized table key for a color.
    #[inline]
    pub const fn key_of(color: Argb) -> usize {
        ((color.r() as usize >> 3) << 10)
            | ((color.g() as usize >> 3) << 5)
            | (color.b() as usize >> 3)
    }

    /// Canonical color of a palette index. Indices past the palette's end
    /// read as opaque black.
    #[inline]
    pub fn color(&self, index: u8) -> Argb {
        self.entries[index as usize]
    }

    /// All 256 canonical entries.
    #[inline]
    pub fn colors(&self) -> &[Argb; 256] {
        &self.entries
    }

    /// Nearest palette index for a color, through the quantized table.
    #[inline]
    pub fn index_of(&self, color: Argb) -> u8 {
        self.quick[Self::key_of(color)]
    }

    /// Number of live palette entries behind this cache.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; the underlying palette is never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}
