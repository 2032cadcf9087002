//! Palette storage and perceptually weighted nearest-color search.
//!
//! Distance between two colors is the weighted squared channel difference
//! `30*dr^2 + 59*dg^2 + 11*db^2` - the same green-dominant weighting the
//! engine uses for gray conversion, so quantizing through a gray palette
//! and storing to a gray format agree.
//!
//! Each candidate comparison is three table lookups and two additions:
//! the squared-difference tables over every possible channel delta are
//! built once per process. The search early-exits as soon as a partial
//! sum exceeds the best distance found so far.

use once_cell::sync::Lazy;
use pxl_core::Argb;

use crate::error::{PaletteError, PaletteResult};

/// Largest number of entries a palette can hold.
pub const MAX_PALETTE: usize = 256;

/// Weighted squared-difference tables, one per channel, indexed by
/// `delta + 255`.
struct DeltaTables {
    red: [u32; 511],
    green: [u32; 511],
    blue: [u32; 511],
}

static DELTA: Lazy<Box<DeltaTables>> = Lazy::new(|| {
    let mut t = Box::new(DeltaTables {
        red: [0; 511],
        green: [0; 511],
        blue: [0; 511],
    });
    for i in 0..511usize {
        let d = (i as i32 - 255) * (i as i32 - 255);
        let d = d as u32;
        t.red[i] = 30 * d;
        t.green[i] = 59 * d;
        t.blue[i] = 11 * d;
    }
    t
});

/// Forces construction of the distance tables.
pub fn init() {
    Lazy::force(&DELTA);
}

/// An ordered set of up to 256 opaque colors.
///
/// # Example
///
/// ```rust
/// use pxl_core::Argb;
/// use pxl_palette::Palette;
///
/// let pal = Palette::new(&[
///     Argb::from_rgb(0, 0, 0),
///     Argb::from_rgb(255, 255, 255),
///     Argb::from_rgb(10, 20, 30),
/// ]).unwrap();
/// assert_eq!(pal.nearest(Argb::from_rgb(10, 20, 30)), 2);
/// assert_eq!(pal.nearest(Argb::from_rgb(250, 250, 250)), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<Argb>,
}

impl Palette {
    /// Builds a palette from color entries. Alpha lanes are ignored and
    /// stored opaque.
    pub fn new(colors: &[Argb]) -> PaletteResult<Self> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        if colors.len() > MAX_PALETTE {
            return Err(PaletteError::TooManyEntries { count: colors.len() });
        }
        Ok(Self {
            entries: colors.iter().map(|c| c.with_alpha(0xff)).collect(),
        })
    }

    /// A 256-entry gray ramp.
    pub fn gray_ramp() -> Self {
        Self {
            entries: (0..=255u8).map(Argb::from_gray).collect(),
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; an empty palette cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The entry at `index`, or opaque black past the end.
    #[inline]
    pub fn color(&self, index: u8) -> Argb {
        self.entries
            .get(index as usize)
            .copied()
            .unwrap_or(Argb::BLACK)
    }

    /// All entries in order.
    #[inline]
    pub fn colors(&self) -> &[Argb] {
        &self.entries
    }

    /// Index of the entry nearest to `color` under the weighted squared
    /// distance. An exact entry always wins with distance zero.
    pub fn nearest(&self, color: Argb) -> u8 {
        self.nearest_with_distance(color).0
    }

    /// [`nearest`](Self::nearest), also reporting the winning distance.
    pub fn nearest_with_distance(&self, color: Argb) -> (u8, u32) {
        let t = &**DELTA;
        let (r, g, b) = (color.r() as i32, color.g() as i32, color.b() as i32);

        let mut best = u32::MAX;
        let mut best_i = 0u8;
        for (i, e) in self.entries.iter().enumerate() {
            // Green first: the heaviest weight rejects earliest.
            let mut d = t.green[(g - e.g() as i32 + 255) as usize];
            if d >= best {
                continue;
            }
            d += t.red[(r - e.r() as i32 + 255) as usize];
            if d >= best {
                continue;
            }
            d += t.blue[(b - e.b() as i32 + 255) as usize];
            if d < best {
                best = d;
                best_i = i as u8;
                if best == 0 {
                    break;
                }
            }
        }
        (best_i, best)
    }
}
