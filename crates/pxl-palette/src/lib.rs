//! # pxl-palette
//!
//! Palette storage, nearest-color search, and the indexed-format color
//! cache for the pxl-rs compositing engine.
//!
//! - [`Palette`] - up to 256 opaque colors with weighted nearest search
//! - [`ColorIndex`] - per-palette cache indexed formats transcode through:
//!   256 canonical entries plus a 32,768-entry quantized nearest-index
//!   table, so per-pixel stores are a single lookup
//!
//! Palettes are always passed explicitly to the operations that need
//! them; there is no process-wide default palette.
//!
//! # Example
//!
//! ```rust
//! use pxl_core::Argb;
//! use pxl_palette::{ColorIndex, Palette};
//!
//! let pal = Palette::new(&[
//!     Argb::from_rgb(0, 0, 0),
//!     Argb::from_rgb(255, 0, 0),
//!     Argb::from_rgb(0, 0, 255),
//! ]).unwrap();
//! let index = ColorIndex::build(&pal);
//!
//! assert_eq!(index.index_of(Argb::from_rgb(240, 16, 8)), 1);
//! ```
//!
//! # Features
//!
//! - `parallel` (default) - build the 32k quantized table with rayon

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod index;
mod palette;

pub use error::{PaletteError, PaletteResult};
pub use index::ColorIndex;
pub use palette::{init, Palette, MAX_PALETTE};
