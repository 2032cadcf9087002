//! # pxl-formats
//!
//! Pixel format descriptors and transcoding for the pxl-rs compositing
//! engine.
//!
//! - [`PixelFormat`] - the 64 built-in formats, identifiers 0-63
//! - [`FormatDesc`] / [`Channel`] - mask/shift/loss layout descriptors
//! - [`fetch_row`] / [`store_row`] / [`fetch_pixel`] - scanline and
//!   single-pixel transcoding to and from the canonical representation,
//!   in accurate and table-driven fast modes
//! - [`FreeFormat`] - runtime-defined layouts outside the catalog
//!
//! # Example
//!
//! ```rust
//! use pxl_core::Argb;
//! use pxl_formats::{fetch_row, store_row, Access, FormatCtx, PixelFormat};
//!
//! // Convert two RGB565 pixels to canonical and back.
//! let row = 0xf800u16.to_ne_bytes().iter().chain(&0x07e0u16.to_ne_bytes())
//!     .copied().collect::<Vec<u8>>();
//! let mut line = [Argb::TRANSPARENT; 2];
//! fetch_row(PixelFormat::Rgb565, Access::Fast, &row, 0, &mut line, &FormatCtx::none());
//! assert_eq!(line[0], Argb::from_rgb(255, 0, 0));
//! assert_eq!(line[1], Argb::from_rgb(0, 255, 0));
//!
//! let mut out = vec![0u8; 4];
//! store_row(PixelFormat::Rgb565, &mut out, 0, &line, &FormatCtx::none());
//! assert_eq!(out, row);
//! ```
//!
//! # Dependencies
//!
//! - [`pxl-core`](pxl_core) - the canonical pixel
//! - [`pxl-palette`](pxl_palette) - indexed formats transcode through a
//!   [`ColorIndex`](pxl_palette::ColorIndex) passed in the [`FormatCtx`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod access;
mod catalog;
mod desc;
mod error;
mod free;

pub use access::{
    fetch_cell, fetch_pixel, fetch_row, fetch_row_desc, init, read_cell, store_cell, store_pixel,
    store_row, store_row_desc, write_cell, Access, FormatCtx,
};
pub use catalog::{PixelFormat, ALL_FORMATS, FORMAT_COUNT, UNKNOWN_ID};
pub use desc::{Channel, FormatClass, FormatDesc};
pub use error::{FormatError, FormatResult};
pub use free::{FormatRef, FreeFormat};
