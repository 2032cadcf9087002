//! Integration tests for the pxl-rs crates.
//!
//! This crate contains end-to-end tests that exercise the engine across
//! crate boundaries: exhaustive round trips over the whole format
//! catalog, agreement between the fast and accurate access modes, and
//! the behavioral contracts of the conversion entry points.

#[cfg(test)]
mod agreement;
#[cfg(test)]
mod properties;
