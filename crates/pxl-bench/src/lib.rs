//! Benchmark crate for pxl-rs; see `benches/pxl_bench.rs`.
//!
//! Run with: `cargo bench`
