//! Error types for surface validation.

use thiserror::Error;

/// Error type for building surface views over raw pixel memory.
///
/// Only surface *construction* can fail; the drawing entry points treat
/// degenerate geometry as "draw nothing" and caller contract violations
/// as assertions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpsError {
    /// Row stride is smaller than one row of pixels.
    #[error("stride {stride} is less than the {min_stride} bytes {width} pixels need")]
    StrideTooSmall {
        /// Provided stride in bytes.
        stride: usize,
        /// Minimum stride for the surface width.
        min_stride: usize,
        /// Surface width in pixels.
        width: usize,
    },

    /// The pixel buffer does not cover the surface extent.
    #[error("buffer of {len} bytes cannot hold {height} rows of stride {stride}")]
    BufferTooSmall {
        /// Provided buffer length in bytes.
        len: usize,
        /// Surface height in rows.
        height: usize,
        /// Row stride in bytes.
        stride: usize,
    },
}

/// Result type for surface construction.
pub type OpsResult<T> = Result<T, OpsError>;
