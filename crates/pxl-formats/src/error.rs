//! Error types for format construction.

use thiserror::Error;

/// Error type for building runtime format descriptors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// Depth is not one of 1, 4, 8, 16, 24, 32.
    #[error("unsupported bit depth {bits}")]
    UnsupportedDepth {
        /// The rejected depth.
        bits: u8,
    },

    /// A channel mask has holes.
    #[error("channel mask {mask:#x} is not a contiguous bit run")]
    MaskNotContiguous {
        /// The rejected mask.
        mask: u32,
    },

    /// A channel is wider than the canonical 8 bits.
    #[error("channel mask {mask:#x} is {width} bits wide, the maximum is 8")]
    ChannelTooWide {
        /// The rejected mask.
        mask: u32,
        /// Its width in bits.
        width: u8,
    },

    /// A channel mask has bits outside the pixel cell.
    #[error("channel mask {mask:#x} exceeds a {bits}-bit cell")]
    MaskExceedsCell {
        /// The rejected mask.
        mask: u32,
        /// Cell depth in bits.
        bits: u8,
    },

    /// Two channel masks claim the same bits.
    #[error("channel masks overlap")]
    MasksOverlap,

    /// No channel mask was given at all.
    #[error("format defines no channels")]
    NoChannels,
}

/// Result type for format construction.
pub type FormatResult<T> = Result<T, FormatError>;
