//! Error types for palette operations.

use thiserror::Error;

/// Error type for palette construction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteError {
    /// A palette must hold at least one entry.
    #[error("palette has no entries")]
    Empty,

    /// A palette holds at most 256 entries.
    #[error("palette has {count} entries, the maximum is 256")]
    TooManyEntries {
        /// Number of entries that were supplied.
        count: usize,
    },
}

/// Result type for palette operations.
pub type PaletteResult<T> = Result<T, PaletteError>;
