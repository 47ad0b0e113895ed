use std::io;

use cmpcov_core::errors::RegionSetError;
use thiserror::Error;

/// Error type for cmpcov-depth operations.
#[derive(Error, Debug)]
pub enum CmpCovError {
    /// Bad or contradictory settings, reported before any input is opened.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Inputs that cannot be scanned together (unsorted, different dictionaries, ...).
    #[error("Input consistency error: {0}")]
    InputConsistency(String),

    /// The depth window lost track of a position it should hold. This is a logic defect,
    /// never bad input.
    #[error(
        "Internal invariant violated: expected position {expected} at window index {index} but found {found} (window {front}..={back})"
    )]
    InternalInvariant {
        expected: u32,
        found: u32,
        index: usize,
        front: u32,
        back: u32,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    RegionSet(#[from] RegionSetError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias for cmpcov-depth operations.
pub type Result<T> = std::result::Result<T, CmpCovError>;
