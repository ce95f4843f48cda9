//! Error types for HBPL encoding.
//!
//! This module defines all errors that can occur while reading input pages,
//! encoding them and writing the printer stream.

use thiserror::Error;

/// Main error type for HBPL operations.
///
/// Input errors (`UnsupportedInput`, `InvalidRaster`) are local to one input
/// and the caller may continue with the next one. `Io` on the output side and
/// `OutOfMemory` abort the job.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the input or writing the printer stream failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A bit channel could not grow.
    ///
    /// Raised when the allocator refuses a channel growth step. The page in
    /// progress is discarded; nothing of it has been written.
    #[error("Out of memory while growing a bit channel by {requested} bytes")]
    OutOfMemory { requested: usize },

    /// Raster dimensions or sample buffer are unusable.
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    /// The input stream is not an acceptable PBM, PGM, PPM or PAM page.
    #[error("Not an acceptable PBM, PPM or PAM file: {0}")]
    UnsupportedInput(String),

    /// Invalid configuration parameter provided.
    ///
    /// Unknown media codes or a malformed margin list end up here.
    #[error("Invalid configuration parameter: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether the error only spoils the current input.
    ///
    /// The command line converter skips the rest of an input file on these
    /// and goes on with the next file.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::UnsupportedInput(_) | Self::InvalidRaster(_))
    }
}
