//! # Error Types
//!
//! This module defines error types used throughout the quotesnap library.
//!
//! The taxonomy follows the recovery policy: `Validation` failures on stored
//! data are skipped rather than propagated, `Persistence` and `Export`
//! failures are surfaced once to the caller that triggered them, and nothing
//! here is ever fatal to the process.

use thiserror::Error;

/// Main error type for quotesnap operations
#[derive(Debug, Error)]
pub enum QuoteSnapError {
    /// Malformed or out-of-range configuration data
    #[error("Validation error: {0}")]
    Validation(String),

    /// A named configuration that does not exist in the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistence backend read/write failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Capture/rasterization failure during image export
    #[error("Export error: {0}")]
    Export(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
