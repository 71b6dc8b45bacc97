//! Error taxonomy for the recording pipeline
//!
//! Persistence problems are deliberately kept out of the wrapped call's
//! result path: the recorder logs them and forwards the call anyway. The
//! variants here surface everywhere else — configuration, capture, codecs,
//! and offline inspection.

use thiserror::Error;

/// Errors that can occur while configuring or running a recorder
#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("Sample size must be a positive integer, got {0}")]
    InvalidSampleSize(usize),

    #[error("Recording system is frozen: cannot modify `{0}` after initialization")]
    FrozenConfig(&'static str),

    #[error("Failed to capture argument value: {0}")]
    CaptureError(String),

    #[error("Failed to encode sample: {0}")]
    EncodeError(String),

    #[error("Failed to decode sample: {0}")]
    DecodeError(String),

    #[error("Store manifest missing or invalid: {0}")]
    ManifestError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;
