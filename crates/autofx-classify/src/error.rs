//! Error taxonomy for the classification pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from decoding or classifying a target file.
///
/// Input errors (bad file, bad format) are expected runtime cases; the
/// engine maps any of them to a `Failed` process state without touching the
/// chain. [`ClassifyError::InvalidInputLength`] is a contract violation
/// between caller and classifier and indicates a bug, not bad input.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The file's extension is not on the accepted allow-list.
    #[error("unsupported file extension: {path}")]
    UnsupportedExtension {
        /// The rejected path.
        path: PathBuf,
    },

    /// The file could not be opened or read.
    #[error("failed to read audio file")]
    Io(#[from] std::io::Error),

    /// The container or codec could not be decoded.
    #[error("failed to decode audio: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    /// The file contains no audio track.
    #[error("no audio track found")]
    NoAudioTrack,

    /// The file decoded to zero samples.
    #[error("audio file is empty")]
    EmptyAudio,

    /// The container header declares an unusable sample rate.
    #[error("invalid sample rate {0} Hz")]
    InvalidSampleRate(u32),

    /// The classifier did not finish within the watchdog deadline.
    #[error("classification timed out")]
    Timeout,

    /// The buffer handed to the classifier is not the model input length.
    #[error("classifier input length {got}, expected {expected}")]
    InvalidInputLength {
        /// Required model input length.
        expected: usize,
        /// Length actually provided.
        got: usize,
    },
}
