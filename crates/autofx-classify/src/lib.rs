//! Audio decoding, resampling, and effect classification for autofx.
//!
//! This crate owns everything between "a file path lands on the plugin" and
//! "an [`EffectKind`](autofx_catalog::EffectKind) comes out": the symphonia
//! decode path, the rational resampler that normalizes material to the model
//! rate, and the [`Classifier`] boundary with its built-in
//! [`SpectralClassifier`] implementation.
//!
//! Everything here runs on a background thread; nothing is real-time-safe
//! and nothing needs to be.

pub mod classifier;
pub mod decode;
mod error;
pub mod resample;

pub use classifier::{Classifier, SpectralClassifier};
pub use decode::{DecodedAudio, decode_to_mono};
pub use error::ClassifyError;

use std::path::Path;

/// Sample rate the classification model was trained at, in Hz.
pub const MODEL_SAMPLE_RATE: u32 = 22050;

/// Fixed input length the model expects: two seconds at the model rate.
pub const MODEL_INPUT_LEN: usize = 44100;

/// File extensions accepted for classification targets (lowercase).
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["wav", "mp3"];

/// Whether a path carries an accepted audio extension (case-insensitive).
pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let lower = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&lower.as_str())
        })
}

/// Normalize decoded audio into the model's input buffer.
///
/// Resamples from `source_rate` to [`MODEL_SAMPLE_RATE`], then zero-pads or
/// truncates to exactly [`MODEL_INPUT_LEN`] samples.
pub fn prepare_model_input(samples: &[f32], source_rate: u32) -> Result<Vec<f32>, ClassifyError> {
    if samples.is_empty() {
        return Err(ClassifyError::EmptyAudio);
    }
    if source_rate == 0 {
        return Err(ClassifyError::InvalidSampleRate(source_rate));
    }

    let mut normalized = if source_rate == MODEL_SAMPLE_RATE {
        samples.to_vec()
    } else {
        resample::resample_rational(samples, MODEL_SAMPLE_RATE as usize, source_rate as usize)
    };

    normalized.resize(MODEL_INPUT_LEN, 0.0);
    Ok(normalized)
}
