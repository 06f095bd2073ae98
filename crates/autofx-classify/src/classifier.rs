//! The classifier boundary and its built-in spectral implementation.
//!
//! [`Classifier`] is the opaque model interface: a fixed-length mono buffer
//! at the model rate in, one [`EffectKind`] out. [`SpectralClassifier`] is a
//! deterministic feature-based implementation standing in for the learned
//! model: it extracts framewise spectral statistics (centroid, flatness,
//! flux) and time-domain envelope statistics, then walks a fixed decision
//! tree over them. The output is always a valid kind, so the surrounding
//! pipeline behaves identically to one backed by real inference.

use autofx_catalog::EffectKind;
use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;

use crate::{ClassifyError, MODEL_INPUT_LEN, MODEL_SAMPLE_RATE};

/// Opaque model boundary: model-rate mono buffer in, effect kind out.
///
/// `Send + Sync` so a single instance can be shared with the watchdog
/// thread that guards long-running inference.
pub trait Classifier: Send + Sync {
    /// Classify a buffer of exactly [`MODEL_INPUT_LEN`] samples at
    /// [`MODEL_SAMPLE_RATE`].
    fn classify(&self, samples: &[f32]) -> Result<EffectKind, ClassifyError>;
}

const FRAME_LEN: usize = 2048;
const HOP_LEN: usize = 1024;

/// Framewise feature summary over the whole input.
#[derive(Debug, Clone, Copy)]
struct Features {
    rms: f32,
    /// Mean spectral centroid in Hz.
    centroid: f32,
    /// Mean spectral flatness, 0 tonal to 1 noisy.
    flatness: f32,
    /// Mean positive spectral flux between frames.
    flux: f32,
    /// Coefficient of variation of the frame RMS envelope.
    envelope_variation: f32,
    /// Peak / RMS ratio.
    crest: f32,
}

/// Deterministic spectral-feature classifier.
pub struct SpectralClassifier {
    planner: std::sync::Mutex<FftPlanner<f32>>,
}

impl Default for SpectralClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectralClassifier {
    /// Create a classifier. FFT plans are built lazily per call.
    pub fn new() -> Self {
        Self {
            planner: std::sync::Mutex::new(FftPlanner::new()),
        }
    }

    fn extract_features(&self, samples: &[f32]) -> Features {
        let fft = self.planner.lock().map_or_else(
            |poisoned| poisoned.into_inner().plan_fft_forward(FRAME_LEN),
            |mut planner| planner.plan_fft_forward(FRAME_LEN),
        );

        let hann: Vec<f32> = (0..FRAME_LEN)
            .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f32 / (FRAME_LEN - 1) as f32).cos())
            .collect();

        let mut centroid_sum = 0.0;
        let mut flatness_sum = 0.0;
        let mut flux_sum = 0.0;
        let mut frame_rms = Vec::new();
        let mut prev_mags: Option<Vec<f32>> = None;
        let mut frames = 0usize;

        let mut buffer = vec![Complex::new(0.0f32, 0.0); FRAME_LEN];
        let bin_width = MODEL_SAMPLE_RATE as f32 / FRAME_LEN as f32;

        for frame in samples.windows(FRAME_LEN).step_by(HOP_LEN) {
            for (i, (&s, &w)) in frame.iter().zip(&hann).enumerate() {
                buffer[i] = Complex::new(s * w, 0.0);
            }
            fft.process(&mut buffer);

            let mags: Vec<f32> = buffer[..FRAME_LEN / 2].iter().map(|c| c.norm()).collect();

            // Centroid: magnitude-weighted mean frequency.
            let mag_sum: f32 = mags.iter().sum();
            if mag_sum > 1e-9 {
                let weighted: f32 = mags
                    .iter()
                    .enumerate()
                    .map(|(i, &m)| i as f32 * bin_width * m)
                    .sum();
                centroid_sum += weighted / mag_sum;
            }

            // Flatness: geometric over arithmetic mean.
            let n = mags.len() as f32;
            let log_sum: f32 = mags.iter().map(|&m| m.max(1e-10).ln()).sum();
            let arith = mag_sum / n;
            if arith > 1e-10 {
                flatness_sum += (log_sum / n).exp() / arith;
            }

            // Positive flux against the previous frame.
            if let Some(prev) = &prev_mags {
                let flux: f32 = prev
                    .iter()
                    .zip(&mags)
                    .map(|(&p, &c)| {
                        let d = c - p;
                        if d > 0.0 { d * d } else { 0.0 }
                    })
                    .sum::<f32>()
                    .sqrt();
                flux_sum += flux / n;
            }
            prev_mags = Some(mags);

            let rms = (frame.iter().map(|s| s * s).sum::<f32>() / FRAME_LEN as f32).sqrt();
            frame_rms.push(rms);
            frames += 1;
        }

        let frames_f = frames.max(1) as f32;
        let rms_mean = frame_rms.iter().sum::<f32>() / frames_f;
        let rms_var = frame_rms
            .iter()
            .map(|r| (r - rms_mean) * (r - rms_mean))
            .sum::<f32>()
            / frames_f;
        let envelope_variation = if rms_mean > 1e-9 {
            rms_var.sqrt() / rms_mean
        } else {
            0.0
        };

        let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        let overall_rms =
            (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt();
        let crest = if overall_rms > 1e-9 {
            peak / overall_rms
        } else {
            0.0
        };

        Features {
            rms: overall_rms,
            centroid: centroid_sum / frames_f,
            flatness: flatness_sum / frames_f,
            flux: flux_sum / frames.saturating_sub(1).max(1) as f32,
            envelope_variation,
            crest,
        }
    }

    /// Fixed decision tree over the feature summary.
    ///
    /// Thresholds are hand-tuned against synthetic material; the goal is a
    /// stable, plausible mapping, not state-of-the-art accuracy.
    fn decide(features: Features) -> EffectKind {
        // Near-silence carries no evidence; leave the signal alone.
        if features.rms < 1e-4 {
            return EffectKind::Dry;
        }

        // Saturated material: flat, bright, low crest.
        if features.flatness > 0.35 && features.centroid > 3000.0 {
            return if features.crest < 2.5 {
                EffectKind::Distortion
            } else {
                EffectKind::Overdrive
            };
        }

        // Strong periodic amplitude envelope.
        if features.envelope_variation > 0.6 {
            return if features.flux > 0.02 {
                EffectKind::Tremolo
            } else {
                EffectKind::SlapbackDelay
            };
        }

        // Sustained tonal material with moving spectrum: modulation family.
        if features.flatness < 0.1 && features.flux > 0.01 {
            return if features.centroid > 2000.0 {
                EffectKind::Phaser
            } else if features.envelope_variation > 0.3 {
                EffectKind::Vibrato
            } else if features.centroid > 1000.0 {
                EffectKind::Flanger
            } else {
                EffectKind::Chorus
            };
        }

        // Smeared, dense, low-flux material reads as reverberant.
        if features.flatness > 0.15 && features.flux < 0.01 {
            return EffectKind::Reverb;
        }

        // Sparse transients over a quiet floor suggest discrete echoes.
        if features.envelope_variation > 0.4 {
            return EffectKind::FeedbackDelay;
        }

        EffectKind::Chorus
    }
}

impl Classifier for SpectralClassifier {
    fn classify(&self, samples: &[f32]) -> Result<EffectKind, ClassifyError> {
        if samples.len() != MODEL_INPUT_LEN {
            return Err(ClassifyError::InvalidInputLength {
                expected: MODEL_INPUT_LEN,
                got: samples.len(),
            });
        }

        let features = self.extract_features(samples);
        let kind = Self::decide(features);
        tracing::debug!(
            rms = features.rms,
            centroid = features.centroid,
            flatness = features.flatness,
            flux = features.flux,
            envelope_variation = features.envelope_variation,
            crest = features.crest,
            result = %kind,
            "classified input"
        );
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_buffer(f: impl FnMut(usize) -> f32) -> Vec<f32> {
        (0..MODEL_INPUT_LEN).map(f).collect()
    }

    #[test]
    fn wrong_length_is_contract_error() {
        let clf = SpectralClassifier::new();
        let err = clf.classify(&[0.0; 100]).unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::InvalidInputLength {
                expected: MODEL_INPUT_LEN,
                got: 100
            }
        ));
    }

    #[test]
    fn silence_classifies_as_dry() {
        let clf = SpectralClassifier::new();
        let silence = model_buffer(|_| 0.0);
        assert_eq!(clf.classify(&silence).unwrap(), EffectKind::Dry);
    }

    #[test]
    fn classification_is_deterministic() {
        let clf = SpectralClassifier::new();
        let signal = model_buffer(|i| (i as f32 * 0.07).sin() * 0.4);
        let first = clf.classify(&signal).unwrap();
        let second = clf.classify(&signal).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn clipped_noise_reads_as_saturation() {
        // Pseudo-random noise driven into hard clipping: flat and bright
        // with a low crest factor.
        let mut state = 0x12345678u32;
        let clf = SpectralClassifier::new();
        let signal = model_buffer(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            let noise = (state >> 8) as f32 / 8388608.0 - 1.0;
            (noise * 5.0).clamp(-0.9, 0.9)
        });
        let kind = clf.classify(&signal).unwrap();
        assert!(
            matches!(kind, EffectKind::Distortion | EffectKind::Overdrive),
            "expected a saturation kind, got {kind}"
        );
    }

    #[test]
    fn any_input_yields_a_valid_kind() {
        let clf = SpectralClassifier::new();
        for seed in 0..4u32 {
            let signal = model_buffer(|i| {
                ((i as f32 * (0.01 + seed as f32 * 0.013)).sin()
                    * (1.0 + (i as f32 * 0.0001).sin()))
                    * 0.5
            });
            let kind = clf.classify(&signal).unwrap();
            assert!(EffectKind::from_index(kind.index()).is_some());
        }
    }
}
