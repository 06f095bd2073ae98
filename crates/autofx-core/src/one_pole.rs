//! One-pole lowpass filter for tone controls and HF damping.
//!
//! Difference equation:
//!
//! ```text
//! y[n] = (1 - coeff) * x[n] + coeff * y[n-1]
//! ```
//!
//! with `coeff = exp(-2π * freq / sample_rate)`. 6 dB/octave rolloff, one
//! multiply per sample. Used for overdrive tone shaping and feedback-path
//! damping.
//!
//! Reference: Julius O. Smith III, "Introduction to Digital Filters with
//! Audio Applications", One-Pole Filter.

use crate::flush_denormal;
use core::f32::consts::PI;
use libm::expf;

/// One-pole (6 dB/oct) lowpass filter.
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
    freq: f32,
}

impl OnePole {
    /// Create a lowpass with the given cutoff.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            coeff: 0.0,
            sample_rate,
            freq: freq_hz,
        };
        filter.recalculate_coeff();
        filter
    }

    /// Set cutoff frequency in Hz and recalculate the coefficient.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.freq = freq_hz;
        self.recalculate_coeff();
    }

    /// Update the sample rate, keeping the configured cutoff.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        self.state
    }

    /// Clear filter history.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    fn recalculate_coeff(&mut self) {
        let nyquist = self.sample_rate * 0.5;
        let freq = self.freq.clamp(20.0, nyquist.max(20.0));
        self.coeff = expf(-2.0 * PI * freq / self.sample_rate);
    }
}
