//! Low-frequency oscillator for modulation effects.
//!
//! Phase-accumulator oscillator used by chorus, flanger, phaser, tremolo,
//! and vibrato. Sub-audio frequencies only; no band-limiting needed.

use core::f32::consts::PI;
use libm::sinf;

/// LFO waveform type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Smooth sinusoidal modulation (default).
    #[default]
    Sine,
    /// Linear up/down ramps.
    Triangle,
}

/// Low-frequency oscillator.
///
/// # Example
///
/// ```rust
/// use autofx_core::{Lfo, LfoWaveform};
///
/// let mut lfo = Lfo::new(48000.0, 2.0); // 2 Hz
/// lfo.set_waveform(LfoWaveform::Triangle);
/// let value = lfo.advance(); // in [-1.0, 1.0]
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Phase increment per sample
    phase_inc: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    waveform: LfoWaveform,
}

impl Lfo {
    /// Create a new LFO at the given sample rate and frequency.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: freq_hz / sample_rate,
            sample_rate,
            waveform: LfoWaveform::Sine,
        }
    }

    /// Set frequency in Hz.
    #[inline]
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.phase_inc = freq_hz / self.sample_rate;
    }

    /// Set the waveform.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Sync phase to a value in [0, 1]. `0.25` = 90° offset.
    ///
    /// Used by multi-voice effects to decorrelate their voices.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase.clamp(0.0, 1.0);
    }

    /// Reset phase to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Update the sample rate, preserving the configured frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let freq = self.phase_inc * self.sample_rate;
        self.sample_rate = sample_rate;
        self.set_frequency(freq);
    }

    /// Next LFO value in [-1.0, 1.0], advancing one sample.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let output = match self.waveform {
            LfoWaveform::Sine => sinf(self.phase * 2.0 * PI),
            LfoWaveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }

    /// Next value scaled to [0.0, 1.0].
    #[inline]
    pub fn advance_unipolar(&mut self) -> f32 {
        (self.advance() + 1.0) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_cycle_per_second_at_one_hz() {
        let mut lfo = Lfo::new(44100.0, 1.0);
        for _ in 0..44100 {
            lfo.advance();
        }
        let phase_error = lfo.phase.min((lfo.phase - 1.0).abs());
        assert!(phase_error < 0.01);
    }

    #[test]
    fn output_in_range() {
        for waveform in [LfoWaveform::Sine, LfoWaveform::Triangle] {
            let mut lfo = Lfo::new(44100.0, 5.0);
            lfo.set_waveform(waveform);
            for _ in 0..1000 {
                let v = lfo.advance();
                assert!((-1.0..=1.0).contains(&v), "{waveform:?} out of range: {v}");
            }
        }
    }

    #[test]
    fn phase_offset_opposes() {
        let mut a = Lfo::new(44100.0, 2.0);
        let mut b = Lfo::new(44100.0, 2.0);
        b.set_phase(0.5);
        let (va, vb) = (a.advance(), b.advance());
        assert!((va + vb).abs() < 0.01, "expected opposite, got {va} and {vb}");
    }

    #[test]
    fn unipolar_range() {
        let mut lfo = Lfo::new(44100.0, 5.0);
        for _ in 0..1000 {
            let v = lfo.advance_unipolar();
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn sample_rate_change_preserves_frequency() {
        let mut lfo = Lfo::new(44100.0, 4.0);
        lfo.set_sample_rate(48000.0);
        assert!((lfo.phase_inc * 48000.0 - 4.0).abs() < 1e-4);
    }
}
