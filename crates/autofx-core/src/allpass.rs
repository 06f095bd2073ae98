//! Allpass filters: first-order stages for phasing, delay allpasses for
//! reverb diffusion.
//!
//! Both pass all frequencies at equal amplitude and act only on phase.
//! [`AllpassStage`] is the coefficient form used in cascades to create the
//! phaser's sweeping notches; [`DiffusionAllpass`] is the Schroeder delay
//! form that smears a reverb's impulse response into a dense tail.

use crate::InterpolatedDelay;
use crate::flush_denormal;

/// First-order allpass stage.
///
/// Transfer function `H(z) = (a + z⁻¹) / (1 + a·z⁻¹)`. Cascading several
/// stages and sweeping `a` with an LFO produces the classic phaser notches
/// when mixed with the dry signal.
#[derive(Debug, Clone, Default)]
pub struct AllpassStage {
    /// Allpass coefficient, swept in (-1, 1).
    coeff: f32,
    /// Single-sample state (direct form II transposed).
    state: f32,
}

impl AllpassStage {
    /// Create a stage with zero coefficient (identity phase response).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the allpass coefficient. Stable for |a| < 1.
    #[inline]
    pub fn set_coefficient(&mut self, a: f32) {
        self.coeff = a.clamp(-0.99, 0.99);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.coeff * input + self.state;
        self.state = flush_denormal(input - self.coeff * output);
        output
    }

    /// Clear filter history.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

/// Schroeder allpass for reverb diffusion.
///
/// `output = -input + delayed`, with `input + delayed * feedback` fed into
/// the delay line. Typical feedback around 0.5.
#[derive(Debug, Clone)]
pub struct DiffusionAllpass {
    delay: InterpolatedDelay,
    feedback: f32,
}

impl DiffusionAllpass {
    /// Create an allpass with the given delay length in samples.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            delay: InterpolatedDelay::new(delay_samples),
            feedback: 0.5,
        }
    }

    /// Set the feedback coefficient. Stable for |feedback| < 1.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Process one sample through the allpass.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delay_samples = (self.delay.capacity() - 1) as f32;
        let delayed = self.delay.read(delay_samples);

        let output = -input + delayed;
        self.delay
            .write(flush_denormal(input + delayed * self.feedback));

        output
    }

    /// Clear the delay state.
    pub fn clear(&mut self) {
        self.delay.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_identity_with_zero_coeff() {
        let mut ap = AllpassStage::new();
        // a = 0 reduces to a one-sample delay: H(z) = z^-1.
        assert_eq!(ap.process(1.0), 0.0);
        assert_eq!(ap.process(0.0), 1.0);
    }

    #[test]
    fn stage_energy_preserving_on_sine() {
        use libm::sinf;
        let mut ap = AllpassStage::new();
        ap.set_coefficient(0.5);

        let mut in_energy = 0.0;
        let mut out_energy = 0.0;
        for i in 0..4096 {
            let x = sinf(i as f32 * 0.1);
            let y = ap.process(x);
            in_energy += x * x;
            out_energy += y * y;
        }
        let ratio = out_energy / in_energy;
        assert!((ratio - 1.0).abs() < 0.05, "energy ratio {ratio}");
    }

    #[test]
    fn diffusion_impulse_decays() {
        let mut ap = DiffusionAllpass::new(50);
        let mut out = ap.process(1.0);
        let mut peak: f32 = out.abs();
        for _ in 0..5000 {
            out = ap.process(0.0);
            peak = peak.max(out.abs());
        }
        // Tail must eventually decay below the initial response.
        assert!(out.abs() < 1e-3, "tail did not decay: {out}");
        assert!(peak <= 1.5);
    }

    #[test]
    fn reset_clears() {
        let mut ap = AllpassStage::new();
        ap.set_coefficient(0.7);
        ap.process(1.0);
        ap.reset();
        let state_out = ap.process(0.0);
        assert_eq!(state_out, 0.0);
    }
}
