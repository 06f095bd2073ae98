//! Feedback comb filter with damping for reverb algorithms.
//!
//! The feedback path includes a one-pole lowpass so high frequencies decay
//! faster than lows, as they do in real rooms. Building block for the
//! Schroeder/Freeverb-style reverb in autofx-effects.

use crate::InterpolatedDelay;
use crate::flush_denormal;

/// Comb filter with damped feedback.
///
/// # Example
///
/// ```rust
/// use autofx_core::DampedComb;
///
/// let mut comb = DampedComb::new(1116);
/// comb.set_feedback(0.84);
/// comb.set_damp(0.2);
/// let out = comb.process(1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DampedComb {
    delay: InterpolatedDelay,
    feedback: f32,
    damp1: f32,
    damp2: f32,
    filterstore: f32,
}

impl DampedComb {
    /// Create a comb with the given delay length in samples.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            delay: InterpolatedDelay::new(delay_samples),
            feedback: 0.5,
            damp1: 0.5,
            damp2: 0.5,
            filterstore: 0.0,
        }
    }

    /// Set feedback (0 to 0.99). Higher values mean longer decay.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    /// Set damping (0 = bright, 1 = dark).
    #[inline]
    pub fn set_damp(&mut self, damp: f32) {
        self.damp1 = damp.clamp(0.0, 1.0);
        self.damp2 = 1.0 - self.damp1;
    }

    /// Process one sample; output is the delayed signal.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delay_samples = (self.delay.capacity() - 1) as f32;
        let output = self.delay.read(delay_samples);

        // One-pole lowpass in the feedback path.
        self.filterstore = flush_denormal(output * self.damp2 + self.filterstore * self.damp1);
        self.delay.write(input + self.filterstore * self.feedback);

        output
    }

    /// Clear delay and filter state.
    pub fn clear(&mut self) {
        self.delay.clear();
        self.filterstore = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_repeats_at_delay_period() {
        let mut comb = DampedComb::new(10);
        comb.set_feedback(0.5);
        comb.set_damp(0.0);

        let first = comb.process(1.0);
        assert_eq!(first, 0.0); // nothing in the line yet

        let mut outputs = [0.0f32; 30];
        for out in &mut outputs {
            *out = comb.process(0.0);
        }
        // The impulse emerges after the delay period.
        let first_echo = outputs.iter().position(|&v| v != 0.0).unwrap();
        assert_eq!(first_echo, 9);
    }

    #[test]
    fn decays_with_feedback_below_one() {
        let mut comb = DampedComb::new(20);
        comb.set_feedback(0.8);
        comb.set_damp(0.3);

        comb.process(1.0);
        let mut last = 1.0f32;
        for _ in 0..20000 {
            last = comb.process(0.0);
        }
        assert!(last.abs() < 1e-4, "did not decay: {last}");
    }

    #[test]
    fn clear_resets_everything() {
        let mut comb = DampedComb::new(8);
        for _ in 0..16 {
            comb.process(1.0);
        }
        comb.clear();
        for _ in 0..16 {
            assert_eq!(comb.process(0.0), 0.0);
        }
    }
}
