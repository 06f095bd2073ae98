//! Algorithmic reverb.
//!
//! A compact Schroeder topology: four parallel damped comb filters into two
//! series diffusion allpasses. Comb delay lengths are mutually prime (at the
//! 44.1 kHz reference) to avoid coincident resonances, and are rescaled when
//! the sample rate changes.

use autofx_core::{
    DampedComb, DiffusionAllpass, Effect, ParamDescriptor, ParameterInfo, SmoothedParam,
    wet_dry_mix,
};

/// Comb delay lengths at the 44.1 kHz reference, mutually prime.
const COMB_TUNINGS_44K: [usize; 4] = [1116, 1277, 1422, 1617];

/// Allpass delay lengths at the 44.1 kHz reference.
const ALLPASS_TUNINGS_44K: [usize; 2] = [556, 225];

/// Reference sample rate for the tuning constants.
const REFERENCE_RATE: f32 = 44100.0;

/// Scale a reference delay length to the target rate.
fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    (((samples as f32) * target_rate / REFERENCE_RATE) as usize).max(1)
}

/// Schroeder reverb.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Decay | 0-100% | 60.0 |
/// | 1 | Damping | 0-100% | 40.0 |
/// | 2 | Mix | 0-100% | 35.0 |
pub struct Reverb {
    combs: [DampedComb; 4],
    allpasses: [DiffusionAllpass; 2],
    decay: f32,
    damping: f32,
    mix: SmoothedParam,
    sample_rate: f32,
}

impl Reverb {
    /// Create a reverb at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let combs = COMB_TUNINGS_44K.map(|len| DampedComb::new(scale_to_rate(len, sample_rate)));
        let allpasses =
            ALLPASS_TUNINGS_44K.map(|len| DiffusionAllpass::new(scale_to_rate(len, sample_rate)));

        let mut reverb = Self {
            combs,
            allpasses,
            decay: 0.6,
            damping: 0.4,
            mix: SmoothedParam::standard(0.35, sample_rate),
            sample_rate,
        };
        reverb.apply_comb_settings();
        reverb
    }

    /// Set decay amount (0-1). Higher values give a longer tail.
    pub fn set_decay(&mut self, decay: f32) {
        self.decay = decay.clamp(0.0, 1.0);
        self.apply_comb_settings();
    }

    /// Set high-frequency damping (0 = bright, 1 = dark).
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
        self.apply_comb_settings();
    }

    /// Set wet/dry mix (0-1).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }

    /// Map decay/damping to comb feedback/damp. Feedback tops out at 0.93
    /// so the tail always decays.
    fn apply_comb_settings(&mut self) {
        let feedback = 0.7 + self.decay * 0.23;
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
            comb.set_damp(self.damping);
        }
        for allpass in &mut self.allpasses {
            allpass.set_feedback(0.5);
        }
    }
}

impl Effect for Reverb {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mix = self.mix.advance();

        // Parallel combs, averaged.
        let mut wet = 0.0;
        for comb in &mut self.combs {
            wet += comb.process(input);
        }
        wet *= 0.25;

        // Series diffusion.
        for allpass in &mut self.allpasses {
            wet = allpass.process(wet);
        }

        wet_dry_mix(input, wet, mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.combs =
            COMB_TUNINGS_44K.map(|len| DampedComb::new(scale_to_rate(len, sample_rate)));
        self.allpasses =
            ALLPASS_TUNINGS_44K.map(|len| DiffusionAllpass::new(scale_to_rate(len, sample_rate)));
        self.mix.set_sample_rate(sample_rate);
        self.apply_comb_settings();
    }

    fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in &mut self.allpasses {
            allpass.clear();
        }
        self.mix.snap_to_target();
    }
}

impl ParameterInfo for Reverb {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor {
                name: "Decay",
                short_name: "Decay",
                unit: autofx_core::ParamUnit::Percent,
                min: 0.0,
                max: 100.0,
                default: 60.0,
                step: 1.0,
            }),
            1 => Some(ParamDescriptor {
                name: "Damping",
                short_name: "Damp",
                unit: autofx_core::ParamUnit::Percent,
                min: 0.0,
                max: 100.0,
                default: 40.0,
                step: 1.0,
            }),
            2 => Some(ParamDescriptor {
                default: 35.0,
                ..ParamDescriptor::mix()
            }),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.decay * 100.0,
            1 => self.damping * 100.0,
            2 => self.mix.target() * 100.0,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_decay(value / 100.0),
            1 => self.set_damping(value / 100.0),
            2 => self.set_mix(value / 100.0),
            _ => {}
        }
    }
}
