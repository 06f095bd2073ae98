//! Dual-voice chorus.

use autofx_core::{
    Effect, InterpolatedDelay, Lfo, ParamDescriptor, ParameterInfo, SmoothedParam, ms_to_samples,
    wet_dry_mix,
};
use libm::ceilf;

const BASE_DELAY_MS: f32 = 15.0;
const MAX_MOD_MS: f32 = 5.0;

/// Chorus with two LFO-modulated voices, 90 degrees apart.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Rate | 0.1-8.0 Hz | 0.8 |
/// | 1 | Depth | 0-100% | 50.0 |
/// | 2 | Mix | 0-100% | 50.0 |
#[derive(Debug, Clone)]
pub struct Chorus {
    delay1: InterpolatedDelay,
    delay2: InterpolatedDelay,
    lfo1: Lfo,
    lfo2: Lfo,
    base_delay_samples: f32,
    max_mod_samples: f32,
    rate: SmoothedParam,
    depth: SmoothedParam,
    mix: SmoothedParam,
    sample_rate: f32,
}

impl Chorus {
    /// Create a chorus at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let max_delay_samples =
            ceilf(ms_to_samples(BASE_DELAY_MS + MAX_MOD_MS, sample_rate)) as usize + 1;

        let lfo1 = Lfo::new(sample_rate, 0.8);
        let mut lfo2 = Lfo::new(sample_rate, 0.8);
        lfo2.set_phase(0.25); // 90° offset decorrelates the voices

        Self {
            delay1: InterpolatedDelay::new(max_delay_samples),
            delay2: InterpolatedDelay::new(max_delay_samples),
            lfo1,
            lfo2,
            base_delay_samples: ms_to_samples(BASE_DELAY_MS, sample_rate),
            max_mod_samples: ms_to_samples(MAX_MOD_MS, sample_rate),
            rate: SmoothedParam::standard(0.8, sample_rate),
            depth: SmoothedParam::standard(0.5, sample_rate),
            mix: SmoothedParam::standard(0.5, sample_rate),
            sample_rate,
        }
    }

    /// Set LFO rate in Hz (0.1-8).
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate.set_target(rate_hz.clamp(0.1, 8.0));
    }

    /// Set modulation depth (0-1).
    pub fn set_depth(&mut self, depth: f32) {
        self.depth.set_target(depth.clamp(0.0, 1.0));
    }

    /// Set wet/dry mix (0-1).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }
}

impl Effect for Chorus {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let rate = self.rate.advance();
        let depth = self.depth.advance();
        let mix = self.mix.advance();

        self.lfo1.set_frequency(rate);
        self.lfo2.set_frequency(rate);

        let mod1 = self.lfo1.advance();
        let mod2 = self.lfo2.advance();

        let time1 = self.base_delay_samples + mod1 * depth * self.max_mod_samples;
        let time2 = self.base_delay_samples + mod2 * depth * self.max_mod_samples;

        let wet1 = self.delay1.read(time1);
        let wet2 = self.delay2.read(time2);

        self.delay1.write(input);
        self.delay2.write(input);

        wet_dry_mix(input, (wet1 + wet2) * 0.5, mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let max_delay_samples =
            ceilf(ms_to_samples(BASE_DELAY_MS + MAX_MOD_MS, sample_rate)) as usize + 1;
        self.sample_rate = sample_rate;
        self.delay1 = InterpolatedDelay::new(max_delay_samples);
        self.delay2 = InterpolatedDelay::new(max_delay_samples);
        self.base_delay_samples = ms_to_samples(BASE_DELAY_MS, sample_rate);
        self.max_mod_samples = ms_to_samples(MAX_MOD_MS, sample_rate);
        self.lfo1.set_sample_rate(sample_rate);
        self.lfo2.set_sample_rate(sample_rate);
        self.rate.set_sample_rate(sample_rate);
        self.depth.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.delay1.clear();
        self.delay2.clear();
        self.lfo1.reset();
        self.lfo2.reset();
        self.lfo2.set_phase(0.25);
        self.rate.snap_to_target();
        self.depth.snap_to_target();
        self.mix.snap_to_target();
    }
}

impl ParameterInfo for Chorus {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::rate_hz(0.1, 8.0, 0.8)),
            1 => Some(ParamDescriptor::depth()),
            2 => Some(ParamDescriptor::mix()),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.rate.target(),
            1 => self.depth.target() * 100.0,
            2 => self.mix.target() * 100.0,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_rate(value),
            1 => self.set_depth(value / 100.0),
            2 => self.set_mix(value / 100.0),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_finite_and_bounded() {
        let mut chorus = Chorus::new(48000.0);
        chorus.set_depth(1.0);
        chorus.set_mix(1.0);
        for i in 0..48000 {
            let x = libm::sinf(i as f32 * 0.05);
            let y = chorus.process(x);
            assert!(y.is_finite());
            assert!(y.abs() <= 2.0);
        }
    }

    #[test]
    fn fully_dry_mix_is_identity() {
        let mut chorus = Chorus::new(48000.0);
        chorus.set_mix(0.0);
        chorus.reset();
        for i in 0..256 {
            let x = (i % 7) as f32 * 0.1;
            assert_eq!(chorus.process(x), x);
        }
    }
}
