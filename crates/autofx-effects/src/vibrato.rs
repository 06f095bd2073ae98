//! Vibrato: pitch modulation via a fully wet modulated delay.

use autofx_core::{
    Effect, InterpolatedDelay, Lfo, ParamDescriptor, ParameterInfo, SmoothedParam, ms_to_samples,
};
use libm::ceilf;

const BASE_DELAY_MS: f32 = 5.0;
const MAX_MOD_MS: f32 = 3.0;

/// Vibrato. A chorus with no dry path: the output is only the modulated
/// delay tap, so the listener hears the pitch wobble rather than the
/// comb-filter shimmer.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Rate | 0.5-12.0 Hz | 5.0 |
/// | 1 | Depth | 0-100% | 30.0 |
#[derive(Debug, Clone)]
pub struct Vibrato {
    delay: InterpolatedDelay,
    lfo: Lfo,
    base_delay_samples: f32,
    max_mod_samples: f32,
    rate: SmoothedParam,
    depth: SmoothedParam,
}

impl Vibrato {
    /// Create a vibrato at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let capacity =
            ceilf(ms_to_samples(BASE_DELAY_MS + MAX_MOD_MS, sample_rate)) as usize + 2;
        Self {
            delay: InterpolatedDelay::new(capacity),
            lfo: Lfo::new(sample_rate, 5.0),
            base_delay_samples: ms_to_samples(BASE_DELAY_MS, sample_rate),
            max_mod_samples: ms_to_samples(MAX_MOD_MS, sample_rate),
            rate: SmoothedParam::standard(5.0, sample_rate),
            depth: SmoothedParam::standard(0.3, sample_rate),
        }
    }

    /// Set LFO rate in Hz (0.5-12).
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate.set_target(rate_hz.clamp(0.5, 12.0));
    }

    /// Set modulation depth (0-1).
    pub fn set_depth(&mut self, depth: f32) {
        self.depth.set_target(depth.clamp(0.0, 1.0));
    }
}

impl Effect for Vibrato {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let rate = self.rate.advance();
        let depth = self.depth.advance();

        self.lfo.set_frequency(rate);
        let modulation = self.lfo.advance();

        let time = self.base_delay_samples + modulation * depth * self.max_mod_samples;
        let out = self.delay.read(time);
        self.delay.write(input);
        out
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let capacity =
            ceilf(ms_to_samples(BASE_DELAY_MS + MAX_MOD_MS, sample_rate)) as usize + 2;
        self.delay = InterpolatedDelay::new(capacity);
        self.base_delay_samples = ms_to_samples(BASE_DELAY_MS, sample_rate);
        self.max_mod_samples = ms_to_samples(MAX_MOD_MS, sample_rate);
        self.lfo.set_sample_rate(sample_rate);
        self.rate.set_sample_rate(sample_rate);
        self.depth.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.delay.clear();
        self.lfo.reset();
        self.rate.snap_to_target();
        self.depth.snap_to_target();
    }

    fn latency_samples(&self) -> usize {
        self.base_delay_samples as usize
    }
}

impl ParameterInfo for Vibrato {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::rate_hz(0.5, 12.0, 5.0)),
            1 => Some(ParamDescriptor {
                default: 30.0,
                ..ParamDescriptor::depth()
            }),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.rate.target(),
            1 => self.depth.target() * 100.0,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_rate(value),
            1 => self.set_depth(value / 100.0),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_depth_is_pure_delay() {
        let mut vib = Vibrato::new(44100.0);
        vib.set_depth(0.0);
        vib.reset();
        let base = ms_to_samples(BASE_DELAY_MS, 44100.0) as usize;
        vib.process(1.0);
        let mut peak: f32 = 0.0;
        for _ in 0..base + 4 {
            peak = peak.max(vib.process(0.0).abs());
        }
        // Impulse re-emerges around the base delay, give or take interpolation.
        assert!(peak > 0.4, "impulse not recalled: {peak}");
    }

    #[test]
    fn output_finite_at_full_depth() {
        let mut vib = Vibrato::new(44100.0);
        vib.set_depth(1.0);
        vib.set_rate(12.0);
        vib.reset();
        for i in 0..44100 {
            let y = vib.process(libm::sinf(i as f32 * 0.2));
            assert!(y.is_finite());
            assert!(y.abs() <= 1.5);
        }
    }
}
