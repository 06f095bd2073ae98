//! Flanger: short modulated delay with feedback.

use autofx_core::{
    Effect, InterpolatedDelay, Lfo, ParamDescriptor, ParameterInfo, SmoothedParam, flush_denormal,
    ms_to_samples, wet_dry_mix,
};
use libm::ceilf;

const MIN_DELAY_MS: f32 = 1.0;
const MAX_DELAY_MS: f32 = 10.0;

/// Flanger sweeping a 1-10 ms delay, with a regenerative feedback path
/// for the characteristic resonant whoosh.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Rate | 0.05-5.0 Hz | 0.25 |
/// | 1 | Depth | 0-100% | 70.0 |
/// | 2 | Feedback | 0-90% | 50.0 |
/// | 3 | Mix | 0-100% | 50.0 |
#[derive(Debug, Clone)]
pub struct Flanger {
    delay: InterpolatedDelay,
    lfo: Lfo,
    min_delay_samples: f32,
    max_delay_samples: f32,
    rate: SmoothedParam,
    depth: SmoothedParam,
    feedback: SmoothedParam,
    mix: SmoothedParam,
    sample_rate: f32,
}

impl Flanger {
    /// Create a flanger at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let capacity = ceilf(ms_to_samples(MAX_DELAY_MS, sample_rate)) as usize + 2;
        Self {
            delay: InterpolatedDelay::new(capacity),
            lfo: Lfo::new(sample_rate, 0.25),
            min_delay_samples: ms_to_samples(MIN_DELAY_MS, sample_rate),
            max_delay_samples: ms_to_samples(MAX_DELAY_MS, sample_rate),
            rate: SmoothedParam::standard(0.25, sample_rate),
            depth: SmoothedParam::standard(0.7, sample_rate),
            feedback: SmoothedParam::standard(0.5, sample_rate),
            mix: SmoothedParam::standard(0.5, sample_rate),
            sample_rate,
        }
    }

    /// Set LFO rate in Hz (0.05-5).
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate.set_target(rate_hz.clamp(0.05, 5.0));
    }

    /// Set sweep depth (0-1).
    pub fn set_depth(&mut self, depth: f32) {
        self.depth.set_target(depth.clamp(0.0, 1.0));
    }

    /// Set feedback amount (0-0.9).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback.set_target(feedback.clamp(0.0, 0.9));
    }

    /// Set wet/dry mix (0-1).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }
}

impl Effect for Flanger {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let rate = self.rate.advance();
        let depth = self.depth.advance();
        let feedback = self.feedback.advance();
        let mix = self.mix.advance();

        self.lfo.set_frequency(rate);
        let sweep = self.lfo.advance_unipolar();

        let span = self.max_delay_samples - self.min_delay_samples;
        let time = self.min_delay_samples + sweep * depth * span;

        let wet = self.delay.read(time);
        self.delay
            .write(flush_denormal(input + wet * feedback));

        wet_dry_mix(input, wet, mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let capacity = ceilf(ms_to_samples(MAX_DELAY_MS, sample_rate)) as usize + 2;
        self.sample_rate = sample_rate;
        self.delay = InterpolatedDelay::new(capacity);
        self.min_delay_samples = ms_to_samples(MIN_DELAY_MS, sample_rate);
        self.max_delay_samples = ms_to_samples(MAX_DELAY_MS, sample_rate);
        self.lfo.set_sample_rate(sample_rate);
        self.rate.set_sample_rate(sample_rate);
        self.depth.set_sample_rate(sample_rate);
        self.feedback.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.delay.clear();
        self.lfo.reset();
        self.rate.snap_to_target();
        self.depth.snap_to_target();
        self.feedback.snap_to_target();
        self.mix.snap_to_target();
    }
}

impl ParameterInfo for Flanger {
    fn param_count(&self) -> usize {
        4
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::rate_hz(0.05, 5.0, 0.25)),
            1 => Some(ParamDescriptor {
                default: 70.0,
                ..ParamDescriptor::depth()
            }),
            2 => Some(ParamDescriptor {
                max: 90.0,
                default: 50.0,
                ..ParamDescriptor::feedback()
            }),
            3 => Some(ParamDescriptor::mix()),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.rate.target(),
            1 => self.depth.target() * 100.0,
            2 => self.feedback.target() * 100.0,
            3 => self.mix.target() * 100.0,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_rate(value),
            1 => self.set_depth(value / 100.0),
            2 => self.set_feedback(value / 100.0),
            3 => self.set_mix(value / 100.0),
            _ => {}
        }
    }
}
