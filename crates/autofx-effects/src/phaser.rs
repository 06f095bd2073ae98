//! Phaser: cascaded allpass stages with a swept center frequency.

use autofx_core::{
    AllpassStage, Effect, Lfo, ParamDescriptor, ParameterInfo, SmoothedParam, flush_denormal,
    wet_dry_mix,
};
use core::f32::consts::PI;
use libm::{powf, tanf};

const NUM_STAGES: usize = 4;
const SWEEP_MIN_HZ: f32 = 200.0;
const SWEEP_MAX_HZ: f32 = 4000.0;

/// Coefficient updates are decimated to every N samples. The allpass
/// coefficient moves slowly at LFO rates, and `tan` per sample is wasted
/// work.
const COEFF_UPDATE_INTERVAL: usize = 8;

/// Four-stage phaser sweeping 200 Hz to 4 kHz.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Rate | 0.05-5.0 Hz | 0.4 |
/// | 1 | Depth | 0-100% | 60.0 |
/// | 2 | Feedback | 0-90% | 30.0 |
/// | 3 | Mix | 0-100% | 50.0 |
#[derive(Debug, Clone)]
pub struct Phaser {
    stages: [AllpassStage; NUM_STAGES],
    lfo: Lfo,
    feedback_sample: f32,
    samples_until_update: usize,
    rate: SmoothedParam,
    depth: SmoothedParam,
    feedback: SmoothedParam,
    mix: SmoothedParam,
    sample_rate: f32,
}

impl Phaser {
    /// Create a phaser at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            stages: core::array::from_fn(|_| AllpassStage::new()),
            lfo: Lfo::new(sample_rate, 0.4),
            feedback_sample: 0.0,
            samples_until_update: 0,
            rate: SmoothedParam::standard(0.4, sample_rate),
            depth: SmoothedParam::standard(0.6, sample_rate),
            feedback: SmoothedParam::standard(0.3, sample_rate),
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

    fn update_coefficients(&mut self, sweep: f32, depth: f32) {
        // Exponential sweep between the min and max center frequencies,
        // depth shrinking the excursion toward the geometric middle.
        let ratio = SWEEP_MAX_HZ / SWEEP_MIN_HZ;
        let center = 0.5 + (sweep - 0.5) * depth;
        let freq = SWEEP_MIN_HZ * powf(ratio, center);

        let warped = tanf(PI * (freq / self.sample_rate).min(0.49));
        let coeff = (warped - 1.0) / (warped + 1.0);
        for stage in &mut self.stages {
            stage.set_coefficient(coeff);
        }
    }
}

impl Effect for Phaser {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let rate = self.rate.advance();
        let depth = self.depth.advance();
        let feedback = self.feedback.advance();
        let mix = self.mix.advance();

        self.lfo.set_frequency(rate);
        let sweep = self.lfo.advance_unipolar();

        if self.samples_until_update == 0 {
            self.update_coefficients(sweep, depth);
            self.samples_until_update = COEFF_UPDATE_INTERVAL;
        }
        self.samples_until_update -= 1;

        let mut wet = input + self.feedback_sample * feedback;
        for stage in &mut self.stages {
            wet = stage.process(wet);
        }
        self.feedback_sample = flush_denormal(wet);

        wet_dry_mix(input, wet, mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lfo.set_sample_rate(sample_rate);
        self.rate.set_sample_rate(sample_rate);
        self.depth.set_sample_rate(sample_rate);
        self.feedback.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
        self.samples_until_update = 0;
    }

    fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
        self.lfo.reset();
        self.feedback_sample = 0.0;
        self.samples_until_update = 0;
        self.rate.snap_to_target();
        self.depth.snap_to_target();
        self.feedback.snap_to_target();
        self.mix.snap_to_target();
    }
}

impl ParameterInfo for Phaser {
    fn param_count(&self) -> usize {
        4
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::rate_hz(0.05, 5.0, 0.4)),
            1 => Some(ParamDescriptor {
                default: 60.0,
                ..ParamDescriptor::depth()
            }),
            2 => Some(ParamDescriptor {
                max: 90.0,
                default: 30.0,
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
