//! Tremolo: periodic amplitude modulation.

use autofx_core::{Effect, Lfo, ParamDescriptor, ParameterInfo, SmoothedParam};

/// Tremolo modulating gain with a sine LFO.
///
/// At full depth the gain swings between 0 and 1; at zero depth the
/// signal passes unchanged.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Rate | 0.5-20.0 Hz | 5.0 |
/// | 1 | Depth | 0-100% | 50.0 |
#[derive(Debug, Clone)]
pub struct Tremolo {
    lfo: Lfo,
    rate: SmoothedParam,
    depth: SmoothedParam,
}

impl Tremolo {
    /// Create a tremolo at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            lfo: Lfo::new(sample_rate, 5.0),
            rate: SmoothedParam::standard(5.0, sample_rate),
            depth: SmoothedParam::standard(0.5, sample_rate),
        }
    }

    /// Set LFO rate in Hz (0.5-20).
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate.set_target(rate_hz.clamp(0.5, 20.0));
    }

    /// Set modulation depth (0-1).
    pub fn set_depth(&mut self, depth: f32) {
        self.depth.set_target(depth.clamp(0.0, 1.0));
    }
}

impl Effect for Tremolo {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let rate = self.rate.advance();
        let depth = self.depth.advance();

        self.lfo.set_frequency(rate);
        let shape = self.lfo.advance_unipolar();

        let gain = 1.0 - depth * (1.0 - shape);
        input * gain
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.lfo.set_sample_rate(sample_rate);
        self.rate.set_sample_rate(sample_rate);
        self.depth.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.lfo.reset();
        self.rate.snap_to_target();
        self.depth.snap_to_target();
    }
}

impl ParameterInfo for Tremolo {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::rate_hz(0.5, 20.0, 5.0)),
            1 => Some(ParamDescriptor::depth()),
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
