//! Delay effects: feedback echo and single-tap slapback.

use autofx_core::{
    Effect, InterpolatedDelay, ParamDescriptor, ParameterInfo, SmoothedParam, flush_denormal,
    ms_to_samples, wet_dry_mix,
};
use libm::ceilf;

/// Echo with regeneration.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Delay Time | 1.0-2000.0 ms | 350.0 |
/// | 1 | Feedback | 0-95% | 40.0 |
/// | 2 | Mix | 0-100% | 35.0 |
#[derive(Debug, Clone)]
pub struct FeedbackDelay {
    delay_line: InterpolatedDelay,
    max_delay_samples: f32,
    /// Delay time in samples; smoothed slowly (50 ms) to avoid pitch sweeps.
    delay_time: SmoothedParam,
    feedback: SmoothedParam,
    mix: SmoothedParam,
    sample_rate: f32,
    /// Plain-unit views of the smoothed targets, for `ParameterInfo`.
    time_ms: f32,
}

const MAX_DELAY_MS: f32 = 2000.0;

impl FeedbackDelay {
    /// Create a delay with a 2-second maximum time.
    pub fn new(sample_rate: f32) -> Self {
        let max_delay_samples = ceilf(ms_to_samples(MAX_DELAY_MS, sample_rate)) as usize;
        let default_samples = ms_to_samples(350.0, sample_rate);

        Self {
            delay_line: InterpolatedDelay::new(max_delay_samples),
            max_delay_samples: max_delay_samples as f32,
            delay_time: SmoothedParam::with_config(default_samples, sample_rate, 50.0),
            feedback: SmoothedParam::standard(0.4, sample_rate),
            mix: SmoothedParam::standard(0.35, sample_rate),
            sample_rate,
            time_ms: 350.0,
        }
    }

    /// Set delay time in milliseconds (1-2000).
    pub fn set_delay_time_ms(&mut self, delay_ms: f32) {
        self.time_ms = delay_ms.clamp(1.0, MAX_DELAY_MS);
        let samples = ms_to_samples(self.time_ms, self.sample_rate);
        self.delay_time
            .set_target(samples.clamp(1.0, self.max_delay_samples - 1.0));
    }

    /// Set feedback amount (0-0.95).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback.set_target(feedback.clamp(0.0, 0.95));
    }

    /// Set wet/dry mix (0-1).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }
}

impl Effect for FeedbackDelay {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delay_samples = self.delay_time.advance();
        let feedback = self.feedback.advance();
        let mix = self.mix.advance();

        let delayed = self.delay_line.read(delay_samples);
        self.delay_line
            .write(flush_denormal(input + delayed * feedback));

        wet_dry_mix(input, delayed, mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        let max_delay_samples = ceilf(ms_to_samples(MAX_DELAY_MS, sample_rate)) as usize;
        self.delay_line = InterpolatedDelay::new(max_delay_samples);
        self.max_delay_samples = max_delay_samples as f32;
        self.delay_time.set_sample_rate(sample_rate);
        self.delay_time
            .set_immediate(ms_to_samples(self.time_ms, sample_rate));
        self.feedback.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.delay_line.clear();
        self.delay_time.snap_to_target();
        self.feedback.snap_to_target();
        self.mix.snap_to_target();
    }
}

impl ParameterInfo for FeedbackDelay {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::time_ms(
                "Delay Time",
                "Time",
                1.0,
                MAX_DELAY_MS,
                350.0,
            )),
            1 => Some(ParamDescriptor {
                default: 40.0,
                ..ParamDescriptor::feedback()
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
            0 => self.time_ms,
            1 => self.feedback.target() * 100.0,
            2 => self.mix.target() * 100.0,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_delay_time_ms(value),
            1 => self.set_feedback(value / 100.0),
            2 => self.set_mix(value / 100.0),
            _ => {}
        }
    }
}

/// Single short echo, no regeneration. The classic rockabilly vocal sound.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Slap Time | 40.0-200.0 ms | 110.0 |
/// | 1 | Mix | 0-100% | 40.0 |
#[derive(Debug, Clone)]
pub struct SlapbackDelay {
    delay_line: InterpolatedDelay,
    delay_time: SmoothedParam,
    mix: SmoothedParam,
    sample_rate: f32,
    time_ms: f32,
}

const MAX_SLAP_MS: f32 = 200.0;

impl SlapbackDelay {
    /// Create a slapback with a 110 ms default tap.
    pub fn new(sample_rate: f32) -> Self {
        let max_samples = ceilf(ms_to_samples(MAX_SLAP_MS, sample_rate)) as usize;
        Self {
            delay_line: InterpolatedDelay::new(max_samples),
            delay_time: SmoothedParam::with_config(
                ms_to_samples(110.0, sample_rate),
                sample_rate,
                50.0,
            ),
            mix: SmoothedParam::standard(0.4, sample_rate),
            sample_rate,
            time_ms: 110.0,
        }
    }

    /// Set the slap time in milliseconds (40-200).
    pub fn set_time_ms(&mut self, time_ms: f32) {
        self.time_ms = time_ms.clamp(40.0, MAX_SLAP_MS);
        self.delay_time
            .set_target(ms_to_samples(self.time_ms, self.sample_rate) - 1.0);
    }

    /// Set wet/dry mix (0-1).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }
}

impl Effect for SlapbackDelay {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delay_samples = self.delay_time.advance();
        let mix = self.mix.advance();

        let delayed = self.delay_line.read(delay_samples);
        // No feedback: only the dry input enters the line.
        self.delay_line.write(input);

        wet_dry_mix(input, delayed, mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        let max_samples = ceilf(ms_to_samples(MAX_SLAP_MS, sample_rate)) as usize;
        self.delay_line = InterpolatedDelay::new(max_samples);
        self.delay_time.set_sample_rate(sample_rate);
        self.delay_time
            .set_immediate(ms_to_samples(self.time_ms, sample_rate) - 1.0);
        self.mix.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.delay_line.clear();
        self.delay_time.snap_to_target();
        self.mix.snap_to_target();
    }
}

impl ParameterInfo for SlapbackDelay {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::time_ms(
                "Slap Time",
                "Slap",
                40.0,
                MAX_SLAP_MS,
                110.0,
            )),
            1 => Some(ParamDescriptor {
                default: 40.0,
                ..ParamDescriptor::mix()
            }),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.time_ms,
            1 => self.mix.target() * 100.0,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_time_ms(value),
            1 => self.set_mix(value / 100.0),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_delay_echoes_impulse() {
        let sr = 1000.0;
        let mut delay = FeedbackDelay::new(sr);
        delay.set_delay_time_ms(100.0); // 100 samples at 1 kHz
        delay.set_feedback(0.0);
        delay.set_mix(1.0);
        delay.reset();

        let mut out = delay.process(1.0);
        assert_eq!(out, 0.0);
        let mut echo_at = None;
        for n in 1..300 {
            out = delay.process(0.0);
            if out.abs() > 0.5 && echo_at.is_none() {
                echo_at = Some(n);
            }
        }
        let echo_at = echo_at.expect("no echo found");
        assert!(
            (98..=102).contains(&echo_at),
            "echo at sample {echo_at}, expected ~100"
        );
    }

    #[test]
    fn slapback_produces_single_echo() {
        let sr = 1000.0;
        let mut slap = SlapbackDelay::new(sr);
        slap.set_time_ms(50.0);
        slap.set_mix(1.0);
        slap.reset();

        slap.process(1.0);
        let mut echoes = 0;
        for _ in 0..500 {
            if slap.process(0.0).abs() > 0.25 {
                echoes += 1;
            }
        }
        // One tap, one or two adjacent samples from interpolation.
        assert!((1..=2).contains(&echoes), "expected single echo, got {echoes}");
    }

    #[test]
    fn params_roundtrip() {
        let mut delay = FeedbackDelay::new(48000.0);
        delay.set_param(0, 500.0);
        delay.set_param(1, 60.0);
        assert!((delay.get_param(0) - 500.0).abs() < 1e-3);
        assert!((delay.get_param(1) - 60.0).abs() < 1e-3);
        assert_eq!(delay.get_param(9), 0.0);
    }
}
