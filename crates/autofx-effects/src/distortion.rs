//! Distortion: tanh waveshaping with tone and output level.

use autofx_core::{
    Effect, OnePole, ParamDescriptor, ParameterInfo, SmoothedParam, db_to_linear, soft_saturate,
};

/// Hard-character distortion.
///
/// Signal path: input gain (Drive) -> tanh saturator -> one-pole tone
/// filter -> output gain (Level). Fully wet; there is no mix control.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Drive | 0-40 dB | 12.0 |
/// | 1 | Tone | 500-8000 Hz | 4000.0 |
/// | 2 | Level | -20-6 dB | -3.0 |
#[derive(Debug, Clone)]
pub struct Distortion {
    tone_filter: OnePole,
    drive_db: SmoothedParam,
    tone_hz: f32,
    level_db: SmoothedParam,
}

impl Distortion {
    /// Create a distortion at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            tone_filter: OnePole::new(sample_rate, 4000.0),
            drive_db: SmoothedParam::standard(12.0, sample_rate),
            tone_hz: 4000.0,
            level_db: SmoothedParam::standard(-3.0, sample_rate),
        }
    }

    /// Set drive in dB (0-40).
    pub fn set_drive_db(&mut self, db: f32) {
        self.drive_db.set_target(db.clamp(0.0, 40.0));
    }

    /// Set tone cutoff in Hz (500-8000).
    pub fn set_tone_hz(&mut self, hz: f32) {
        self.tone_hz = hz.clamp(500.0, 8000.0);
        self.tone_filter.set_frequency(self.tone_hz);
    }

    /// Set output level in dB (-20-6).
    pub fn set_level_db(&mut self, db: f32) {
        self.level_db.set_target(db.clamp(-20.0, 6.0));
    }
}

impl Effect for Distortion {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let drive = db_to_linear(self.drive_db.advance());
        let level = db_to_linear(self.level_db.advance());

        let shaped = soft_saturate(input * drive);
        self.tone_filter.process(shaped) * level
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.tone_filter.set_sample_rate(sample_rate);
        self.drive_db.set_sample_rate(sample_rate);
        self.level_db.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.tone_filter.reset();
        self.drive_db.snap_to_target();
        self.level_db.snap_to_target();
    }
}

impl ParameterInfo for Distortion {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::gain_db("Drive", "Drive", 0.0, 40.0, 12.0)),
            1 => Some(ParamDescriptor {
                name: "Tone",
                short_name: "Tone",
                unit: autofx_core::ParamUnit::Hertz,
                min: 500.0,
                max: 8000.0,
                default: 4000.0,
                step: 10.0,
            }),
            2 => Some(ParamDescriptor::gain_db("Level", "Level", -20.0, 6.0, -3.0)),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.drive_db.target(),
            1 => self.tone_hz,
            2 => self.level_db.target(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_drive_db(value),
            1 => self.set_tone_hz(value),
            2 => self.set_level_db(value),
            _ => {}
        }
    }
}
