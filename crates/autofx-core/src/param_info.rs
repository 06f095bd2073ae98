//! Parameter metadata for UI binding and the shared parameter surface.
//!
//! Every effect exposes its parameters through [`ParameterInfo`]: a count,
//! a [`ParamDescriptor`] per index, and index-based get/set. The engine uses
//! descriptors to publish slot metadata to the presentation layer and to
//! clamp incoming values; nothing here allocates.

/// Unit type for presenting a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamUnit {
    /// Dimensionless value.
    #[default]
    None,
    /// Percentage (0-100).
    Percent,
    /// Frequency in Hz.
    Hertz,
    /// Time in milliseconds.
    Milliseconds,
    /// Level in decibels.
    Decibels,
}

/// Describes one effect parameter: display name, unit, range, default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Delay Time").
    pub name: &'static str,
    /// Short name for narrow displays, max 8 characters.
    pub short_name: &'static str,
    /// Unit for formatting.
    pub unit: ParamUnit,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
    /// Default value on instantiation.
    pub default: f32,
    /// Recommended step increment for encoder-style control.
    pub step: f32,
}

impl ParamDescriptor {
    /// Standard wet/dry mix parameter (0-100%, default 50%).
    pub fn mix() -> Self {
        Self {
            name: "Mix",
            short_name: "Mix",
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 100.0,
            default: 50.0,
            step: 1.0,
        }
    }

    /// Standard modulation depth parameter (0-100%, default 50%).
    pub fn depth() -> Self {
        Self {
            name: "Depth",
            short_name: "Depth",
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 100.0,
            default: 50.0,
            step: 1.0,
        }
    }

    /// Standard feedback parameter (0-95%, default 40%).
    pub fn feedback() -> Self {
        Self {
            name: "Feedback",
            short_name: "Fdbk",
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 95.0,
            default: 40.0,
            step: 1.0,
        }
    }

    /// Modulation rate parameter in Hz.
    pub fn rate_hz(min: f32, max: f32, default: f32) -> Self {
        Self {
            name: "Rate",
            short_name: "Rate",
            unit: ParamUnit::Hertz,
            min,
            max,
            default,
            step: 0.1,
        }
    }

    /// Time parameter in milliseconds.
    pub fn time_ms(name: &'static str, short_name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Milliseconds,
            min,
            max,
            default,
            step: 1.0,
        }
    }

    /// Gain parameter in dB.
    pub fn gain_db(name: &'static str, short_name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 0.1,
        }
    }

    /// Clamp a value to this parameter's range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Index-based parameter access for an effect.
///
/// Valid indices are `0..param_count()`. Implementations handle
/// out-of-range indices gracefully (`None` / `0.0` / no-op) because the
/// shared parameter surface addresses slots by raw index.
pub trait ParameterInfo {
    /// Number of parameters this effect exposes.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`, or `None` out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index`, or `0.0` out of range.
    fn get_param(&self, index: usize) -> f32;

    /// Set the parameter at `index`, clamping to its descriptor range.
    /// Out-of-range indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);
}
