//! Dry passthrough - the classifier's "no effect needed" answer.

use autofx_core::{Effect, ParamDescriptor, ParameterInfo};

/// Identity transform. Exists so a "dry" classification still occupies a
/// chain slot and the chain length reflects every classified file.
#[derive(Debug, Clone, Default)]
pub struct Dry;

impl Dry {
    /// Create a passthrough. The sample rate is irrelevant but accepted for
    /// factory uniformity.
    pub fn new(_sample_rate: f32) -> Self {
        Self
    }
}

impl Effect for Dry {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        input
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {}
}

impl ParameterInfo for Dry {
    fn param_count(&self) -> usize {
        0
    }

    fn param_info(&self, _index: usize) -> Option<ParamDescriptor> {
        None
    }

    fn get_param(&self, _index: usize) -> f32 {
        0.0
    }

    fn set_param(&mut self, _index: usize, _value: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_exact_passthrough() {
        let mut dry = Dry::new(48000.0);
        for x in [-1.0, -0.25, 0.0, 1e-30, 0.7, 1.0] {
            assert_eq!(dry.process(x), x);
        }
    }
}
