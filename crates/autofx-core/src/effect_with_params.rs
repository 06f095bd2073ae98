//! Combined `Effect` + `ParameterInfo` trait for boxed effects.
//!
//! [`EffectWithParams`] bridges the object-safe [`Effect`] trait and
//! [`ParameterInfo`]: prefixed methods dispatched through a single vtable,
//! with a blanket impl covering every concrete type implementing both.
//! The effect catalog and the chain nodes store
//! `Box<dyn EffectWithParams + Send>` so parameters stay reachable on
//! instances chosen at runtime.

use crate::effect::Effect;
use crate::param_info::{ParamDescriptor, ParameterInfo};

/// Parameter access on a boxed effect.
pub trait EffectWithParams: Effect {
    /// Number of parameters.
    fn effect_param_count(&self) -> usize;

    /// Parameter descriptor by index.
    fn effect_param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Parameter value by index.
    fn effect_get_param(&self, index: usize) -> f32;

    /// Set a parameter value by index.
    fn effect_set_param(&mut self, index: usize, value: f32);
}

impl<T: Effect + ParameterInfo> EffectWithParams for T {
    fn effect_param_count(&self) -> usize {
        self.param_count()
    }

    fn effect_param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.param_info(index)
    }

    fn effect_get_param(&self, index: usize) -> f32 {
        self.get_param(index)
    }

    fn effect_set_param(&mut self, index: usize, value: f32) {
        self.set_param(index, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity {
        gain: f32,
    }

    impl Effect for Identity {
        fn process(&mut self, input: f32) -> f32 {
            input * self.gain
        }
        fn set_sample_rate(&mut self, _: f32) {}
        fn reset(&mut self) {}
    }

    impl ParameterInfo for Identity {
        fn param_count(&self) -> usize {
            1
        }
        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            (index == 0).then(ParamDescriptor::mix)
        }
        fn get_param(&self, index: usize) -> f32 {
            if index == 0 { self.gain } else { 0.0 }
        }
        fn set_param(&mut self, index: usize, value: f32) {
            if index == 0 {
                self.gain = value;
            }
        }
    }

    #[test]
    fn boxed_dispatch_works() {
        let mut boxed: Box<dyn EffectWithParams + Send> = Box::new(Identity { gain: 1.0 });
        assert_eq!(boxed.effect_param_count(), 1);
        boxed.effect_set_param(0, 2.0);
        assert_eq!(boxed.effect_get_param(0), 2.0);
        assert_eq!(boxed.process(0.5), 1.0);
        assert!(boxed.effect_param_info(1).is_none());
    }
}
