//! Core DSP primitives for the autofx dynamic effect chain.
//!
//! This crate provides the building blocks every autofx effect is made of:
//!
//! - [`Effect`] - the uniform prepare/process/reset contract
//! - [`SmoothedParam`] - zipper-free parameter smoothing
//! - [`Lfo`] - modulation source for chorus/flanger/tremolo/vibrato
//! - [`InterpolatedDelay`] - fractional delay line for time-based effects
//! - [`AllpassStage`] / [`DampedComb`] - phaser and reverb building blocks
//! - [`ParamDescriptor`] / [`ParameterInfo`] - parameter metadata for
//!   UI binding and the shared parameter surface
//!
//! All processing paths are allocation-free: buffers are sized at
//! construction or in `set_sample_rate` and never grow during `process`.
//!
//! # no_std Support
//!
//! The crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! autofx-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod allpass;
pub mod comb;
pub mod delay;
pub mod effect;
pub mod effect_with_params;
pub mod lfo;
pub mod math;
pub mod one_pole;
pub mod param;
pub mod param_info;

pub use allpass::{AllpassStage, DiffusionAllpass};
pub use comb::DampedComb;
pub use delay::{Interpolation, InterpolatedDelay};
pub use effect::{Chain, Effect, EffectExt};
pub use effect_with_params::EffectWithParams;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{
    cubic_clip, db_to_linear, flush_denormal, linear_to_db, ms_to_samples, soft_saturate,
    wet_dry_mix,
};
pub use one_pole::OnePole;
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamUnit, ParameterInfo};
