//! Audio effect implementations for the autofx dynamic chain.
//!
//! One transform per classifier output kind:
//!
//! - [`Dry`] - identity passthrough
//! - [`FeedbackDelay`] - echo with regeneration
//! - [`SlapbackDelay`] - single short rockabilly-style echo
//! - [`Reverb`] - Schroeder comb/allpass room simulation
//! - [`Chorus`] - dual-voice modulated delay
//! - [`Flanger`] - short modulated delay with feedback
//! - [`Phaser`] - cascaded-allpass notch sweep
//! - [`Tremolo`] - LFO amplitude modulation
//! - [`Vibrato`] - LFO pitch modulation (fully wet modulated delay)
//! - [`Distortion`] - tanh waveshaping with tone control
//! - [`Overdrive`] - softer cubic clipping with tone control
//!
//! Every effect implements [`Effect`](autofx_core::Effect) (mono,
//! per-sample, allocation-free processing) and
//! [`ParameterInfo`](autofx_core::ParameterInfo) (index-based parameter
//! access with descriptors for UI binding).

#![cfg_attr(not(feature = "std"), no_std)]

pub mod chorus;
pub mod delay;
pub mod distortion;
pub mod dry;
pub mod flanger;
pub mod overdrive;
pub mod phaser;
pub mod reverb;
pub mod tremolo;
pub mod vibrato;

pub use chorus::Chorus;
pub use delay::{FeedbackDelay, SlapbackDelay};
pub use distortion::Distortion;
pub use dry::Dry;
pub use flanger::Flanger;
pub use overdrive::Overdrive;
pub use phaser::Phaser;
pub use reverb::Reverb;
pub use tremolo::Tremolo;
pub use vibrato::Vibrato;
