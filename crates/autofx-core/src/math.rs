//! Shared math helpers for DSP code.
//!
//! Conversions and small waveshaping utilities used across the effects.
//! Everything here is `no_std`-safe via `libm`.

use libm::{log10f, powf, tanhf};

/// Convert decibels to linear gain. `0 dB -> 1.0`, `-6 dB -> ~0.5`.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    powf(10.0, db / 20.0)
}

/// Convert linear gain to decibels. Gains at or below zero clamp to -100 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -100.0
    } else {
        20.0 * log10f(linear)
    }
}

/// Convert a time in milliseconds to (fractional) samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    (ms / 1000.0) * sample_rate
}

/// Flush denormal-range values to zero.
///
/// Feedback paths (delays, combs) decay into the denormal range where some
/// CPUs fall off a performance cliff. Anything below 1e-20 is inaudible.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Equal-weight wet/dry blend. `mix` in [0, 1]; 0 is fully dry.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// Smooth symmetric saturation via tanh.
#[inline]
pub fn soft_saturate(x: f32) -> f32 {
    tanhf(x)
}

/// Cubic soft clipper, linear below the knee, hard-limited at ±1.
///
/// `f(x) = 1.5x - 0.5x³` for |x| <= 1, ±1 beyond. Classic overdrive shape.
#[inline]
pub fn cubic_clip(x: f32) -> f32 {
    if x >= 1.0 {
        1.0
    } else if x <= -1.0 {
        -1.0
    } else {
        1.5 * x - 0.5 * x * x * x
    }
}
