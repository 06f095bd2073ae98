//! Parameter smoothing for zipper-free changes.
//!
//! Audio parameters (rate, depth, mix, ...) need smooth transitions to avoid
//! audible "zipper noise" when the UI or automation moves them. This module
//! provides [`SmoothedParam`], a one-pole exponential smoother advanced once
//! per sample in the processing loop.

use libm::expf;

/// A parameter with built-in exponential smoothing.
///
/// Uses a one-pole lowpass on the target value:
/// `y[n] = y[n-1] + coeff * (target - y[n-1])`. The coefficient is derived
/// from a time constant so a 10 ms smoothing time settles (99.3%) in ~50 ms.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    /// Current smoothed value
    current: f32,
    /// Target value we're smoothing towards
    target: f32,
    /// Smoothing coefficient (1 = instant, ~0 = very slow)
    coeff: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Smoothing time in milliseconds
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create a smoothed parameter with full configuration.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate,
            smoothing_time_ms,
        };
        param.recalculate_coeff();
        param
    }

    /// Create a parameter with the standard 10 ms smoothing time.
    ///
    /// 10 ms is fast enough to track UI gestures while staying click-free,
    /// and is what the built-in effects use unless they need slower motion
    /// (delay times smooth over 50 ms to avoid pitch artifacts).
    pub fn standard(initial: f32, sample_rate: f32) -> Self {
        Self::with_config(initial, sample_rate, 10.0)
    }

    /// Set the target value; the parameter smooths towards it.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and immediately snap to it (no smoothing).
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update sample rate and recalculate the smoothing coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Get the next smoothed value (advances by one sample).
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current smoothed value, without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// The target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Skip ahead to the target value immediately.
    ///
    /// Used on reset so stale ramps don't bleed into a fresh stream.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// Derive the one-pole coefficient from the time constant:
    /// `coeff = 1 - exp(-1 / (tau * sample_rate))` with
    /// `tau = smoothing_time_ms / 1000`. Zero smoothing time means instant.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples = (self.smoothing_time_ms / 1000.0) * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::with_config(0.0, 48000.0, 0.0)
    }
}
