//! Circular-buffer delay line with fractional-delay interpolation.
//!
//! The fundamental building block for every time-based effect in autofx:
//!
//! | Effect | Delay range | Modulated |
//! |----------|-------------|-----------|
//! | Flanger | 1-10 ms | yes |
//! | Chorus | 10-30 ms | yes |
//! | Vibrato | 2-10 ms | yes |
//! | Slapback | 60-160 ms | no |
//! | Echo | 100-2000 ms | no |
//! | Reverb comb | 20-100 ms | no |
//!
//! Modulated reads use fractional delay times; interpolation avoids the
//! zipper noise a truncating read would produce.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Interpolation method for fractional delay reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Truncate to the nearest sample (lowest CPU, static delays only).
    None,
    /// Linear interpolation between two samples (default).
    #[default]
    Linear,
}

/// Interpolated delay line over a heap-allocated circular buffer.
///
/// The buffer is allocated at construction and never reallocates; no
/// allocation happens during processing.
///
/// # Example
///
/// ```rust
/// use autofx_core::InterpolatedDelay;
///
/// // 50 ms max delay at 44.1 kHz
/// let mut delay = InterpolatedDelay::new((0.05 * 44100.0) as usize);
/// delay.write(1.0);
/// let out = delay.read(10.5); // fractional delay
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    /// Circular buffer storage
    buffer: Vec<f32>,
    /// Write position in buffer
    write_pos: usize,
    interpolation: Interpolation,
}

impl InterpolatedDelay {
    /// Create a delay line with the given maximum delay in samples.
    ///
    /// # Panics
    ///
    /// Panics if `max_delay_samples` is 0.
    pub fn new(max_delay_samples: usize) -> Self {
        assert!(max_delay_samples > 0, "Delay size must be > 0");
        Self {
            buffer: vec![0.0; max_delay_samples],
            write_pos: 0,
            interpolation: Interpolation::Linear,
        }
    }

    /// Set the interpolation method for fractional reads.
    pub fn set_interpolation(&mut self, interp: Interpolation) {
        self.interpolation = interp;
    }

    /// Read a delayed sample. `delay_samples` may be fractional and is
    /// clamped to the buffer capacity.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        debug_assert!(delay_samples >= 0.0);

        let len = self.buffer.len();
        let delay_clamped = delay_samples.min((len - 1) as f32);

        let delay_int = delay_clamped as usize;
        let frac = delay_clamped - delay_int as f32;

        // Points at the sample `delay_int` samples before the last written.
        let read_pos = (self.write_pos + len - delay_int - 1) % len;

        match self.interpolation {
            Interpolation::None => self.buffer[read_pos],
            Interpolation::Linear => {
                let next_pos = (read_pos + len - 1) % len;
                let a = self.buffer[read_pos];
                let b = self.buffer[next_pos];
                a + (b - a) * frac
            }
        }
    }

    /// Write a sample and advance the write position.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Clear the delay line to silence.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Maximum delay capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_delay_recalls_sample() {
        let mut delay = InterpolatedDelay::new(100);
        delay.write(1.0);
        for _ in 0..9 {
            delay.write(0.0);
        }
        // The 1.0 was written 10 samples ago (9 zeros after it).
        assert_eq!(delay.read(9.0), 1.0);
    }

    #[test]
    fn fractional_read_interpolates() {
        let mut delay = InterpolatedDelay::new(16);
        delay.write(0.0);
        delay.write(1.0);
        // Halfway between the last two writes.
        let v = delay.read(0.5);
        assert!((v - 0.5).abs() < 1e-6, "got {v}");
    }

    #[test]
    fn clear_silences() {
        let mut delay = InterpolatedDelay::new(8);
        for _ in 0..8 {
            delay.write(0.7);
        }
        delay.clear();
        for d in 0..8 {
            assert_eq!(delay.read(d as f32), 0.0);
        }
    }

    #[test]
    fn read_clamps_to_capacity() {
        let mut delay = InterpolatedDelay::new(4);
        delay.write(0.25);
        // Far beyond capacity: must not panic.
        let _ = delay.read(1000.0);
    }

    #[test]
    #[should_panic]
    fn zero_capacity_panics() {
        let _ = InterpolatedDelay::new(0);
    }
}
