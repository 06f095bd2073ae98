//! Core Effect trait and the serial chain combinator.
//!
//! The [`Effect`] trait is the uniform contract every autofx transform
//! implements. Processing is mono and per-sample; the engine runs one
//! instance per audio channel, so effects never need to know the channel
//! layout. Block helpers exist for offline processing and tests.
//!
//! ## Design Decisions
//!
//! - **Mono processing**: a single `f32` in/out keeps effect state simple.
//!   Stereo is handled above this trait by duplicating instances.
//! - **Object-safe**: the trait supports `dyn Effect` so the catalog can
//!   hand out boxed instances chosen at runtime.
//! - **No allocations**: every method is callable from a real-time audio
//!   context. State is sized at construction or in `set_sample_rate`.

/// Uniform lifecycle contract for all audio effects.
///
/// An effect advances its internal DSP state one sample at a time.
/// `set_sample_rate` must be called before processing whenever the audio
/// format changes; `reset` clears state without touching parameters.
pub trait Effect {
    /// Process a single sample, advancing internal state by one tick.
    ///
    /// Input is typically in `[-1.0, 1.0]`; output is the transformed sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples in-place.
    ///
    /// Default implementation calls [`process`](Self::process) per sample.
    /// Effects may override for more efficient block processing.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate.
    ///
    /// Effects recalculate rate-dependent state here (delay lengths in
    /// samples, filter coefficients, LFO increments). Existing audio state
    /// may be discarded; callers follow this with [`reset`](Self::reset).
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state (delay lines, filter history) without changing
    /// parameters. Called when playback resumes or the effect is re-wired,
    /// so stale audio never leaks into the new stream.
    fn reset(&mut self);

    /// Processing latency in samples. Most effects report 0.
    fn latency_samples(&self) -> usize {
        0
    }
}

/// Extension trait for chaining effects with static dispatch.
pub trait EffectExt: Effect + Sized {
    /// Chain this effect with another; `self`'s output feeds `next`'s input.
    fn chain<E: Effect>(self, next: E) -> Chain<Self, E> {
        Chain {
            first: self,
            second: next,
        }
    }
}

impl<T: Effect> EffectExt for T {}

/// Two effects in series, created by [`EffectExt::chain`].
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A: Effect, B: Effect> Effect for Chain<A, B> {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mid = self.first.process(input);
        self.second.process(mid)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.first.set_sample_rate(sample_rate);
        self.second.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    fn latency_samples(&self) -> usize {
        self.first.latency_samples() + self.second.latency_samples()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gain(f32);

    impl Effect for Gain {
        fn process(&mut self, input: f32) -> f32 {
            input * self.0
        }
        fn set_sample_rate(&mut self, _: f32) {}
        fn reset(&mut self) {}
    }

    #[test]
    fn chain_multiplies_gains() {
        let mut chain = Gain(2.0).chain(Gain(3.0));
        assert_eq!(chain.process(1.0), 6.0);
    }

    #[test]
    fn block_inplace_matches_per_sample() {
        let mut a = Gain(0.5);
        let mut buf = [1.0, -2.0, 4.0];
        a.process_block_inplace(&mut buf);
        assert_eq!(buf, [0.5, -1.0, 2.0]);
    }

    #[test]
    fn chain_sums_latency() {
        struct Latent(usize);
        impl Effect for Latent {
            fn process(&mut self, input: f32) -> f32 {
                input
            }
            fn set_sample_rate(&mut self, _: f32) {}
            fn reset(&mut self) {}
            fn latency_samples(&self) -> usize {
                self.0
            }
        }
        let chain = Latent(10).chain(Latent(5));
        assert_eq!(chain.latency_samples(), 15);
    }
}
