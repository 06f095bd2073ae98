//! A single chain slot: one effect instance per channel.

use autofx_catalog::{EffectCatalog, EffectKind};
use autofx_core::{EffectWithParams, ParamDescriptor};

use crate::MAX_CHANNELS;

/// Error preparing a node for playback.
#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    /// The host reported a sample rate the effects cannot run at.
    #[error("invalid sample rate {0}")]
    InvalidSampleRate(f32),
    /// The host reported an unsupported channel layout.
    #[error("unsupported channel count {0} (expected 1 or {MAX_CHANNELS})")]
    UnsupportedChannelCount(usize),
}

/// One occupied chain slot.
///
/// Holds an independent effect instance per channel so stereo processing
/// never shares modulation or delay state between channels. A node that
/// failed to prepare is bypassed: it passes audio through untouched but
/// keeps its slot and parameters addressable.
pub struct EffectNode {
    kind: EffectKind,
    channels: Vec<Box<dyn EffectWithParams + Send>>,
    descriptors: Vec<ParamDescriptor>,
    bypassed: bool,
}

impl EffectNode {
    /// Instantiate a node with one effect per channel.
    pub fn new(kind: EffectKind, sample_rate: f32, num_channels: usize) -> Self {
        let channels: Vec<_> = (0..num_channels)
            .map(|_| EffectCatalog::create(kind, sample_rate))
            .collect();
        let descriptors = channels.first().map_or_else(Vec::new, |fx| {
            (0..fx.effect_param_count())
                .filter_map(|i| fx.effect_param_info(i))
                .collect()
        });
        Self {
            kind,
            channels,
            descriptors,
            bypassed: false,
        }
    }

    /// The kind occupying this node.
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Parameter descriptors for the effect (same for every channel).
    pub fn descriptors(&self) -> &[ParamDescriptor] {
        &self.descriptors
    }

    /// Number of parameters the effect exposes.
    pub fn param_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether this node is passing audio through untouched.
    pub fn bypassed(&self) -> bool {
        self.bypassed
    }

    /// Force the node into bypass.
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Reconfigure for a new sample rate and clear all state.
    ///
    /// On error the node is left bypassed.
    pub fn prepare(&mut self, sample_rate: f32) -> Result<(), PrepareError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            self.bypassed = true;
            return Err(PrepareError::InvalidSampleRate(sample_rate));
        }
        for fx in &mut self.channels {
            fx.set_sample_rate(sample_rate);
            fx.reset();
        }
        self.bypassed = false;
        Ok(())
    }

    /// Clear all channel state without reconfiguring.
    pub fn reset(&mut self) {
        for fx in &mut self.channels {
            fx.reset();
        }
    }

    /// Apply a parameter value to every channel.
    pub fn set_param(&mut self, index: usize, value: f32) {
        for fx in &mut self.channels {
            fx.effect_set_param(index, value);
        }
    }

    /// Read a parameter value (channel 0 is authoritative).
    pub fn get_param(&self, index: usize) -> f32 {
        self.channels.first().map_or(0.0, |fx| fx.effect_get_param(index))
    }

    /// Process one channel's buffer in place.
    ///
    /// Out-of-range channels and bypassed nodes leave the buffer untouched.
    pub fn process_channel(&mut self, channel: usize, buffer: &mut [f32]) {
        if self.bypassed {
            return;
        }
        if let Some(fx) = self.channels.get_mut(channel) {
            fx.process_block_inplace(buffer);
        }
    }
}
