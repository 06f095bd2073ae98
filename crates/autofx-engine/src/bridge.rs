//! Host-facing facade tying the shared state, scheduler, and worker together.

use std::path::PathBuf;
use std::sync::Arc;

use autofx_classify::{Classifier, is_supported_extension};
use tracing::{info, warn};

use crate::node::PrepareError;
use crate::scheduler::GraphScheduler;
use crate::shared::{EngineShared, ProcessState, SlotSnapshot};
use crate::worker::ClassificationWorker;
use crate::MAX_CHANNELS;

/// The engine as a host plugs it in: one object to prepare, feed audio, and
/// hand target files.
///
/// `process_block` is the only method meant for the audio thread; everything
/// else belongs to the host's main thread. The worker thread is spawned on
/// construction and joined on drop.
pub struct HostBridge {
    shared: EngineShared,
    scheduler: GraphScheduler,
    worker: ClassificationWorker,
    block_size: usize,
}

impl HostBridge {
    /// Build an engine around the given classifier.
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        let shared = EngineShared::new();
        let scheduler = GraphScheduler::new(shared.clone());
        let worker = ClassificationWorker::spawn(shared.clone(), classifier);
        Self {
            shared,
            scheduler,
            worker,
            block_size: 0,
        }
    }

    /// Adopt the host's playback configuration.
    ///
    /// Must be called before the first `process_block`; rebuilds the graph
    /// at the new rate.
    pub fn prepare(
        &mut self,
        sample_rate: f32,
        max_block_size: usize,
        num_channels: usize,
    ) -> Result<(), PrepareError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(PrepareError::InvalidSampleRate(sample_rate));
        }
        if num_channels == 0 || num_channels > MAX_CHANNELS {
            return Err(PrepareError::UnsupportedChannelCount(num_channels));
        }
        self.block_size = max_block_size;
        self.scheduler.prepare(sample_rate, num_channels);
        info!(sample_rate, max_block_size, num_channels, "engine prepared");
        Ok(())
    }

    /// Process one block in place, one slice per channel.
    pub fn process_block(&mut self, buffers: &mut [&mut [f32]]) {
        self.scheduler.process_block(buffers);
    }

    /// Queue an audio file for classification.
    ///
    /// Files with unsupported extensions are rejected here without waking
    /// the worker; the worker re-checks before decoding anyway.
    pub fn set_target(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !is_supported_extension(&path) {
            warn!(path = %path.display(), "unsupported file extension");
            self.shared.set_process_state(ProcessState::Failed);
            return;
        }
        self.worker.set_target(path);
    }

    /// Drop every effect and return to passthrough.
    pub fn reset(&mut self) {
        self.shared.clear_chain();
        self.shared.mark_ui_chain_changed();
        info!("chain cleared");
    }

    /// Current classification pipeline stage.
    pub fn process_state(&self) -> ProcessState {
        self.shared.process_state()
    }

    /// Number of effects in the desired chain.
    pub fn chain_len(&self) -> usize {
        self.shared.chain().len()
    }

    /// Published metadata for one slot, if occupied.
    pub fn slot_at(&self, index: usize) -> Option<SlotSnapshot> {
        self.shared
            .load_slots()
            .get(index)
            .filter(|s| s.active())
            .cloned()
    }

    /// Maximum block size the host declared at prepare time.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Handle to the shared state, for the presentation layer.
    pub fn shared(&self) -> EngineShared {
        self.shared.clone()
    }
}
