//! Audio-thread side of the engine: rebuilds and runs the node graph.

use tracing::debug;

use crate::node::EffectNode;
use crate::shared::{EngineShared, SlotSnapshot};
use crate::{MAX_SLOTS, SLOT_STRIDE, TOTAL_PARAMS};

/// Owns the live effect nodes and drives them from the audio callback.
///
/// The scheduler is single-owner audio-thread state; everything it shares
/// with other threads goes through [`EngineShared`]. `process_block` first
/// honors a pending rebuild, then diffs shared parameter values against its
/// local cache, then runs the chain node-major so each effect's channels
/// stay adjacent in time.
///
/// Rebuilds allocate, so they happen in the callback turn that observes the
/// flag rather than spreading the work across turns; chains are short and
/// rebuilds are user-paced, which keeps the worst case bounded.
pub struct GraphScheduler {
    shared: EngineShared,
    nodes: Vec<EffectNode>,
    param_cache: Vec<f32>,
    sample_rate: f32,
    num_channels: usize,
}

impl GraphScheduler {
    /// Create a scheduler with no live nodes.
    pub fn new(shared: EngineShared) -> Self {
        Self {
            shared,
            nodes: Vec::new(),
            param_cache: vec![0.0; TOTAL_PARAMS],
            sample_rate: 48_000.0,
            num_channels: 2,
        }
    }

    /// Adopt the host configuration and rebuild the graph from scratch.
    pub fn prepare(&mut self, sample_rate: f32, num_channels: usize) {
        self.sample_rate = sample_rate;
        self.num_channels = num_channels;
        // Take the flag before rebuilding, same order as process_block: a
        // mutation landing after the rebuild's chain snapshot re-raises the
        // flag and is picked up by the next callback instead of being lost.
        self.shared.take_rebuild();
        self.rebuild();
    }

    /// Kinds of the currently live nodes, in processing order.
    pub fn node_kinds(&self) -> Vec<autofx_catalog::EffectKind> {
        self.nodes.iter().map(EffectNode::kind).collect()
    }

    /// Clear every node's internal state (delay lines, LFO phases).
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    /// Process one block of audio in place.
    ///
    /// `buffers` holds one slice per channel, all the same length. With an
    /// empty chain the buffers pass through untouched.
    pub fn process_block(&mut self, buffers: &mut [&mut [f32]]) {
        if self.shared.take_rebuild() {
            self.rebuild();
        }
        self.sync_params();

        let channels = self.num_channels.min(buffers.len());
        for node in &mut self.nodes {
            for (ch, buffer) in buffers.iter_mut().enumerate().take(channels) {
                node.process_channel(ch, buffer);
            }
        }
    }

    /// Tear down the live nodes and materialize the desired chain.
    ///
    /// Slots that keep their kind across the rebuild keep their parameter
    /// values; newly occupied slots start at descriptor defaults.
    fn rebuild(&mut self) {
        let kinds = self.shared.chain().snapshot();
        let prev_slots = self.shared.load_slots();

        self.nodes.clear();
        let mut slots = Vec::with_capacity(MAX_SLOTS);

        for (slot, &kind) in kinds.iter().enumerate().take(MAX_SLOTS) {
            let mut node = EffectNode::new(kind, self.sample_rate, self.num_channels);
            if let Err(err) = node.prepare(self.sample_rate) {
                debug!(slot, %kind, %err, "node failed to prepare, bypassing");
            }

            let kept = prev_slots.get(slot).is_some_and(|s| s.kind == Some(kind));
            for param in 0..node.param_count() {
                let flat = slot * SLOT_STRIDE + param;
                if kept {
                    node.set_param(param, self.shared.get_param_raw(flat));
                } else if let Some(desc) = node.descriptors().get(param) {
                    self.shared.set_param_raw(flat, desc.default);
                    node.set_param(param, desc.default);
                }
                self.param_cache[flat] = self.shared.get_param_raw(flat);
            }

            slots.push(SlotSnapshot::occupied(kind, node.descriptors().to_vec()));
            self.nodes.push(node);
        }
        while slots.len() < MAX_SLOTS {
            slots.push(SlotSnapshot::empty());
        }

        self.shared.store_slots(slots);
        self.shared.mark_ui_chain_changed();
        debug!(nodes = self.nodes.len(), "graph rebuilt");
    }

    /// Push shared parameter edits into the live nodes.
    ///
    /// Values are compared bit-for-bit so an unchanged parameter costs one
    /// atomic load per block.
    fn sync_params(&mut self) {
        for (slot, node) in self.nodes.iter_mut().enumerate() {
            for param in 0..node.param_count() {
                let flat = slot * SLOT_STRIDE + param;
                let shared_val = self.shared.get_param_raw(flat);
                if shared_val.to_bits() != self.param_cache[flat].to_bits() {
                    node.set_param(param, shared_val);
                    self.param_cache[flat] = shared_val;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SlotParamId;
    use autofx_catalog::EffectKind;

    fn run_block(scheduler: &mut GraphScheduler, left: &mut [f32], right: &mut [f32]) {
        let mut buffers: [&mut [f32]; 2] = [left, right];
        scheduler.process_block(&mut buffers);
    }

    #[test]
    fn empty_chain_passes_through() {
        let shared = EngineShared::new();
        let mut scheduler = GraphScheduler::new(shared);
        scheduler.prepare(48_000.0, 2);

        let mut left = vec![0.0_f32; 64];
        let mut right = vec![0.0_f32; 64];
        left[0] = 1.0;
        right[0] = -1.0;
        run_block(&mut scheduler, &mut left, &mut right);

        assert_eq!(left[0], 1.0);
        assert_eq!(right[0], -1.0);
        assert!(left[1..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn rebuild_materializes_appended_kinds() {
        let shared = EngineShared::new();
        let mut scheduler = GraphScheduler::new(shared.clone());
        scheduler.prepare(48_000.0, 2);

        shared.append_kind(EffectKind::FeedbackDelay);
        shared.append_kind(EffectKind::Chorus);

        let mut left = vec![0.0_f32; 32];
        let mut right = vec![0.0_f32; 32];
        run_block(&mut scheduler, &mut left, &mut right);

        assert_eq!(
            scheduler.node_kinds(),
            vec![EffectKind::FeedbackDelay, EffectKind::Chorus]
        );
        let slots = shared.load_slots();
        assert_eq!(slots[0].kind, Some(EffectKind::FeedbackDelay));
        assert_eq!(slots[1].kind, Some(EffectKind::Chorus));
        assert!(!slots[2].active());
    }

    #[test]
    fn rebuild_initializes_defaults_and_preserves_kept_slots() {
        let shared = EngineShared::new();
        let mut scheduler = GraphScheduler::new(shared.clone());
        scheduler.prepare(48_000.0, 2);

        shared.append_kind(EffectKind::Tremolo);
        let mut left = vec![0.0_f32; 16];
        let mut right = vec![0.0_f32; 16];
        run_block(&mut scheduler, &mut left, &mut right);

        // Slot 0 param 1 is depth, default 50.
        let depth = SlotParamId::new(0, 1).unwrap();
        assert_eq!(shared.get_param(depth), 50.0);

        // Edit it, append a second effect, and rebuild: the edit survives.
        shared.set_param(depth, 90.0);
        shared.append_kind(EffectKind::Reverb);
        run_block(&mut scheduler, &mut left, &mut right);
        assert_eq!(shared.get_param(depth), 90.0);
    }

    #[test]
    fn param_edits_reach_live_nodes() {
        let shared = EngineShared::new();
        let mut scheduler = GraphScheduler::new(shared.clone());
        scheduler.prepare(48_000.0, 1);

        shared.append_kind(EffectKind::Tremolo);
        let mut mono = vec![0.5_f32; 64];
        {
            let mut buffers: [&mut [f32]; 1] = [&mut mono];
            scheduler.process_block(&mut buffers);
        }

        // Full depth at a fast rate makes the gain dip well below unity.
        shared.set_param(SlotParamId::new(0, 0).unwrap(), 20.0);
        shared.set_param(SlotParamId::new(0, 1).unwrap(), 100.0);
        let mut mono = vec![0.5_f32; 4800];
        {
            let mut buffers: [&mut [f32]; 1] = [&mut mono];
            scheduler.process_block(&mut buffers);
        }
        let min = mono.iter().copied().fold(f32::INFINITY, f32::min);
        assert!(min < 0.1, "tremolo depth edit not applied, min {min}");
    }

    #[test]
    fn prepare_racing_append_never_loses_the_mutation() {
        for _ in 0..50 {
            let shared = EngineShared::new();
            let mut scheduler = GraphScheduler::new(shared.clone());

            let appender = {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    shared.append_kind(EffectKind::Chorus);
                })
            };
            scheduler.prepare(48_000.0, 2);
            appender.join().unwrap();

            // Whatever the interleaving, the first callback after the
            // append completes must materialize it.
            let mut left = vec![0.0_f32; 16];
            let mut right = vec![0.0_f32; 16];
            run_block(&mut scheduler, &mut left, &mut right);
            assert_eq!(scheduler.node_kinds(), vec![EffectKind::Chorus]);
        }
    }

    #[test]
    fn clear_returns_to_passthrough() {
        let shared = EngineShared::new();
        let mut scheduler = GraphScheduler::new(shared.clone());
        scheduler.prepare(48_000.0, 2);

        shared.append_kind(EffectKind::Reverb);
        shared.append_kind(EffectKind::Flanger);
        shared.append_kind(EffectKind::Phaser);
        let mut left = vec![0.1_f32; 32];
        let mut right = vec![0.1_f32; 32];
        run_block(&mut scheduler, &mut left, &mut right);
        assert_eq!(scheduler.node_kinds().len(), 3);

        shared.clear_chain();
        let mut left = vec![0.25_f32; 32];
        let mut right = vec![0.25_f32; 32];
        run_block(&mut scheduler, &mut left, &mut right);
        assert!(scheduler.node_kinds().is_empty());
        assert!(left.iter().all(|&s| s == 0.25));
        assert!(right.iter().all(|&s| s == 0.25));
    }
}
