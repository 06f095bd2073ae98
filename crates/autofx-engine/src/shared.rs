//! Thread-safe shared state bridging the audio, worker, and UI threads.
//!
//! [`EngineShared`] is the single crossing point: the chain and slot
//! metadata are published via `ArcSwap` for wait-free reads, parameter
//! values live in a flat `AtomicU32` array indexed by
//! [`SlotParamId`](crate::SlotParamId), and everything else is a plain
//! atomic flag. Nothing here blocks, so every method is safe to call from
//! the real-time callback.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use arc_swap::ArcSwap;
use autofx_catalog::EffectKind;
use autofx_core::ParamDescriptor;

use crate::chain::EffectChain;
use crate::{MAX_SLOTS, SlotParamId, TOTAL_PARAMS};

/// Stage of the classification pipeline, polled by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ProcessState {
    /// No classification has run yet.
    #[default]
    Idle = 0,
    /// A target file is being decoded and classified.
    Processing = 1,
    /// The last classification appended an effect.
    Succeeded = 2,
    /// The last classification failed; the chain is unchanged.
    Failed = 3,
}

impl ProcessState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ProcessState::Processing,
            2 => ProcessState::Succeeded,
            3 => ProcessState::Failed,
            _ => ProcessState::Idle,
        }
    }
}

/// Published metadata for one chain slot.
///
/// Rebuilds publish a fresh `Vec<SlotSnapshot>` so the presentation layer
/// can bind controls without touching the live nodes.
#[derive(Clone, Debug)]
pub struct SlotSnapshot {
    /// The kind occupying this slot, or `None` if vacant.
    pub kind: Option<EffectKind>,
    /// Parameter descriptors for the occupying effect.
    pub descriptors: Vec<ParamDescriptor>,
}

impl SlotSnapshot {
    /// A vacant slot.
    pub fn empty() -> Self {
        Self {
            kind: None,
            descriptors: Vec::new(),
        }
    }

    /// An occupied slot.
    pub fn occupied(kind: EffectKind, descriptors: Vec<ParamDescriptor>) -> Self {
        Self {
            kind: Some(kind),
            descriptors,
        }
    }

    /// Whether the slot holds an effect.
    pub fn active(&self) -> bool {
        self.kind.is_some()
    }
}

struct EngineSharedData {
    /// Desired effect sequence.
    chain: EffectChain,

    /// Set after any chain mutation; taken by the audio thread, which then
    /// rebuilds within the same callback turn.
    rebuild_pending: AtomicBool,

    /// Classification pipeline stage.
    process_state: AtomicU8,

    /// Poll-and-clear: the classification state changed.
    ui_state_changed: AtomicBool,

    /// Poll-and-clear: the chain topology changed.
    ui_chain_changed: AtomicBool,

    /// Parameter values as f32 bit-cast to u32, indexed by `SlotParamId`.
    values: [AtomicU32; TOTAL_PARAMS],

    /// Slot metadata, republished on every rebuild.
    slots: ArcSwap<Vec<SlotSnapshot>>,
}

/// Cloneable handle to the engine's shared state.
///
/// # Thread safety
///
/// - Chain and slot metadata: `ArcSwap` — wait-free reads, lock-free writes.
/// - Parameter values, flags, process state: atomics.
///
/// No method blocks; all are callable from the audio thread.
#[derive(Clone)]
pub struct EngineShared {
    inner: Arc<EngineSharedData>,
}

impl Default for EngineShared {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineShared {
    /// Create shared state with an empty chain and `Idle` process state.
    pub fn new() -> Self {
        let empty_slots: Vec<SlotSnapshot> = (0..MAX_SLOTS).map(|_| SlotSnapshot::empty()).collect();
        Self {
            inner: Arc::new(EngineSharedData {
                chain: EffectChain::new(),
                rebuild_pending: AtomicBool::new(false),
                process_state: AtomicU8::new(ProcessState::Idle as u8),
                ui_state_changed: AtomicBool::new(false),
                ui_chain_changed: AtomicBool::new(false),
                values: core::array::from_fn(|_| AtomicU32::new(0)),
                slots: ArcSwap::from_pointee(empty_slots),
            }),
        }
    }

    // ── Chain ───────────────────────────────────────────────────────────────

    /// The desired effect sequence.
    pub fn chain(&self) -> &EffectChain {
        &self.inner.chain
    }

    /// Append a kind and mark the graph for rebuild.
    pub fn append_kind(&self, kind: EffectKind) -> usize {
        let len = self.inner.chain.append(kind);
        self.mark_rebuild();
        len
    }

    /// Clear the chain and mark the graph for rebuild.
    pub fn clear_chain(&self) {
        self.inner.chain.clear();
        self.mark_rebuild();
    }

    // ── Rebuild flag ────────────────────────────────────────────────────────

    /// Request a rebuild on the next callback.
    pub fn mark_rebuild(&self) {
        self.inner.rebuild_pending.store(true, Ordering::Release);
    }

    /// Atomically check and clear the rebuild flag (audio thread).
    pub fn take_rebuild(&self) -> bool {
        self.inner.rebuild_pending.swap(false, Ordering::AcqRel)
    }

    /// Whether a rebuild is pending, without clearing.
    pub fn rebuild_pending(&self) -> bool {
        self.inner.rebuild_pending.load(Ordering::Acquire)
    }

    // ── Process state ───────────────────────────────────────────────────────

    /// Current classification pipeline stage.
    pub fn process_state(&self) -> ProcessState {
        ProcessState::from_u8(self.inner.process_state.load(Ordering::Acquire))
    }

    /// Update the pipeline stage and raise the state-changed UI flag.
    pub fn set_process_state(&self, state: ProcessState) {
        self.inner
            .process_state
            .store(state as u8, Ordering::Release);
        self.inner.ui_state_changed.store(true, Ordering::Release);
    }

    // ── UI flags (poll-and-clear) ──────────────────────────────────────────

    /// Check and clear the classification-state-changed flag.
    pub fn take_ui_state_changed(&self) -> bool {
        self.inner.ui_state_changed.swap(false, Ordering::AcqRel)
    }

    /// Raise the chain-changed flag.
    pub fn mark_ui_chain_changed(&self) {
        self.inner.ui_chain_changed.store(true, Ordering::Release);
    }

    /// Check and clear the chain-changed flag.
    pub fn take_ui_chain_changed(&self) -> bool {
        self.inner.ui_chain_changed.swap(false, Ordering::AcqRel)
    }

    // ── Parameter values ────────────────────────────────────────────────────

    /// Read a parameter value.
    pub fn get_param(&self, id: SlotParamId) -> f32 {
        f32::from_bits(self.inner.values[id.raw() as usize].load(Ordering::Acquire))
    }

    /// Write a parameter value, clamped to the slot's descriptor range when
    /// the slot is occupied.
    pub fn set_param(&self, id: SlotParamId, value: f32) {
        let slots = self.inner.slots.load();
        let clamped = slots
            .get(id.slot())
            .and_then(|s| s.descriptors.get(id.param()))
            .map_or(value, |desc| desc.clamp(value));
        self.inner.values[id.raw() as usize].store(clamped.to_bits(), Ordering::Release);
    }

    /// Raw read by flat index (audio-thread diff sync).
    pub(crate) fn get_param_raw(&self, flat: usize) -> f32 {
        f32::from_bits(self.inner.values[flat].load(Ordering::Acquire))
    }

    /// Raw write by flat index, no clamping.
    pub(crate) fn set_param_raw(&self, flat: usize, value: f32) {
        self.inner.values[flat].store(value.to_bits(), Ordering::Release);
    }

    /// Set a slot's values to its descriptor defaults.
    pub fn init_slot_defaults(&self, slot: usize, descriptors: &[ParamDescriptor]) {
        for (param, desc) in descriptors.iter().enumerate() {
            if let Some(id) = SlotParamId::new(slot, param) {
                self.inner.values[id.raw() as usize]
                    .store(desc.default.to_bits(), Ordering::Release);
            }
        }
    }

    // ── Slot metadata ───────────────────────────────────────────────────────

    /// Load the published slot snapshots (wait-free).
    pub fn load_slots(&self) -> Arc<Vec<SlotSnapshot>> {
        self.inner.slots.load_full()
    }

    /// Publish fresh slot metadata after a rebuild.
    pub fn store_slots(&self, slots: Vec<SlotSnapshot>) {
        self.inner.slots.store(Arc::new(slots));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_empty() {
        let shared = EngineShared::new();
        assert_eq!(shared.process_state(), ProcessState::Idle);
        assert_eq!(shared.chain().len(), 0);
        assert!(!shared.rebuild_pending());
        assert!(!shared.take_ui_state_changed());
        assert!(!shared.take_ui_chain_changed());
    }

    #[test]
    fn append_marks_rebuild() {
        let shared = EngineShared::new();
        assert_eq!(shared.append_kind(EffectKind::Reverb), 1);
        assert!(shared.take_rebuild());
        // Taken exactly once.
        assert!(!shared.take_rebuild());
    }

    #[test]
    fn clear_marks_rebuild() {
        let shared = EngineShared::new();
        shared.append_kind(EffectKind::Chorus);
        shared.take_rebuild();
        shared.clear_chain();
        assert!(shared.take_rebuild());
        assert_eq!(shared.chain().len(), 0);
    }

    #[test]
    fn process_state_raises_ui_flag() {
        let shared = EngineShared::new();
        shared.set_process_state(ProcessState::Processing);
        assert_eq!(shared.process_state(), ProcessState::Processing);
        assert!(shared.take_ui_state_changed());
        assert!(!shared.take_ui_state_changed());
    }

    #[test]
    fn param_round_trip() {
        let shared = EngineShared::new();
        let id = SlotParamId::new(2, 1).unwrap();
        shared.set_param(id, 42.0);
        assert_eq!(shared.get_param(id), 42.0);
    }

    #[test]
    fn param_clamps_to_descriptor_when_occupied() {
        let shared = EngineShared::new();
        let mut slots: Vec<SlotSnapshot> = (0..MAX_SLOTS).map(|_| SlotSnapshot::empty()).collect();
        slots[0] = SlotSnapshot::occupied(EffectKind::Chorus, vec![ParamDescriptor::mix()]);
        shared.store_slots(slots);

        let id = SlotParamId::new(0, 0).unwrap();
        shared.set_param(id, 500.0);
        assert_eq!(shared.get_param(id), 100.0);
        shared.set_param(id, -10.0);
        assert_eq!(shared.get_param(id), 0.0);
    }

    #[test]
    fn defaults_initialize_slot() {
        let shared = EngineShared::new();
        let descs = vec![ParamDescriptor::mix(), ParamDescriptor::feedback()];
        shared.init_slot_defaults(1, &descs);
        assert_eq!(shared.get_param(SlotParamId::new(1, 0).unwrap()), 50.0);
        assert_eq!(shared.get_param(SlotParamId::new(1, 1).unwrap()), 40.0);
    }
}
