//! Dynamic effect-chain engine.
//!
//! The engine owns a linear chain of effect nodes between the host's input
//! and output, rebuilds the chain in response to asynchronous classification
//! results, and guarantees the real-time callback never blocks, never takes
//! a lock, and never observes a half-built chain.
//!
//! # Architecture
//!
//! ```text
//! Presentation layer     Audio thread             Worker thread
//! ──────────────────     ────────────             ─────────────
//! set_target(file)  ──►  process_block():         waits on condvar
//! polls ProcessState       take rebuild flag      decode → resample
//! polls UI flags           rebuild nodes          classify (watchdog)
//! writes params            sync params            append kind + flag
//!                          run chain
//! ```
//!
//! All crossings go through [`EngineShared`]: `ArcSwap` snapshots for the
//! chain and slot metadata, atomics for flags and parameter values. The
//! worker's mailbox (a mutex + condvar) is touched only by the worker and
//! the presentation layer, never by the audio callback.

pub mod bridge;
pub mod chain;
pub mod node;
pub mod scheduler;
pub mod shared;
pub mod worker;

pub use bridge::HostBridge;
pub use chain::EffectChain;
pub use node::{EffectNode, PrepareError};
pub use scheduler::GraphScheduler;
pub use shared::{EngineShared, ProcessState, SlotSnapshot};
pub use worker::ClassificationWorker;

/// Maximum number of effect slots in the chain.
pub const MAX_SLOTS: usize = 16;

/// Parameter indices reserved per slot.
///
/// The largest effect exposes 4 parameters; 8 leaves headroom without
/// changing the flat layout.
pub const SLOT_STRIDE: usize = 8;

/// Total size of the flat parameter value array.
pub const TOTAL_PARAMS: usize = MAX_SLOTS * SLOT_STRIDE;

/// Maximum symmetric channel count the engine processes (mono or stereo).
pub const MAX_CHANNELS: usize = 2;

/// Validated address into the flat parameter space.
///
/// Encodes `slot * SLOT_STRIDE + param` in a single `u32`; constructed only
/// through the checked constructors, so any held value is in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotParamId(u32);

impl SlotParamId {
    /// Construct from slot and local parameter index.
    ///
    /// Returns `None` if `slot >= MAX_SLOTS` or `param >= SLOT_STRIDE`.
    pub const fn new(slot: usize, param: usize) -> Option<Self> {
        if slot >= MAX_SLOTS || param >= SLOT_STRIDE {
            return None;
        }
        Some(Self((slot * SLOT_STRIDE + param) as u32))
    }

    /// Construct from a raw flat index.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        if (raw as usize) >= TOTAL_PARAMS {
            return None;
        }
        Some(Self(raw))
    }

    /// The slot this parameter belongs to.
    pub const fn slot(self) -> usize {
        self.0 as usize / SLOT_STRIDE
    }

    /// The local parameter index within the slot.
    pub const fn param(self) -> usize {
        self.0 as usize % SLOT_STRIDE
    }

    /// Raw flat index.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_param_id_round_trip() {
        for slot in 0..MAX_SLOTS {
            for param in 0..SLOT_STRIDE {
                let id = SlotParamId::new(slot, param).unwrap();
                assert_eq!(id.slot(), slot);
                assert_eq!(id.param(), param);
                assert_eq!(SlotParamId::from_raw(id.raw()), Some(id));
            }
        }
    }

    #[test]
    fn slot_param_id_bounds() {
        assert!(SlotParamId::new(MAX_SLOTS, 0).is_none());
        assert!(SlotParamId::new(0, SLOT_STRIDE).is_none());
        assert!(SlotParamId::from_raw(TOTAL_PARAMS as u32).is_none());
    }

    #[test]
    fn constants_consistent() {
        assert_eq!(TOTAL_PARAMS, MAX_SLOTS * SLOT_STRIDE);
        assert!(MAX_CHANNELS <= 2);
    }
}
