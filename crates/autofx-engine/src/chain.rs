//! The desired effect sequence, shared lock-free between threads.

use std::sync::Arc;

use arc_swap::ArcSwap;
use autofx_catalog::EffectKind;

use crate::MAX_SLOTS;

/// Ordered sequence of effect kinds, mutated by the worker and the
/// presentation layer, snapshotted by the audio thread.
///
/// Every mutation publishes a fresh immutable `Vec` through `ArcSwap`, so
/// [`snapshot`](Self::snapshot) is linearizable: a reader sees either the
/// state before a mutation or after it, never a half-appended sequence.
pub struct EffectChain {
    kinds: ArcSwap<Vec<EffectKind>>,
}

impl Default for EffectChain {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            kinds: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Append a kind at the tail and return the new length.
    ///
    /// Appends beyond [`MAX_SLOTS`] are ignored; the chain is full and the
    /// result is the unchanged length.
    pub fn append(&self, kind: EffectKind) -> usize {
        let prev = self.kinds.rcu(|current| {
            if current.len() >= MAX_SLOTS {
                return Arc::clone(current);
            }
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend_from_slice(current);
            next.push(kind);
            Arc::new(next)
        });
        (prev.len() + 1).min(MAX_SLOTS)
    }

    /// Empty the sequence.
    pub fn clear(&self) {
        self.kinds.store(Arc::new(Vec::new()));
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.kinds.load().len()
    }

    /// Whether the chain has no entries.
    pub fn is_empty(&self) -> bool {
        self.kinds.load().is_empty()
    }

    /// Kind at `index`, or `None` past the end.
    pub fn kind_at(&self, index: usize) -> Option<EffectKind> {
        self.kinds.load().get(index).copied()
    }

    /// Immutable snapshot of the full sequence.
    pub fn snapshot(&self) -> Arc<Vec<EffectKind>> {
        self.kinds.load_full()
    }
}
