//! Effect catalog for autofx: the closed set of effect kinds the
//! classifier can choose from, plus the factory that instantiates them.
//!
//! Each [`EffectKind`] carries a stable index matching the class order of
//! the classification model's output layer, so a predicted class maps to a
//! kind with [`EffectKind::from_index`] and nothing else. The catalog is
//! deliberately closed: adding a kind means retraining the model, so there
//! is no open registration API.
//!
//! # Example
//!
//! ```rust
//! use autofx_catalog::{EffectCatalog, EffectKind};
//!
//! let kind = EffectKind::from_index(3).unwrap();
//! assert_eq!(kind, EffectKind::Reverb);
//!
//! let mut reverb = EffectCatalog::create(kind, 48000.0);
//! let out = reverb.process(0.5);
//! assert!(out.is_finite());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use autofx_core::EffectWithParams;
use autofx_effects::{
    Chorus, Distortion, Dry, FeedbackDelay, Flanger, Overdrive, Phaser, Reverb, SlapbackDelay,
    Tremolo, Vibrato,
};

/// Category of effect, for grouping in a UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Delay and reverb.
    TimeBased,
    /// Chorus, flanger, phaser, tremolo, vibrato.
    Modulation,
    /// Distortion and overdrive.
    Distortion,
    /// Passthrough.
    Utility,
}

impl EffectCategory {
    /// Human-readable category name.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectCategory::TimeBased => "Time-Based",
            EffectCategory::Modulation => "Modulation",
            EffectCategory::Distortion => "Distortion",
            EffectCategory::Utility => "Utility",
        }
    }
}

/// The closed set of effects the classifier selects among.
///
/// Discriminants are the model's output class indices and must never be
/// reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EffectKind {
    /// No processing; unity passthrough.
    Dry = 0,
    /// Long echo with regeneration.
    FeedbackDelay = 1,
    /// Single short rockabilly echo.
    SlapbackDelay = 2,
    /// Algorithmic room reverb.
    Reverb = 3,
    /// Dual-voice chorus.
    Chorus = 4,
    /// Swept short delay with feedback.
    Flanger = 5,
    /// Four-stage allpass phaser.
    Phaser = 6,
    /// Amplitude modulation.
    Tremolo = 7,
    /// Pitch modulation.
    Vibrato = 8,
    /// Hard tanh distortion.
    Distortion = 9,
    /// Soft cubic overdrive.
    Overdrive = 10,
}

/// Number of effect kinds; equals the model's output dimension.
pub const KIND_COUNT: usize = 11;

/// All kinds in model class order.
pub const ALL_KINDS: [EffectKind; KIND_COUNT] = [
    EffectKind::Dry,
    EffectKind::FeedbackDelay,
    EffectKind::SlapbackDelay,
    EffectKind::Reverb,
    EffectKind::Chorus,
    EffectKind::Flanger,
    EffectKind::Phaser,
    EffectKind::Tremolo,
    EffectKind::Vibrato,
    EffectKind::Distortion,
    EffectKind::Overdrive,
];

impl EffectKind {
    /// Map a model class index to a kind. Returns `None` for indices
    /// outside `0..KIND_COUNT`.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(EffectKind::Dry),
            1 => Some(EffectKind::FeedbackDelay),
            2 => Some(EffectKind::SlapbackDelay),
            3 => Some(EffectKind::Reverb),
            4 => Some(EffectKind::Chorus),
            5 => Some(EffectKind::Flanger),
            6 => Some(EffectKind::Phaser),
            7 => Some(EffectKind::Tremolo),
            8 => Some(EffectKind::Vibrato),
            9 => Some(EffectKind::Distortion),
            10 => Some(EffectKind::Overdrive),
            _ => None,
        }
    }

    /// The model class index of this kind.
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Human-readable display name.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectKind::Dry => "Dry",
            EffectKind::FeedbackDelay => "Feedback Delay",
            EffectKind::SlapbackDelay => "Slapback Delay",
            EffectKind::Reverb => "Reverb",
            EffectKind::Chorus => "Chorus",
            EffectKind::Flanger => "Flanger",
            EffectKind::Phaser => "Phaser",
            EffectKind::Tremolo => "Tremolo",
            EffectKind::Vibrato => "Vibrato",
            EffectKind::Distortion => "Distortion",
            EffectKind::Overdrive => "Overdrive",
        }
    }

    /// Lowercase identifier, for CLI arguments and logs.
    pub const fn id(&self) -> &'static str {
        match self {
            EffectKind::Dry => "dry",
            EffectKind::FeedbackDelay => "feedback-delay",
            EffectKind::SlapbackDelay => "slapback-delay",
            EffectKind::Reverb => "reverb",
            EffectKind::Chorus => "chorus",
            EffectKind::Flanger => "flanger",
            EffectKind::Phaser => "phaser",
            EffectKind::Tremolo => "tremolo",
            EffectKind::Vibrato => "vibrato",
            EffectKind::Distortion => "distortion",
            EffectKind::Overdrive => "overdrive",
        }
    }

    /// Look up a kind from its lowercase identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        ALL_KINDS.iter().copied().find(|k| k.id() == id)
    }

    /// UI grouping category.
    pub const fn category(&self) -> EffectCategory {
        match self {
            EffectKind::Dry => EffectCategory::Utility,
            EffectKind::FeedbackDelay | EffectKind::SlapbackDelay | EffectKind::Reverb => {
                EffectCategory::TimeBased
            }
            EffectKind::Chorus
            | EffectKind::Flanger
            | EffectKind::Phaser
            | EffectKind::Tremolo
            | EffectKind::Vibrato => EffectCategory::Modulation,
            EffectKind::Distortion | EffectKind::Overdrive => EffectCategory::Distortion,
        }
    }
}

impl core::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Factory for the catalog's effects.
pub struct EffectCatalog;

impl EffectCatalog {
    /// Instantiate the effect for a kind at the given sample rate.
    ///
    /// The returned effect supports audio processing (via `Effect`) and
    /// index-based parameter access (via `EffectWithParams`).
    pub fn create(kind: EffectKind, sample_rate: f32) -> Box<dyn EffectWithParams + Send> {
        match kind {
            EffectKind::Dry => Box::new(Dry::new(sample_rate)),
            EffectKind::FeedbackDelay => Box::new(FeedbackDelay::new(sample_rate)),
            EffectKind::SlapbackDelay => Box::new(SlapbackDelay::new(sample_rate)),
            EffectKind::Reverb => Box::new(Reverb::new(sample_rate)),
            EffectKind::Chorus => Box::new(Chorus::new(sample_rate)),
            EffectKind::Flanger => Box::new(Flanger::new(sample_rate)),
            EffectKind::Phaser => Box::new(Phaser::new(sample_rate)),
            EffectKind::Tremolo => Box::new(Tremolo::new(sample_rate)),
            EffectKind::Vibrato => Box::new(Vibrato::new(sample_rate)),
            EffectKind::Distortion => Box::new(Distortion::new(sample_rate)),
            EffectKind::Overdrive => Box::new(Overdrive::new(sample_rate)),
        }
    }

    /// Parameter count for a kind without keeping the instance.
    pub fn param_count(kind: EffectKind) -> usize {
        Self::create(kind, 48000.0).effect_param_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_round_trip() {
        for (i, kind) in ALL_KINDS.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(EffectKind::from_index(i), Some(*kind));
        }
        assert_eq!(EffectKind::from_index(KIND_COUNT), None);
    }

    #[test]
    fn ids_round_trip() {
        for kind in ALL_KINDS {
            assert_eq!(EffectKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(EffectKind::from_id("chorus"), Some(EffectKind::Chorus));
        assert_eq!(EffectKind::from_id("no-such-effect"), None);
    }

    #[test]
    fn every_kind_instantiates_and_processes() {
        for kind in ALL_KINDS {
            let mut fx = EffectCatalog::create(kind, 48000.0);
            let out = fx.process(0.5);
            assert!(out.is_finite(), "{kind} produced non-finite output");
        }
    }

    #[test]
    fn dry_has_no_params() {
        assert_eq!(EffectCatalog::param_count(EffectKind::Dry), 0);
    }

    #[test]
    fn categories_cover_all_kinds() {
        let modulation = ALL_KINDS
            .iter()
            .filter(|k| k.category() == EffectCategory::Modulation)
            .count();
        assert_eq!(modulation, 5);
        let time_based = ALL_KINDS
            .iter()
            .filter(|k| k.category() == EffectCategory::TimeBased)
            .count();
        assert_eq!(time_based, 3);
    }
}
