//! Property tests shared by every effect: finite output on arbitrary
//! input, and silence after a reset.

use autofx_core::EffectWithParams;
use autofx_effects::{
    Chorus, Distortion, Dry, FeedbackDelay, Flanger, Overdrive, Phaser, Reverb, SlapbackDelay,
    Tremolo, Vibrato,
};
use proptest::prelude::*;

fn all_effects(sample_rate: f32) -> Vec<(&'static str, Box<dyn EffectWithParams>)> {
    vec![
        ("dry", Box::new(Dry::new(sample_rate)) as Box<dyn EffectWithParams>),
        ("feedback_delay", Box::new(FeedbackDelay::new(sample_rate))),
        ("slapback_delay", Box::new(SlapbackDelay::new(sample_rate))),
        ("reverb", Box::new(Reverb::new(sample_rate))),
        ("chorus", Box::new(Chorus::new(sample_rate))),
        ("flanger", Box::new(Flanger::new(sample_rate))),
        ("phaser", Box::new(Phaser::new(sample_rate))),
        ("tremolo", Box::new(Tremolo::new(sample_rate))),
        ("vibrato", Box::new(Vibrato::new(sample_rate))),
        ("distortion", Box::new(Distortion::new(sample_rate))),
        ("overdrive", Box::new(Overdrive::new(sample_rate))),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn output_stays_finite(samples in proptest::collection::vec(-1.0f32..=1.0, 256..1024)) {
        for (name, mut fx) in all_effects(44100.0) {
            for &x in &samples {
                let y = fx.process(x);
                prop_assert!(y.is_finite(), "{name} produced non-finite output");
                prop_assert!(y.abs() < 100.0, "{name} blew up: {y}");
            }
        }
    }

    #[test]
    fn params_clamp_to_descriptor_range(value in -1000.0f32..=1000.0) {
        for (name, mut fx) in all_effects(44100.0) {
            for i in 0..fx.effect_param_count() {
                fx.effect_set_param(i, value);
                let info = fx.effect_param_info(i).unwrap();
                let got = fx.effect_get_param(i);
                prop_assert!(
                    got >= info.min - 1e-3 && got <= info.max + 1e-3,
                    "{name} param {i} escaped range: {got} not in [{}, {}]",
                    info.min,
                    info.max
                );
            }
        }
    }
}

#[test]
fn reset_silences_every_effect() {
    for (name, mut fx) in all_effects(44100.0) {
        // Drive some signal through, then reset and feed silence. Time-based
        // effects must not leak their tails past a reset; waveshapers are
        // already stateless apart from the tone filter.
        for i in 0..4096 {
            fx.process(((i % 17) as f32 - 8.0) * 0.1);
        }
        fx.reset();
        let mut residue = 0.0f32;
        for _ in 0..4096 {
            residue = residue.max(fx.process(0.0).abs());
        }
        assert!(residue < 1e-6, "{name} leaked tail after reset: {residue}");
    }
}

#[test]
fn defaults_match_descriptors() {
    for (name, fx) in all_effects(48000.0) {
        for i in 0..fx.effect_param_count() {
            let info = fx.effect_param_info(i).unwrap();
            let got = fx.effect_get_param(i);
            assert!(
                (got - info.default).abs() < 1e-3,
                "{name} param {i} ({}) starts at {got}, descriptor says {}",
                info.name,
                info.default
            );
        }
    }
}
