//! Rational sample-rate conversion for classifier input.
//!
//! Polyphase windowed-sinc resampling by the factor P/Q, used to bring
//! arbitrary source material to the model rate (e.g. 44 100 Hz → 22 050 Hz
//! is P=1, Q=2; 48 000 Hz → 22 050 Hz reduces to P=147, Q=320). The
//! prototype lowpass is a Blackman-windowed sinc normalized to unity DC
//! gain, decomposed into P sub-filters so only the needed output samples
//! are computed.
//!
//! Reference: P. P. Vaidyanathan, *Multirate Systems and Filter Banks*,
//! Prentice Hall, 1993, Section 4.3.

use std::f32::consts::PI;

/// Blackman-windowed sinc lowpass, unity DC gain.
///
/// `cutoff` is normalized to Nyquist (0.0, 1.0).
fn design_lowpass(num_taps: usize, cutoff: f32) -> Vec<f32> {
    let m = (num_taps - 1) as f32;
    let mut coeffs: Vec<f32> = (0..num_taps)
        .map(|n| {
            let x = n as f32 - m / 2.0;
            let sinc = if x.abs() < 1e-7 {
                cutoff
            } else {
                (PI * cutoff * x).sin() / (PI * x)
            };
            let phase = 2.0 * PI * n as f32 / m;
            let window = 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos();
            sinc * window
        })
        .collect();

    let sum: f32 = coeffs.iter().sum();
    if sum.abs() > 1e-10 {
        for c in &mut coeffs {
            *c /= sum;
        }
    }
    coeffs
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Resample `signal` by the rational factor `to_rate / from_rate`.
///
/// Output length is `ceil(len * P / Q)` after reducing the ratio. An
/// identity ratio returns a copy. Rates are clamped to at least 1; callers
/// validate zero rates at the decode boundary.
pub fn resample_rational(signal: &[f32], to_rate: usize, from_rate: usize) -> Vec<f32> {
    let to_rate = to_rate.max(1);
    let from_rate = from_rate.max(1);

    let g = gcd(to_rate, from_rate);
    let p = to_rate / g;
    let q = from_rate / g;

    if p == 1 && q == 1 {
        return signal.to_vec();
    }

    // ~60 dB stopband with a 10% guard band below the lower Nyquist.
    let num_taps = 4 * p.max(q) * 10 + 1;
    let cutoff = 0.9 / p.max(q) as f32;
    let prototype = design_lowpass(num_taps, cutoff);

    // Polyphase branch k holds prototype taps k, k+P, k+2P, ...
    let taps_per_phase = num_taps.div_ceil(p);
    let mut polyphase = vec![vec![0.0f32; taps_per_phase]; p];
    for (tap_idx, &coeff) in prototype.iter().enumerate() {
        polyphase[tap_idx % p][tap_idx / p] = coeff;
    }

    let out_len = (signal.len() * p).div_ceil(q);
    let mut output = Vec::with_capacity(out_len);

    for m in 0..out_len {
        let upsampled_idx = m * q;
        let n = upsampled_idx / p;
        let branch = &polyphase[upsampled_idx % p];

        let mut acc = 0.0f32;
        for (i, &coeff) in branch.iter().enumerate() {
            if n >= i && n - i < signal.len() {
                acc += coeff * signal[n - i];
            }
        }
        // Restore unity gain lost to the P-fold zero insertion.
        output.push(acc * p as f32);
    }

    output
}
