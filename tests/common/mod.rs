#![allow(dead_code)]

use std::f64::consts::PI;

use convfft::num_complex::Complex;
use rand::distributions::{Distribution, Uniform};
use rand::{rngs::StdRng, SeedableRng};

pub fn random_samples(len: usize, seed: u64) -> Vec<f32> {
    let dist = Uniform::new(-1.0f32, 1.0);
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| dist.sample(&mut rng)).collect()
}

/// Naive complex DFT of interleaved samples, in double precision.
pub fn reference_dft(input: &[f32]) -> Vec<Complex<f64>> {
    let len = input.len() / 2;
    (0..len)
        .map(|k| {
            input
                .chunks_exact(2)
                .enumerate()
                .map(|(n, x)| {
                    let angle = -2.0 * PI * ((n * k) % len) as f64 / len as f64;
                    Complex::new(x[0] as f64, x[1] as f64) * Complex::from_polar(1.0, angle)
                })
                .sum()
        })
        .collect()
}

/// Naive half-bin shifted DFT of real samples: `len / 2` bins centred at `(k + ½) / len`.
pub fn reference_offset_dft(input: &[f32]) -> Vec<Complex<f64>> {
    let len = input.len();
    (0..len / 2)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .map(|(n, x)| {
                    let turns = ((n * (2 * k + 1)) % (2 * len)) as f64 / (2 * len) as f64;
                    Complex::from_polar(*x as f64, -2.0 * PI * turns)
                })
                .sum()
        })
        .collect()
}

pub fn to_complex(buffer: &[f32]) -> Vec<Complex<f64>> {
    buffer
        .chunks_exact(2)
        .map(|c| Complex::new(c[0] as f64, c[1] as f64))
        .collect()
}

/// Relative RMS error between two complex vectors.
pub fn relative_error(actual: &[Complex<f64>], expected: &[Complex<f64>]) -> f64 {
    assert_eq!(actual.len(), expected.len());
    let error: f64 = actual
        .iter()
        .zip(expected)
        .map(|(a, b)| (a - b).norm_sqr())
        .sum();
    let energy: f64 = expected.iter().map(|b| b.norm_sqr()).sum();
    (error / energy.max(1e-30)).sqrt()
}

/// Relative RMS error between two real vectors.
pub fn relative_error_real(actual: &[f32], expected: &[f64]) -> f64 {
    assert_eq!(actual.len(), expected.len());
    let error: f64 = actual
        .iter()
        .zip(expected)
        .map(|(a, b)| (*a as f64 - b).powi(2))
        .sum();
    let energy: f64 = expected.iter().map(|b| b * b).sum();
    (error / energy.max(1e-30)).sqrt()
}

/// Direct linear convolution, truncated to `len` outputs.
pub fn direct_convolution(signal: &[f32], filter: &[f32], len: usize) -> Vec<f64> {
    let mut out = vec![0.0f64; len];
    for (i, x) in signal.iter().enumerate() {
        for (j, h) in filter.iter().enumerate() {
            if i + j < len {
                out[i + j] += *x as f64 * *h as f64;
            }
        }
    }
    out
}
