use num_complex::Complex;
use num_traits::Zero;

use rand::distributions::{Distribution, Uniform};
use rand::{rngs::StdRng, SeedableRng};

/// The seed for the random number generator used to generate
/// random signals. It's defined here so that we have deterministic
/// tests
const RNG_SEED: [u8; 32] = [
    1, 9, 1, 0, 1, 1, 4, 3, 1, 4, 9, 8, 4, 1, 4, 8, 2, 8, 1, 2, 2, 2, 6, 1, 2, 3, 4, 5, 6, 7, 8, 9,
];

pub fn random_signal(length: usize) -> Vec<Complex<f32>> {
    let mut sig = Vec::with_capacity(length);
    let dist: Uniform<f32> = Uniform::new(-10.0, 10.0);
    let mut rng = StdRng::from_seed(RNG_SEED);
    for _ in 0..length {
        sig.push(Complex {
            re: dist.sample(&mut rng),
            im: dist.sample(&mut rng),
        });
    }
    sig
}

/// Naive DFT evaluated in double precision.
pub fn dft(signal: &[Complex<f32>]) -> Vec<Complex<f32>> {
    let len = signal.len();
    (0..len)
        .map(|k| {
            let mut sum = Complex::<f64>::zero();
            for (n, value) in signal.iter().enumerate() {
                let angle = -2.0 * std::f64::consts::PI * ((n * k) % len) as f64 / len as f64;
                let value = Complex::new(value.re as f64, value.im as f64);
                sum = sum + value * Complex::from_polar(1.0, angle);
            }
            Complex::new(sum.re as f32, sum.im as f32)
        })
        .collect()
}

/// True if the RMS error between the vectors is small relative to the RMS of `expected`.
pub fn compare_vectors(actual: &[Complex<f32>], expected: &[Complex<f32>]) -> bool {
    assert_eq!(actual.len(), expected.len());
    let mut error = 0f64;
    let mut energy = 0f64;
    for (&a, &b) in actual.iter().zip(expected.iter()) {
        error += (a - b).norm_sqr() as f64;
        energy += b.norm_sqr() as f64;
    }
    error.sqrt() <= 1e-4 * energy.sqrt().max(1.0)
}
