//! Entropy interface and distributions sampled from it.
//!
//! `RandomSource` is the external collaborator spec.md's purpose section
//! calls out: this crate specifies only its interface and a default,
//! reproducible-in-tests implementation backed by `ChaCha8Rng`. Scheme code
//! is written against the trait so a caller can substitute a different
//! entropy source (e.g. an OS CSPRNG) without touching key generation or
//! encryption logic.

use num_bigint::BigInt;
use num_complex::Complex64;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A source of randomness for the distributions lattice cryptography needs.
pub trait RandomSource {
    /// Uniform integer in `[lo, hi)`.
    fn uniform(&mut self, lo: i64, hi: i64) -> i64;

    /// `n` independent draws from `{-1, 0, 1}` with probabilities `{1/4,
    /// 1/2, 1/4}`.
    fn triangle(&mut self, n: usize) -> Vec<i64>;

    /// A length-`n` vector over `{-1, 0, 1}` with exactly `hamming_weight`
    /// nonzero entries, each `+1`/`-1` with equal probability, placed
    /// without collisions.
    fn hamming(&mut self, n: usize, hamming_weight: usize) -> Vec<i64>;

    /// `n` independent uniform draws from `[0, 1)`.
    fn rand_real(&mut self, n: usize) -> Vec<f64>;

    /// `n` independent draws `a + bi` with `a, b` uniform on `[0, 1)`.
    fn rand_complex(&mut self, n: usize) -> Vec<Complex64>;

    /// `n` independent uniform draws from `[0, hi)` as arbitrary-precision
    /// integers, for moduli too large to fit a machine word.
    fn uniform_big(&mut self, hi: &BigInt, n: usize) -> Vec<BigInt>;
}

/// The default `RandomSource`, seeded from a `ChaCha8Rng`. Reproducible given
/// a fixed seed, which is what every test in this workspace that needs
/// randomness relies on.
pub struct ChaChaRandomSource {
    rng: ChaCha8Rng,
}

impl ChaChaRandomSource {
    pub fn new(seed: [u8; 32]) -> Self {
        ChaChaRandomSource { rng: ChaCha8Rng::from_seed(seed) }
    }

    pub fn from_entropy() -> Self {
        ChaChaRandomSource { rng: ChaCha8Rng::from_entropy() }
    }
}

impl RandomSource for ChaChaRandomSource {
    fn uniform(&mut self, lo: i64, hi: i64) -> i64 {
        self.rng.gen_range(lo..hi)
    }

    fn triangle(&mut self, n: usize) -> Vec<i64> {
        (0..n)
            .map(|_| match self.rng.gen_range(0..4u8) {
                0 => -1,
                1 => 1,
                _ => 0,
            })
            .collect()
    }

    fn hamming(&mut self, n: usize, hamming_weight: usize) -> Vec<i64> {
        let mut sample = vec![0i64; n];
        let mut total_weight = 0;
        while total_weight < hamming_weight {
            let index = self.rng.gen_range(0..n);
            if sample[index] == 0 {
                sample[index] = if self.rng.gen_bool(0.5) { -1 } else { 1 };
                total_weight += 1;
            }
        }
        sample
    }

    fn rand_real(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.rng.gen::<f64>()).collect()
    }

    fn rand_complex(&mut self, n: usize) -> Vec<Complex64> {
        (0..n)
            .map(|_| Complex64::new(self.rng.gen::<f64>(), self.rng.gen::<f64>()))
            .collect()
    }

    fn uniform_big(&mut self, hi: &BigInt, n: usize) -> Vec<BigInt> {
        let byte_len = ((hi.bits() + 8) / 8).max(1) as usize;
        (0..n)
            .map(|_| loop {
                let mut bytes = vec![0u8; byte_len];
                self.rng.fill_bytes(&mut bytes);
                let candidate = BigInt::from_bytes_be(num_bigint::Sign::Plus, &bytes) % hi;
                return candidate;
            })
            .collect()
    }
}
