//! Number-Theoretic Transform (NTT) and its negacyclic (Fermat-Theoretic,
//! "FTT") variant over `Z_q` for a prime `q`.
//!
//! Every modulus handled here is a prime that fits in a `u64` and satisfies
//! `q ≡ 1 (mod 2N)`: the per-prime moduli of a [`crate::crt::CrtContext`], or
//! a batching plaintext modulus. Products during butterfly steps fit in
//! `u128`, so no arbitrary-precision type is needed at this layer.

use crate::bitops::{bit_reverse_vec, reverse_bits};
use crate::error::{Error, Result};
use crate::numth::{mod_inv, root_of_unity};
use log::trace;

/// Precomputed powers of a `2N`-th root of unity modulo a prime `q`, used to
/// run the forward/inverse negacyclic NTT over a degree-`N` ring.
#[derive(Debug, Clone, PartialEq)]
pub struct NttContext {
    pub degree: usize,
    pub modulus: u64,
    roots_of_unity: Vec<u64>,
    roots_of_unity_inv: Vec<u64>,
}

fn mulmod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn addmod(a: u64, b: u64, m: u64) -> u64 {
    let s = a + b;
    if s >= m {
        s - m
    } else {
        s
    }
}

fn submod(a: u64, b: u64, m: u64) -> u64 {
    if a >= b {
        a - b
    } else {
        a + m - b
    }
}

impl NttContext {
    /// Builds a context for a ring of the given `degree` over `Z_modulus`.
    /// If `root_of_unity_hint` is `None`, a `2 * degree`-th primitive root of
    /// unity is computed.
    pub fn new(degree: usize, modulus: u64, root_of_unity_hint: Option<u64>) -> Result<Self> {
        if !degree.is_power_of_two() {
            return Err(Error::InvalidParameter(format!(
                "polynomial degree must be a power of two, got {degree}"
            )));
        }
        let rou = match root_of_unity_hint {
            Some(r) => r,
            None => root_of_unity(2 * degree as u64, modulus)?,
        };
        trace!("NttContext::new(degree={degree}, modulus={modulus}) rou={rou}");

        let mut roots_of_unity = vec![1u64; degree];
        for i in 1..degree {
            roots_of_unity[i] = mulmod(roots_of_unity[i - 1], rou, modulus);
        }

        let rou_inv = mod_inv(rou, modulus);
        let mut roots_of_unity_inv = vec![1u64; degree];
        for i in 1..degree {
            roots_of_unity_inv[i] = mulmod(roots_of_unity_inv[i - 1], rou_inv, modulus);
        }

        Ok(NttContext {
            degree,
            modulus,
            roots_of_unity,
            roots_of_unity_inv,
        })
    }

    /// Iterated decimation-in-time NTT. `rou` holds the powers of the root
    /// of unity to butterfly with and must have the same length as `coeffs`.
    pub fn ntt(&self, coeffs: &[u64], rou: &[u64]) -> Vec<u64> {
        let n = coeffs.len();
        debug_assert_eq!(rou.len(), n);
        let q = self.modulus;

        let mut result = bit_reverse_vec(coeffs);
        let log_n = n.trailing_zeros();

        for logm in 1..=log_n {
            let half = 1usize << (logm - 1);
            let step = 1usize << logm;
            let mut j = 0;
            while j < n {
                for i in 0..half {
                    let even = j + i;
                    let odd = j + i + half;
                    let rou_idx = i << (1 + log_n - logm);
                    let factor = mulmod(rou[rou_idx], result[odd], q);
                    let plus = addmod(result[even], factor, q);
                    let minus = submod(result[even], factor, q);
                    result[even] = plus;
                    result[odd] = minus;
                }
                j += step;
            }
        }
        result
    }

    /// Forward negacyclic NTT: twists by powers of the `2N`-th root of
    /// unity before running [`Self::ntt`].
    pub fn ftt_fwd(&self, coeffs: &[u64]) -> Result<Vec<u64>> {
        if coeffs.len() != self.degree {
            return Err(Error::InvalidParameter(
                "ftt_fwd: input length does not match context degree".into(),
            ));
        }
        let q = self.modulus;
        let input: Vec<u64> = coeffs
            .iter()
            .zip(self.roots_of_unity.iter())
            .map(|(&c, &r)| mulmod(c % q, r, q))
            .collect();
        Ok(self.ntt(&input, &self.roots_of_unity))
    }

    /// Inverse negacyclic NTT, exact inverse of [`Self::ftt_fwd`].
    pub fn ftt_inv(&self, coeffs: &[u64]) -> Result<Vec<u64>> {
        if coeffs.len() != self.degree {
            return Err(Error::InvalidParameter(
                "ftt_inv: input length does not match context degree".into(),
            ));
        }
        let q = self.modulus;
        let scaled_down = self.ntt(coeffs, &self.roots_of_unity_inv);
        let degree_inv = mod_inv(self.degree as u64, q);
        Ok(scaled_down
            .iter()
            .zip(self.roots_of_unity_inv.iter())
            .map(|(&c, &r)| mulmod(mulmod(c, r, q), degree_inv, q))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numth::mod_exp;

    #[test]
    fn reverse_bits_is_reused_correctly() {
        assert_eq!(reverse_bits(3, 2), 3);
    }

    #[test]
    fn ntt_matches_reference_vector() {
        // N=4, q=73. 10 is a primitive 8th root of unity mod 73 (10 = 5^9
        // for primitive root 5); pinned rather than discovered via
        // `root_of_unity` so the expected vector below is reproducible.
        let q = 73u64;
        let rou = 10u64;
        assert_eq!(mod_exp(rou, 8, q), 1);
        assert_ne!(mod_exp(rou, 4, q), 1);
        let ctx = NttContext::new(4, q, Some(rou)).unwrap();
        let result = ctx.ntt(&[0, 1, 4, 5], &ctx.roots_of_unity.clone());
        assert_eq!(result, vec![10, 34, 71, 31]);
    }

    #[test]
    fn ftt_round_trips() {
        let q = 73u64;
        let ctx = NttContext::new(4, q, None).unwrap();
        let coeffs = vec![0u64, 1, 4, 5];
        let transformed = ctx.ftt_fwd(&coeffs).unwrap();
        let back = ctx.ftt_inv(&transformed).unwrap();
        assert_eq!(back, coeffs);
    }

    #[test]
    fn ftt_round_trips_for_larger_ring() {
        let n = 16usize;
        // 97 = 6*16 + 1, prime, NTT-friendly for N=16.
        let q = 97u64;
        let ctx = NttContext::new(n, q, None).unwrap();
        let coeffs: Vec<u64> = (0..n as u64).collect();
        let transformed = ctx.ftt_fwd(&coeffs).unwrap();
        let back = ctx.ftt_inv(&transformed).unwrap();
        assert_eq!(back, coeffs);
    }
}
