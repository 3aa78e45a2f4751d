//! Residue Number System (RNS) context: a product of NTT-friendly primes
//! used to represent coefficients of a large-modulus ring as a vector of
//! machine-word residues.

use crate::error::{Error, Result};
use crate::ntt::NttContext;
use crate::numth::{is_prime, mod_inv};
use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// A set of `num_primes` primes, each `> 2^prime_size` and `≡ 1 (mod 2 *
/// poly_degree)`, together with their product and the precomputed Garner
/// coefficients needed to reconstruct a value from its residues.
#[derive(Debug, Clone, PartialEq)]
pub struct CrtContext {
    pub poly_degree: usize,
    pub primes: Vec<u64>,
    pub ntts: Vec<NttContext>,
    pub modulus: BigUint,
    crt_vals: Vec<BigUint>,
    crt_inv_vals: Vec<u64>,
}

impl CrtContext {
    pub fn new(num_primes: usize, prime_size: u32, poly_degree: usize) -> Result<Self> {
        let step = 2 * poly_degree as u64;
        let primes = generate_primes(num_primes, prime_size, step)?;
        debug!("CrtContext::new: generated {num_primes} primes of size {prime_size} bits");

        let mut ntts = Vec::with_capacity(num_primes);
        for &p in &primes {
            ntts.push(NttContext::new(poly_degree, p, None)?);
        }

        let mut modulus = BigUint::one();
        for &p in &primes {
            modulus *= p;
        }

        let mut crt_vals = Vec::with_capacity(num_primes);
        let mut crt_inv_vals = Vec::with_capacity(num_primes);
        for &p in &primes {
            let crt_val = &modulus / p;
            let crt_val_mod_p = (&crt_val % p).to_u64_digits();
            let crt_val_mod_p = crt_val_mod_p.first().copied().unwrap_or(0);
            crt_inv_vals.push(mod_inv(crt_val_mod_p, p));
            crt_vals.push(crt_val);
        }

        Ok(CrtContext {
            poly_degree,
            primes,
            ntts,
            modulus,
            crt_vals,
            crt_inv_vals,
        })
    }

    pub fn num_primes(&self) -> usize {
        self.primes.len()
    }

    /// Splits `value` into its residues modulo each prime.
    pub fn crt(&self, value: &BigUint) -> Vec<u64> {
        self.primes
            .iter()
            .map(|&p| {
                let r = value % p;
                r.to_u64_digits().first().copied().unwrap_or(0)
            })
            .collect()
    }

    /// Reconstructs the value modulo `self.modulus` from its residues, via
    /// Garner's form.
    pub fn reconstruct(&self, values: &[u64]) -> Result<BigUint> {
        if values.len() != self.primes.len() {
            return Err(Error::CrtWrongLength {
                expected: self.primes.len(),
                got: values.len(),
            });
        }
        let mut acc = BigUint::zero();
        for i in 0..values.len() {
            let p = self.primes[i];
            let intermed = (values[i] as u128 * self.crt_inv_vals[i] as u128 % p as u128) as u64;
            let intermed = (BigUint::from(intermed) * &self.crt_vals[i]) % &self.modulus;
            acc = (acc + intermed) % &self.modulus;
        }
        Ok(acc)
    }
}

fn generate_primes(num_primes: usize, prime_size: u32, step: u64) -> Result<Vec<u64>> {
    let mut primes = Vec::with_capacity(num_primes);
    let mut candidate: u64 = (1u64 << prime_size) + 1;
    for _ in 0..num_primes {
        candidate += step;
        while !is_prime(candidate, 40) {
            candidate += step;
        }
        primes.push(candidate);
    }
    Ok(primes)
}
