//! SIMD-style batch encoding of integer vectors into BFV plaintexts.
//!
//! Matches `batch_encoder.py`: a length-`N` integer vector is mapped to a
//! single polynomial via the inverse number-theoretic transform over
//! `Z_t`, so that componentwise plaintext addition/multiplication becomes
//! polynomial ring addition/multiplication. Requires `t = plain_modulus`
//! odd and `t \equiv 1 (mod 2N)` so `NttContext` can find a primitive
//! `2N`-th root of unity in `Z_t`.

use std::rc::Rc;

use fhe_math::ntt::NttContext;
use fhe_math::poly::Polynomial;
use fhe_math::{Error, Result};
use fhe_traits::{FheDecoder, FheEncoder};
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;

use crate::parameters::BfvParameters;
use crate::plaintext::Plaintext;

pub struct BatchEncoder {
    par: Rc<BfvParameters>,
    ntt: NttContext,
}

impl BatchEncoder {
    pub fn new(par: Rc<BfvParameters>) -> Result<Self> {
        let ntt = NttContext::new(par.poly_degree, par.plain_modulus, None)?;
        Ok(Self { par, ntt })
    }
}

impl FheEncoder<&[i64]> for BatchEncoder {
    type Plaintext = Plaintext;

    fn encode(&self, values: &[i64]) -> Result<Plaintext> {
        if values.len() != self.par.poly_degree {
            return Err(Error::InvalidParameter(format!(
                "expected {} values to batch-encode, got {}",
                self.par.poly_degree,
                values.len()
            )));
        }
        let t = self.par.plain_modulus as i64;
        let reduced: Vec<u64> = values.iter().map(|&v| v.rem_euclid(t) as u64).collect();
        let coeffs = self.ntt.ftt_inv(&reduced)?;
        let poly = Polynomial::new(
            self.par.poly_degree,
            coeffs.into_iter().map(BigInt::from).collect(),
        )?;
        Ok(Plaintext::new(&self.par, poly))
    }
}

impl FheDecoder<Vec<u64>> for BatchEncoder {
    type Plaintext = Plaintext;

    fn decode(&self, plaintext: &Plaintext) -> Result<Vec<u64>> {
        let t = BigUint::from(self.par.plain_modulus);
        let t_signed = BigInt::from(t);
        let coeffs: Vec<u64> = plaintext
            .poly()
            .coeffs
            .iter()
            .map(|c| (((c % &t_signed) + &t_signed) % &t_signed).to_u64().unwrap_or(0))
            .collect();
        self.ntt.ftt_fwd(&coeffs)
    }
}
