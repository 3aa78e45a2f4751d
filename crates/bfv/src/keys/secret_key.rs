//! Secret key for the BFV encryption scheme.

use std::rc::Rc;

use fhe_math::poly::Polynomial;
use fhe_math::sampling::RandomSource;
use num_bigint::BigInt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::parameters::BfvParameters;

/// Secret key `s`, a ternary polynomial drawn from the triangle
/// distribution, matching `bfv_key_generator.py`'s `generate_secret_key`.
#[derive(Debug, PartialEq)]
pub struct SecretKey {
    par: Rc<BfvParameters>,
    s: Polynomial,
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        for c in self.s.coeffs.iter_mut() {
            *c = BigInt::from(0);
        }
    }
}

impl ZeroizeOnDrop for SecretKey {}

impl SecretKey {
    /// Draws a random secret key `s` from the triangle distribution.
    pub fn generate(par: &Rc<BfvParameters>, rng: &mut impl RandomSource) -> Self {
        let coeffs: Vec<BigInt> = rng
            .triangle(par.poly_degree)
            .into_iter()
            .map(BigInt::from)
            .collect();
        let s = Polynomial::new(par.poly_degree, coeffs).expect("triangle sampler returns N values");
        Self { par: par.clone(), s }
    }

    pub(crate) fn poly(&self) -> &Polynomial {
        &self.s
    }

    pub(crate) fn parameters(&self) -> &Rc<BfvParameters> {
        &self.par
    }
}
