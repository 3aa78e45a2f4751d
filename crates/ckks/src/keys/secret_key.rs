//! Secret key for the CKKS encryption scheme.

use std::rc::Rc;

use fhe_math::poly::Polynomial;
use fhe_math::sampling::RandomSource;
use num_bigint::BigInt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::parameters::CkksParameters;
use crate::poly::CkksPoly;

/// Secret key `s`, a Hamming-weight-`h` ternary polynomial, matching
/// `ckks_key_generator.py`'s `generate_secret_key`.
#[derive(Debug, PartialEq)]
pub struct SecretKey {
    par: Rc<CkksParameters>,
    s: CkksPoly,
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        self.s.zeroize_coeffs();
    }
}

impl ZeroizeOnDrop for SecretKey {}

impl SecretKey {
    /// Draws a random secret key `s` with exactly `par.hamming_weight`
    /// nonzero coefficients.
    pub fn generate(par: &Rc<CkksParameters>, rng: &mut impl RandomSource) -> Self {
        let coeffs: Vec<BigInt> = rng
            .hamming(par.poly_degree, par.hamming_weight)
            .into_iter()
            .map(BigInt::from)
            .collect();
        let s = Polynomial::new(par.poly_degree, coeffs).expect("hamming sampler returns N values");
        let s = CkksPoly::from_polynomial(s, par);
        Self { par: par.clone(), s }
    }

    pub(crate) fn poly(&self) -> &CkksPoly {
        &self.s
    }

    pub(crate) fn parameters(&self) -> &Rc<CkksParameters> {
        &self.par
    }
}
