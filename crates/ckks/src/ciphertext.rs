//! Ciphertext type for the CKKS scheme.

use std::rc::Rc;

use num_bigint::BigUint;

use crate::parameters::CkksParameters;
use crate::poly::CkksPoly;

/// A size-two CKKS ciphertext `(c0, c1)` such that `c0 + c1 * s ~= delta * m
/// (mod modulus)`.
///
/// Unlike [`bfv::ciphertext::Ciphertext`], `scaling_factor` and `modulus`
/// are per-ciphertext, not per-scheme: every rescale, modulus-raise, or
/// modulus-lower produces a ciphertext carrying a new pair of these, which
/// is why every [`crate::evaluator::Evaluator`] operation that combines two
/// ciphertexts first checks they agree rather than assuming a fixed ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Ciphertext {
    pub(crate) par: Rc<CkksParameters>,
    pub(crate) c0: CkksPoly,
    pub(crate) c1: CkksPoly,
    pub(crate) scaling_factor: f64,
    pub(crate) modulus: BigUint,
}

impl Ciphertext {
    pub(crate) fn new(
        par: &Rc<CkksParameters>,
        c0: CkksPoly,
        c1: CkksPoly,
        scaling_factor: f64,
        modulus: BigUint,
    ) -> Self {
        Self { par: par.clone(), c0, c1, scaling_factor, modulus }
    }

    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }
}
