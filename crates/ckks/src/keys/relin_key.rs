//! Relinearization key for the CKKS scheme (version-2 "switching key"
//! construction).

use std::rc::Rc;

use fhe_math::sampling::RandomSource;

use crate::keys::{SecretKey, SwitchingKey};
use crate::parameters::CkksParameters;

/// A switching key from `s^2` back to `s`, used to relinearize the
/// degree-two term a ciphertext-ciphertext multiplication produces back down
/// to size two. Matches `ckks_key_generator.py`'s `generate_relin_key`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelinKey(pub(crate) SwitchingKey);

impl RelinKey {
    pub fn generate(sk: &SecretKey, rng: &mut impl RandomSource) -> Self {
        let par = sk.parameters();
        let sk_squared = sk
            .poly()
            .multiply(sk.poly(), &par.big_modulus)
            .expect("degree-matched multiplication");
        RelinKey(SwitchingKey::generate(par, sk, &sk_squared, rng))
    }

    pub(crate) fn key(&self) -> &SwitchingKey {
        &self.0
    }
}
