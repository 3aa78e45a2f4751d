//! Decryption under a BFV secret key.

use std::rc::Rc;

use num_bigint::BigUint;

use crate::ciphertext::Ciphertext;
use crate::keys::SecretKey;
use crate::parameters::BfvParameters;
use crate::plaintext::Plaintext;

/// Decrypts size-two ciphertexts under a fixed secret key.
///
/// Matches `bfv_decryptor.py`'s `decrypt`: `m = round((c0 + c1*s) / delta)
/// mod t`.
pub struct Decryptor {
    par: Rc<BfvParameters>,
    sk: SecretKey,
}

impl Decryptor {
    pub fn new(sk: SecretKey) -> Self {
        let par = sk.parameters().clone();
        Self { par, sk }
    }

    pub fn decrypt(&self, ct: &Ciphertext) -> Plaintext {
        debug_assert_eq!(self.par, ct.par);
        let q = &self.par.ciph_modulus;

        let c1_s = ct.c1.multiply(self.sk.poly(), q, None, None).expect("degree-matched multiplication");
        let intermediate = ct.c0.add(&c1_s, Some(q)).expect("degree-matched addition");

        let scaled = intermediate.scale_and_round(1.0 / self.par.scaling_factor);
        let poly = scaled.mod_(&BigUint::from(self.par.plain_modulus));

        Plaintext::new(&self.par, poly)
    }
}
