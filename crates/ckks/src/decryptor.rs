//! Decryption under a CKKS secret key.

use std::rc::Rc;

use crate::ciphertext::Ciphertext;
use crate::keys::SecretKey;
use crate::parameters::CkksParameters;
use crate::plaintext::Plaintext;
use crate::poly::CkksPoly;

/// Decrypts size-two (or, just before relinearization, size-three)
/// ciphertexts under a fixed secret key.
///
/// Matches `ckks_decryptor.py`'s `decrypt`: `m = c0 + c1*s (+ c2*s^2)`,
/// lifted into the symmetric residue range. The scaling factor is carried
/// straight through from the ciphertext, unlike BFV where decryption
/// re-derives it from a fixed plaintext modulus.
pub struct Decryptor {
    par: Rc<CkksParameters>,
    sk: SecretKey,
}

impl Decryptor {
    pub fn new(sk: SecretKey) -> Self {
        let par = sk.parameters().clone();
        Self { par, sk }
    }

    pub fn decrypt(&self, ct: &Ciphertext) -> Plaintext {
        self.decrypt_with_c2(ct, None)
    }

    /// Decrypts a not-yet-relinearized ciphertext given its extra `c2` term.
    pub fn decrypt_with_c2(&self, ct: &Ciphertext, c2: Option<&CkksPoly>) -> Plaintext {
        debug_assert_eq!(self.par, ct.par);
        let modulus = &ct.modulus;

        let c1_s = ct.c1.multiply(self.sk.poly(), modulus).expect("degree-matched multiplication");
        let mut message = ct.c0.add(&c1_s, Some(modulus)).expect("degree-matched addition");

        if let Some(c2) = c2 {
            let s_squared = self
                .sk
                .poly()
                .multiply(self.sk.poly(), modulus)
                .expect("degree-matched multiplication");
            let c2_term = c2.multiply(&s_squared, modulus).expect("degree-matched multiplication");
            message = message.add(&c2_term, Some(modulus)).expect("degree-matched addition");
        }

        let message = message.mod_small(modulus);
        Plaintext::new(&self.par, message, ct.scaling_factor)
    }
}
