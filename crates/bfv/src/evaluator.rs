//! Homomorphic operations on BFV ciphertexts.

use std::rc::Rc;

use num_bigint::BigInt;

use crate::ciphertext::Ciphertext;
use crate::keys::RelinKey;
use crate::parameters::BfvParameters;

/// Stateless evaluator: every operation takes its operands and (for
/// multiplication) a relinearization key explicitly, mirroring
/// `bfv_evaluator.py`'s free functions.
pub struct Evaluator {
    par: Rc<BfvParameters>,
}

impl Evaluator {
    pub fn new(par: Rc<BfvParameters>) -> Self {
        Self { par }
    }

    pub fn add(&self, ct1: &Ciphertext, ct2: &Ciphertext) -> Ciphertext {
        ct1 + ct2
    }

    pub fn subtract(&self, ct1: &Ciphertext, ct2: &Ciphertext) -> Ciphertext {
        ct1 - ct2
    }

    /// Multiplies two ciphertexts and relinearizes back down to size two.
    ///
    /// Matches `bfv_evaluator.py`'s `multiply` followed immediately by
    /// `relinearize`: every ciphertext this evaluator hands back is always
    /// of size two, so there is no separate public relinearization step.
    pub fn multiply(&self, ct1: &Ciphertext, ct2: &Ciphertext, relin_key: &RelinKey) -> Ciphertext {
        let q = &self.par.ciph_modulus;
        let inv_scale = 1.0 / self.par.scaling_factor;

        let c0 = ct1
            .c0
            .multiply_fft(&ct2.c0)
            .expect("degree-matched multiplication")
            .scale_and_round(inv_scale)
            .mod_(q);

        let cross_a = ct1.c0.multiply_fft(&ct2.c1).expect("degree-matched multiplication");
        let cross_b = ct1.c1.multiply_fft(&ct2.c0).expect("degree-matched multiplication");
        let c1 = cross_a
            .add(&cross_b, None)
            .expect("degree-matched addition")
            .scale_and_round(inv_scale)
            .mod_(q);

        let c2 = ct1
            .c1
            .multiply_fft(&ct2.c1)
            .expect("degree-matched multiplication")
            .scale_and_round(inv_scale)
            .mod_(q);

        self.relinearize(relin_key, c0, c1, c2)
    }

    fn relinearize(
        &self,
        relin_key: &RelinKey,
        c0: fhe_math::poly::Polynomial,
        c1: fhe_math::poly::Polynomial,
        c2: fhe_math::poly::Polynomial,
    ) -> Ciphertext {
        let q = &self.par.ciph_modulus;
        let base = BigInt::from(relin_key.base().clone());
        let c2_decomposed = c2.base_decompose(&base, relin_key.levels());

        let mut new_c0 = fhe_math::poly::Polynomial::zero(self.par.poly_degree);
        let mut new_c1 = fhe_math::poly::Polynomial::zero(self.par.poly_degree);
        for (digit, (k0, k1)) in c2_decomposed.iter().zip(relin_key.keys.iter()) {
            let term0 = k0.multiply(digit, q, None, None).expect("degree-matched multiplication");
            let term1 = k1.multiply(digit, q, None, None).expect("degree-matched multiplication");
            new_c0 = new_c0.add(&term0, Some(q)).expect("degree-matched addition");
            new_c1 = new_c1.add(&term1, Some(q)).expect("degree-matched addition");
        }

        let c0 = c0.add(&new_c0, Some(q)).expect("degree-matched addition");
        let c1 = c1.add(&new_c1, Some(q)).expect("degree-matched addition");
        Ciphertext::new(&self.par, c0, c1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decryptor::Decryptor;
    use crate::encryptor::Encryptor;
    use crate::keys::{PublicKey, SecretKey};
    use crate::parameters::BfvParametersBuilder;
    use crate::plaintext::Plaintext;
    use fhe_math::poly::Polynomial;
    use fhe_math::sampling::ChaChaRandomSource;
    use num_bigint::BigUint;

    fn small_params() -> Rc<BfvParameters> {
        Rc::new(
            BfvParametersBuilder::default()
                .poly_degree(16)
                .plain_modulus(17)
                .ciph_modulus(BigUint::from(4_611_686_018_427_387_904u64))
                .include_encryption_errors(false)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn add_is_homomorphic_over_constant_terms() {
        let par = small_params();
        let mut rng = ChaChaRandomSource::new([21u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let pk = PublicKey::generate(&sk, &mut rng);
        let encryptor = Encryptor::new(pk);
        let evaluator = Evaluator::new(par.clone());

        let mut a_coeffs = vec![BigInt::from(0); par.poly_degree];
        a_coeffs[0] = BigInt::from(3);
        let mut b_coeffs = vec![BigInt::from(0); par.poly_degree];
        b_coeffs[0] = BigInt::from(4);

        let pt_a = Plaintext::new(&par, Polynomial::new(par.poly_degree, a_coeffs).unwrap());
        let pt_b = Plaintext::new(&par, Polynomial::new(par.poly_degree, b_coeffs).unwrap());
        let ct_a = encryptor.encrypt(&pt_a, &mut rng);
        let ct_b = encryptor.encrypt(&pt_b, &mut rng);

        let ct_c = evaluator.add(&ct_a, &ct_b);
        let decryptor = Decryptor::new(sk);
        let pt_c = decryptor.decrypt(&ct_c);
        assert_eq!(pt_c.poly().coeffs[0], BigInt::from(7));
    }

    #[test]
    fn multiply_and_relinearize_produce_the_constant_term_product() {
        let par = small_params();
        let mut rng = ChaChaRandomSource::new([23u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let pk = PublicKey::generate(&sk, &mut rng);
        let encryptor = Encryptor::new(pk);
        let evaluator = Evaluator::new(par.clone());
        let relin_key = RelinKey::generate(&sk, &mut rng);

        let mut a_coeffs = vec![BigInt::from(0); par.poly_degree];
        a_coeffs[0] = BigInt::from(3);
        let mut b_coeffs = vec![BigInt::from(0); par.poly_degree];
        b_coeffs[0] = BigInt::from(2);

        let pt_a = Plaintext::new(&par, Polynomial::new(par.poly_degree, a_coeffs).unwrap());
        let pt_b = Plaintext::new(&par, Polynomial::new(par.poly_degree, b_coeffs).unwrap());
        let ct_a = encryptor.encrypt(&pt_a, &mut rng);
        let ct_b = encryptor.encrypt(&pt_b, &mut rng);

        let ct_c = evaluator.multiply(&ct_a, &ct_b, &relin_key);
        let decryptor = Decryptor::new(sk);
        let pt_c = decryptor.decrypt(&ct_c);
        assert_eq!(pt_c.poly().coeffs[0], BigInt::from(6));
    }
}
