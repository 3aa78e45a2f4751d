//! Encryption under a BFV public key.

use std::rc::Rc;

use fhe_math::poly::Polynomial;
use fhe_math::sampling::RandomSource;
use num_bigint::BigInt;
use num_traits::Zero;

use crate::ciphertext::Ciphertext;
use crate::keys::PublicKey;
use crate::parameters::BfvParameters;
use crate::plaintext::Plaintext;

/// Encrypts plaintexts under a fixed public key.
///
/// Matches `bfv_encryptor.py`: `c0 = e1 + p0*u + delta*m`, `c1 = e2 + p1*u`,
/// where `u` is a fresh triangle-distributed polynomial per encryption and
/// `e1`, `e2` are sampled the same way but only used when
/// [`BfvParameters`]'s `include_encryption_errors` is set (the reference
/// always discards them; this generalizes that into a real switch).
pub struct Encryptor {
    par: Rc<BfvParameters>,
    pk: PublicKey,
}

impl Encryptor {
    pub fn new(pk: PublicKey) -> Self {
        let par = pk.parameters().clone();
        Self { par, pk }
    }

    pub fn encrypt(&self, pt: &Plaintext, rng: &mut impl RandomSource) -> Ciphertext {
        let n = self.par.poly_degree;
        let q = &self.par.ciph_modulus;

        let u: Vec<BigInt> = rng.triangle(n).into_iter().map(BigInt::from).collect();
        let u = Polynomial::new(n, u).expect("triangle sampler returns N values");

        let (e1, e2) = if self.par.include_encryption_errors {
            let e1: Vec<BigInt> = rng.triangle(n).into_iter().map(BigInt::from).collect();
            let e2: Vec<BigInt> = rng.triangle(n).into_iter().map(BigInt::from).collect();
            (
                Polynomial::new(n, e1).expect("triangle sampler returns N values"),
                Polynomial::new(n, e2).expect("triangle sampler returns N values"),
            )
        } else {
            (Polynomial::zero(n), Polynomial::zero(n))
        };

        let scale = BigInt::from_f64_trunc(self.par.scaling_factor);
        let scaled_message = pt.poly().scalar_multiply(&scale, Some(q));

        let p0_u = self.pk.p0.multiply(&u, q, None, None).expect("degree-matched multiplication");
        let p1_u = self.pk.p1.multiply(&u, q, None, None).expect("degree-matched multiplication");

        let c0 = e1
            .add(&p0_u, Some(q))
            .expect("degree-matched addition")
            .add(&scaled_message, Some(q))
            .expect("degree-matched addition");
        let c1 = e2.add(&p1_u, Some(q)).expect("degree-matched addition");

        Ciphertext::new(&self.par, c0, c1)
    }
}

trait FromF64Trunc {
    fn from_f64_trunc(value: f64) -> Self;
}

impl FromF64Trunc for BigInt {
    fn from_f64_trunc(value: f64) -> Self {
        use num_traits::FromPrimitive;
        BigInt::from_f64(value.trunc()).unwrap_or_else(BigInt::zero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SecretKey;
    use fhe_math::sampling::ChaChaRandomSource;
    use num_bigint::BigUint;

    fn small_params() -> Rc<BfvParameters> {
        Rc::new(
            crate::parameters::BfvParametersBuilder::default()
                .poly_degree(16)
                .plain_modulus(17)
                .ciph_modulus(BigUint::from(4_611_686_018_427_387_904u64))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn encrypt_produces_a_size_two_ciphertext_of_matching_degree() {
        let par = small_params();
        let mut rng = ChaChaRandomSource::new([9u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let pk = PublicKey::generate(&sk, &mut rng);
        let encryptor = Encryptor::new(pk);

        let pt = Plaintext::new(&par, Polynomial::zero(par.poly_degree));
        let ct = encryptor.encrypt(&pt, &mut rng);
        assert_eq!(ct.c0.ring_degree, par.poly_degree);
        assert_eq!(ct.c1.ring_degree, par.poly_degree);
    }
}
