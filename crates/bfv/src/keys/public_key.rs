//! Public key for the BFV encryption scheme.

use std::rc::Rc;

use fhe_math::poly::Polynomial;
use fhe_math::sampling::RandomSource;
use num_bigint::BigInt;

use crate::keys::SecretKey;
use crate::parameters::BfvParameters;

/// Public key `(p0, p1)` satisfying `p0 = -(e + p1 * s) mod q`, matching
/// `bfv_key_generator.py`'s `generate_public_key`.
#[derive(Debug, PartialEq)]
pub struct PublicKey {
    par: Rc<BfvParameters>,
    pub(crate) p0: Polynomial,
    pub(crate) p1: Polynomial,
}

impl PublicKey {
    pub fn generate(sk: &SecretKey, rng: &mut impl RandomSource) -> Self {
        let par = sk.parameters();
        let n = par.poly_degree;
        let q = &par.ciph_modulus;

        let p1 = Polynomial::new(n, rng.uniform_big(&BigInt::from(q.clone()), n))
            .expect("uniform_big returns N values");
        let error: Vec<BigInt> = rng.triangle(n).into_iter().map(BigInt::from).collect();
        let error = Polynomial::new(n, error).expect("triangle sampler returns N values");

        let p1_s = p1
            .multiply(sk.poly(), q, None, None)
            .expect("degree-matched multiplication");
        let sum = error.add(&p1_s, Some(q)).expect("degree-matched addition");
        let p0 = sum.scalar_multiply(&BigInt::from(-1), Some(q));

        Self { par: par.clone(), p0, p1 }
    }

    pub(crate) fn parameters(&self) -> &Rc<BfvParameters> {
        &self.par
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhe_math::sampling::ChaChaRandomSource;

    #[test]
    fn public_key_satisfies_its_defining_relation() {
        let par = Rc::new(BfvParameters::default(16));
        let mut rng = ChaChaRandomSource::new([3u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let pk = PublicKey::generate(&sk, &mut rng);

        // p0 + p1*s should be small (just the sampled error), not uniform in q.
        let p1_s = pk.p1.multiply(sk.poly(), &par.ciph_modulus, None, None).unwrap();
        let sum = pk.p0.add(&p1_s, Some(&par.ciph_modulus)).unwrap();
        let small = sum.mod_small(&par.ciph_modulus);
        for c in small.coeffs.iter() {
            assert!(*c >= BigInt::from(-1) && *c <= BigInt::from(1));
        }
    }
}
