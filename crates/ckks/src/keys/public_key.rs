//! Public key for the CKKS encryption scheme.

use std::rc::Rc;

use fhe_math::poly::Polynomial;
use fhe_math::sampling::RandomSource;
use num_bigint::BigInt;

use crate::keys::SecretKey;
use crate::parameters::CkksParameters;
use crate::poly::CkksPoly;

/// Public key `(p0, p1)` satisfying `p0 = -(e + p1 * s) mod Q`, matching
/// `ckks_key_generator.py`'s `generate_public_key`.
///
/// Generated modulo the key-switching modulus `Q`, not the ciphertext
/// modulus `q` — a deliberate asymmetry carried over from the reference: an
/// encryption under this key starts its life one modulus level "above"
/// where `q` alone would place it, matching every ciphertext this crate ever
/// produces starting out at `par.ciph_modulus`.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicKey {
    par: Rc<CkksParameters>,
    pub(crate) p0: CkksPoly,
    pub(crate) p1: CkksPoly,
}

impl PublicKey {
    pub fn generate(sk: &SecretKey, rng: &mut impl RandomSource) -> Self {
        let par = sk.parameters();
        let n = par.poly_degree;
        let q = &par.big_modulus;

        let p1 = CkksPoly::from_polynomial(
            Polynomial::new(n, rng.uniform_big(&BigInt::from(q.clone()), n)).expect("uniform_big returns N values"),
            par,
        );
        let error: Vec<BigInt> = rng.triangle(n).into_iter().map(BigInt::from).collect();
        let error = CkksPoly::from_polynomial(Polynomial::new(n, error).expect("triangle sampler returns N values"), par);

        let p1_s = p1.multiply(sk.poly(), q).expect("degree-matched multiplication");
        let sum = error.add(&p1_s, Some(q)).expect("degree-matched addition");
        let p0 = sum.scalar_multiply(&BigInt::from(-1), Some(q));

        Self { par: par.clone(), p0, p1 }
    }

    pub(crate) fn parameters(&self) -> &Rc<CkksParameters> {
        &self.par
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhe_math::sampling::ChaChaRandomSource;

    #[test]
    fn public_key_satisfies_its_defining_relation() {
        let par = Rc::new(CkksParameters::default(16));
        let mut rng = ChaChaRandomSource::new([3u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let pk = PublicKey::generate(&sk, &mut rng);

        let p1_s = pk.p1.multiply(sk.poly(), &par.big_modulus).unwrap();
        let sum = pk.p0.add(&p1_s, Some(&par.big_modulus)).unwrap();
        let small = sum.mod_small(&par.big_modulus).to_polynomial();
        for c in small.coeffs.iter() {
            assert!(*c >= BigInt::from(-1) && *c <= BigInt::from(1));
        }
    }
}
