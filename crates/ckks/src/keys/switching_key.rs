//! Key-switching keys shared by relinearization, rotation, and conjugation.

use std::rc::Rc;

use fhe_math::poly::Polynomial;
use fhe_math::sampling::RandomSource;
use num_bigint::BigInt;

use crate::keys::SecretKey;
use crate::parameters::CkksParameters;
use crate::poly::CkksPoly;

/// A key that switches a ciphertext term encrypted under `new_key` back to
/// one encrypted under the original secret key, generated modulo `Q^2`.
///
/// Matches `ckks_key_generator.py`'s `ksgen`: `sw0 = -(a*s) + e + Q*new_key
/// (mod Q^2)`, `sw1 = a`.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchingKey {
    pub(crate) p0: CkksPoly,
    pub(crate) p1: CkksPoly,
}

impl SwitchingKey {
    pub(crate) fn generate(
        par: &Rc<CkksParameters>,
        sk: &SecretKey,
        new_key: &CkksPoly,
        rng: &mut impl RandomSource,
    ) -> Self {
        let n = par.poly_degree;
        let big = &par.big_modulus;
        let mod_squared = big * big;

        let a = CkksPoly::from_polynomial(
            Polynomial::new(n, rng.uniform_big(&BigInt::from(mod_squared.clone()), n)).expect("uniform_big returns N values"),
            par,
        );
        let error: Vec<BigInt> = rng.triangle(n).into_iter().map(BigInt::from).collect();
        let error = CkksPoly::from_polynomial(Polynomial::new(n, error).expect("triangle sampler returns N values"), par);

        let a_s = a.multiply(sk.poly(), &mod_squared).expect("degree-matched multiplication");
        let negated = a_s
            .add(&error, Some(&mod_squared))
            .expect("degree-matched addition")
            .scalar_multiply(&BigInt::from(-1), Some(&mod_squared));
        let scaled_new_key = new_key.scalar_multiply(&BigInt::from(big.clone()), Some(&mod_squared));
        let p0 = negated
            .add(&scaled_new_key, Some(&mod_squared))
            .expect("degree-matched addition")
            .mod_(&mod_squared);

        Self { p0, p1: a }
    }

    /// The conjugation key: a switching key from `s.conjugate()` back to `s`.
    pub fn generate_conj_key(par: &Rc<CkksParameters>, sk: &SecretKey, rng: &mut impl RandomSource) -> Self {
        let conjugated = sk.poly().conjugate();
        Self::generate(par, sk, &conjugated, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::CkksParameters;
    use fhe_math::sampling::ChaChaRandomSource;

    #[test]
    fn conj_key_switches_a_conjugated_secret_back() {
        let par = Rc::new(CkksParameters::default(16));
        let mut rng = ChaChaRandomSource::new([17u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let key = SwitchingKey::generate_conj_key(&par, &sk, &mut rng);
        assert_eq!(key.p0.ring_degree(), par.poly_degree);
        assert_eq!(key.p1.ring_degree(), par.poly_degree);
    }
}
