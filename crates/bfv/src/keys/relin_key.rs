//! Relinearization key for the BFV scheme (version-1 construction).

use std::rc::Rc;

use fhe_math::poly::Polynomial;
use fhe_math::sampling::RandomSource;
use num_bigint::BigInt;
use num_traits::One;

use crate::keys::SecretKey;
use crate::parameters::BfvParameters;

/// A version-1 BFV relinearization key: a digit decomposition of `s^2` in
/// base `par.relin_base`, each digit encrypted under `s`.
///
/// Matches `bfv_key_generator.py`'s `generate_relin_key`.
#[derive(Debug, PartialEq)]
pub struct RelinKey {
    par: Rc<BfvParameters>,
    pub(crate) keys: Vec<(Polynomial, Polynomial)>,
}

impl RelinKey {
    pub fn generate(sk: &SecretKey, rng: &mut impl RandomSource) -> Self {
        let par = sk.parameters();
        let n = par.poly_degree;
        let q = &par.ciph_modulus;
        let base = BigInt::from(par.relin_base.clone());

        let sk_squared = sk
            .poly()
            .multiply(sk.poly(), q, None, None)
            .expect("degree-matched multiplication");

        let mut keys = Vec::with_capacity(par.relin_num_levels);
        let mut power = BigInt::one();
        for _ in 0..par.relin_num_levels {
            let k1 = Polynomial::new(n, rng.uniform_big(&BigInt::from(q.clone()), n))
                .expect("uniform_big returns N values");
            let error: Vec<BigInt> = rng.triangle(n).into_iter().map(BigInt::from).collect();
            let error = Polynomial::new(n, error).expect("triangle sampler returns N values");

            let s_k1 = sk
                .poly()
                .multiply(&k1, q, None, None)
                .expect("degree-matched multiplication");
            let negated = s_k1
                .add(&error, Some(q))
                .expect("degree-matched addition")
                .scalar_multiply(&BigInt::from(-1), Some(q));
            let scaled_sk_squared = sk_squared.scalar_multiply(&power, Some(q));
            let k0 = negated
                .add(&scaled_sk_squared, Some(q))
                .expect("degree-matched addition")
                .mod_(q);

            keys.push((k0, k1));
            power = (&power * &base) % BigInt::from(q.clone());
        }

        Self { par: par.clone(), keys }
    }

    pub fn base(&self) -> &num_bigint::BigUint {
        &self.par.relin_base
    }

    pub fn levels(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhe_math::sampling::ChaChaRandomSource;

    #[test]
    fn relin_key_has_one_pair_per_digit() {
        let par = Rc::new(BfvParameters::default(16));
        let mut rng = ChaChaRandomSource::new([5u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let rk = RelinKey::generate(&sk, &mut rng);
        assert_eq!(rk.levels(), par.relin_num_levels);
    }
}
