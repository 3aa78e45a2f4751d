//! Encryption under a CKKS public or secret key.

use std::rc::Rc;

use fhe_math::poly::Polynomial;
use fhe_math::sampling::RandomSource;
use num_bigint::BigInt;

use crate::ciphertext::Ciphertext;
use crate::keys::{PublicKey, SecretKey};
use crate::parameters::CkksParameters;
use crate::plaintext::Plaintext;
use crate::poly::CkksPoly;

/// Encrypts plaintexts under a fixed public key, and optionally a secret key
/// for the reference's secret-key encryption path.
///
/// Matches `ckks_encryptor.py`: `c0 = e1 + p0*u + m`, `c1 = e2 + p1*u` for
/// public-key encryption, and `c0 = s*u + e + m`, `c1 = -u` for secret-key
/// encryption. Both paths start every fresh ciphertext at `par.ciph_modulus`.
pub struct Encryptor {
    par: Rc<CkksParameters>,
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
        let u = CkksPoly::from_polynomial(Polynomial::new(n, u).expect("triangle sampler returns N values"), &self.par);

        let (e1, e2) = if self.par.include_encryption_errors {
            let e1: Vec<BigInt> = rng.triangle(n).into_iter().map(BigInt::from).collect();
            let e2: Vec<BigInt> = rng.triangle(n).into_iter().map(BigInt::from).collect();
            (
                CkksPoly::from_polynomial(Polynomial::new(n, e1).expect("triangle sampler returns N values"), &self.par),
                CkksPoly::from_polynomial(Polynomial::new(n, e2).expect("triangle sampler returns N values"), &self.par),
            )
        } else {
            (CkksPoly::zero(&self.par), CkksPoly::zero(&self.par))
        };

        let p0_u = self.pk.p0.multiply(&u, q).expect("degree-matched multiplication");
        let p1_u = self.pk.p1.multiply(&u, q).expect("degree-matched multiplication");

        let c0 = e1
            .add(&p0_u, Some(q))
            .expect("degree-matched addition")
            .add(pt.poly(), Some(q))
            .expect("degree-matched addition")
            .mod_small(q);
        let c1 = e2.add(&p1_u, Some(q)).expect("degree-matched addition").mod_small(q);

        Ciphertext::new(&self.par, c0, c1, pt.scaling_factor(), q.clone())
    }

    /// Encrypts directly under the secret key, bypassing the public key.
    pub fn encrypt_with_secret_key(sk: &SecretKey, pt: &Plaintext, rng: &mut impl RandomSource) -> Ciphertext {
        let par = sk.parameters();
        let n = par.poly_degree;
        let q = &par.ciph_modulus;

        let u: Vec<BigInt> = rng.triangle(n).into_iter().map(BigInt::from).collect();
        let u = CkksPoly::from_polynomial(Polynomial::new(n, u).expect("triangle sampler returns N values"), par);

        let e = if par.include_encryption_errors {
            let e: Vec<BigInt> = rng.triangle(n).into_iter().map(BigInt::from).collect();
            CkksPoly::from_polynomial(Polynomial::new(n, e).expect("triangle sampler returns N values"), par)
        } else {
            CkksPoly::zero(par)
        };

        let s_u = sk.poly().multiply(&u, q).expect("degree-matched multiplication");
        let c0 = s_u
            .add(&e, Some(q))
            .expect("degree-matched addition")
            .add(pt.poly(), Some(q))
            .expect("degree-matched addition")
            .mod_small(q);
        let c1 = u.scalar_multiply(&BigInt::from(-1), Some(q)).mod_small(q);

        Ciphertext::new(par, c0, c1, pt.scaling_factor(), q.clone())
    }
}
