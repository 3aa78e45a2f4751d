//! The ring-element representation `Ciphertext`, `Plaintext`, and every key
//! type store: either a single big-modulus [`Polynomial`], or an RNS/CRT
//! chain of [`DcrtPolynomial`] residues, chosen once by
//! [`CkksParameters::prime_size`] and carried alongside the residues so every
//! later operation knows which chain they belong to. Scheme code (encoder,
//! encryptor, decryptor, evaluator, keys) calls the same methods regardless
//! of which variant is active; only this module knows the difference.

use std::rc::Rc;

use fhe_math::crt::CrtContext;
use fhe_math::dcrt::DcrtPolynomial;
use fhe_math::poly::Polynomial;
use num_bigint::{BigInt, BigUint};

use crate::error::{Error, Result};
use crate::parameters::CkksParameters;

#[derive(Debug, Clone, PartialEq)]
pub enum CkksPoly {
    Single(Polynomial),
    Rns(DcrtPolynomial, Rc<CrtContext>),
}

fn shape_mismatch() -> Error {
    Error::Math(fhe_math::Error::InvalidParameter(
        "cannot combine a single-modulus and an RNS/CRT polynomial".into(),
    ))
}

impl CkksPoly {
    pub fn zero(par: &CkksParameters) -> Self {
        Self::from_polynomial(Polynomial::zero(par.degree()), par)
    }

    /// Wraps a plain polynomial, splitting it into RNS residues when `par`
    /// has a `prime_size` configured.
    pub fn from_polynomial(p: Polynomial, par: &CkksParameters) -> Self {
        match par.crt_context() {
            Some(crt) => CkksPoly::Rns(DcrtPolynomial::from_polynomial(&p, crt), crt.clone()),
            None => CkksPoly::Single(p),
        }
    }

    /// Reconstructs the represented polynomial, via CRT in RNS mode.
    pub fn to_polynomial(&self) -> Polynomial {
        match self {
            CkksPoly::Single(p) => p.clone(),
            CkksPoly::Rns(d, crt) => d
                .reconstruct(crt)
                .expect("a DcrtPolynomial always matches the shape of its own CrtContext"),
        }
    }

    pub fn ring_degree(&self) -> usize {
        match self {
            CkksPoly::Single(p) => p.ring_degree,
            CkksPoly::Rns(d, _) => d.ring_degree,
        }
    }

    pub fn add(&self, other: &Self, coeff_modulus: Option<&BigUint>) -> Result<Self> {
        match (self, other) {
            (CkksPoly::Single(a), CkksPoly::Single(b)) => Ok(CkksPoly::Single(a.add(b, coeff_modulus)?)),
            (CkksPoly::Rns(a, crt), CkksPoly::Rns(b, _)) => {
                let sum = a.add(b, crt)?;
                let sum = match coeff_modulus {
                    Some(m) => sum.mod_(m, crt)?,
                    None => sum,
                };
                Ok(CkksPoly::Rns(sum, crt.clone()))
            }
            _ => Err(shape_mismatch()),
        }
    }

    pub fn subtract(&self, other: &Self, coeff_modulus: Option<&BigUint>) -> Result<Self> {
        match (self, other) {
            (CkksPoly::Single(a), CkksPoly::Single(b)) => Ok(CkksPoly::Single(a.subtract(b, coeff_modulus)?)),
            (CkksPoly::Rns(a, crt), CkksPoly::Rns(b, _)) => {
                let diff = a.subtract(b, crt)?;
                let diff = match coeff_modulus {
                    Some(m) => diff.mod_(m, crt)?,
                    None => diff,
                };
                Ok(CkksPoly::Rns(diff, crt.clone()))
            }
            _ => Err(shape_mismatch()),
        }
    }

    /// Multiplies, dispatching to the per-prime NTT chain in RNS mode. The
    /// RNS chain's own prime product essentially never equals `coeff_modulus`
    /// (which moves across rescales and key-switches), so the native product
    /// is reduced down to it afterward rather than trusted directly; in
    /// single-modulus mode this is exactly `Polynomial::multiply`'s
    /// schoolbook path, as before.
    pub fn multiply(&self, other: &Self, coeff_modulus: &BigUint) -> Result<Self> {
        match (self, other) {
            (CkksPoly::Single(a), CkksPoly::Single(b)) => {
                Ok(CkksPoly::Single(a.multiply(b, coeff_modulus, None, None)?))
            }
            (CkksPoly::Rns(a, crt), CkksPoly::Rns(b, _)) => {
                let prod = a.multiply(b, crt)?;
                Ok(CkksPoly::Rns(prod.mod_(coeff_modulus, crt)?, crt.clone()))
            }
            _ => Err(shape_mismatch()),
        }
    }

    pub fn scalar_multiply(&self, scalar: &BigInt, coeff_modulus: Option<&BigUint>) -> Self {
        match self {
            CkksPoly::Single(p) => CkksPoly::Single(p.scalar_multiply(scalar, coeff_modulus)),
            CkksPoly::Rns(d, crt) => {
                let prod = d.scalar_multiply(scalar, crt);
                let prod = match coeff_modulus {
                    Some(m) => prod.mod_(m, crt).expect("scalar_multiply preserves shape"),
                    None => prod,
                };
                CkksPoly::Rns(prod, crt.clone())
            }
        }
    }

    pub fn scalar_integer_divide(&self, scalar: &BigInt, coeff_modulus: Option<&BigUint>) -> Self {
        match self {
            CkksPoly::Single(p) => CkksPoly::Single(p.scalar_integer_divide(scalar, coeff_modulus)),
            CkksPoly::Rns(d, crt) => {
                let divided = d
                    .scalar_integer_divide(scalar, crt)
                    .expect("scalar_integer_divide preserves shape");
                let divided = match coeff_modulus {
                    Some(m) => divided.mod_(m, crt).expect("mod_ preserves shape"),
                    None => divided,
                };
                CkksPoly::Rns(divided, crt.clone())
            }
        }
    }

    pub fn rotate(&self, r: u64) -> Self {
        match self {
            CkksPoly::Single(p) => CkksPoly::Single(p.rotate(r)),
            CkksPoly::Rns(d, crt) => CkksPoly::Rns(d.rotate(r), crt.clone()),
        }
    }

    pub fn conjugate(&self) -> Self {
        match self {
            CkksPoly::Single(p) => CkksPoly::Single(p.conjugate()),
            CkksPoly::Rns(d, crt) => CkksPoly::Rns(d.conjugate(), crt.clone()),
        }
    }

    /// Reduces coefficients into `[0, coeff_modulus)`. Bridges via full
    /// reconstruction in RNS mode, for the same reason [`Self::mod_small`]
    /// does.
    pub fn mod_(&self, coeff_modulus: &BigUint) -> Self {
        match self {
            CkksPoly::Single(p) => CkksPoly::Single(p.mod_(coeff_modulus)),
            CkksPoly::Rns(d, crt) => {
                let reduced = d.reconstruct(crt).expect("shape invariant").mod_(coeff_modulus);
                CkksPoly::Rns(DcrtPolynomial::from_polynomial(&reduced, crt), crt.clone())
            }
        }
    }

    /// Lifts coefficients into `(-coeff_modulus/2, coeff_modulus/2]`. In RNS
    /// mode this reconstructs first: a residue's own per-prime symmetric
    /// range (what [`DcrtPolynomial::mod_small`] gives natively) isn't the
    /// same set as the reconstructed integer's range against an arbitrary
    /// `coeff_modulus`, so the two can't be mixed here.
    pub fn mod_small(&self, coeff_modulus: &BigUint) -> Self {
        match self {
            CkksPoly::Single(p) => CkksPoly::Single(p.mod_small(coeff_modulus)),
            CkksPoly::Rns(d, crt) => {
                let reduced = d.reconstruct(crt).expect("shape invariant").mod_small(coeff_modulus);
                CkksPoly::Rns(DcrtPolynomial::from_polynomial(&reduced, crt), crt.clone())
            }
        }
    }

    /// Zeroes out the underlying coefficients in place, for [`zeroize`] on
    /// secret-key material.
    pub fn zeroize_coeffs(&mut self) {
        match self {
            CkksPoly::Single(p) => {
                for c in p.coeffs.iter_mut() {
                    *c = BigInt::from(0);
                }
            }
            CkksPoly::Rns(d, _) => {
                for poly in d.polys.iter_mut() {
                    for c in poly.coeffs.iter_mut() {
                        *c = BigInt::from(0);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::CkksParametersBuilder;

    fn rns_params() -> CkksParameters {
        CkksParametersBuilder::default()
            .poly_degree(16)
            .ciph_modulus(BigUint::from(1u64) << 40)
            .big_modulus(BigUint::from(1u64) << 1200)
            .scaling_factor((1u64 << 30) as f64)
            .prime_size(59)
            .build()
            .unwrap()
    }

    #[test]
    fn single_mode_round_trips_through_to_polynomial() {
        let par = CkksParameters::default(16);
        let p = Polynomial::from_i64_slice(16, &[1; 16]).unwrap();
        let wrapped = CkksPoly::from_polynomial(p.clone(), &par);
        assert!(matches!(wrapped, CkksPoly::Single(_)));
        assert_eq!(wrapped.to_polynomial().coeffs, p.coeffs);
    }

    #[test]
    fn rns_mode_add_and_multiply_match_plain_polynomial_arithmetic() {
        let par = rns_params();
        let modulus = par.ciph_modulus().clone();
        let a = Polynomial::from_i64_slice(16, &[3; 16]).unwrap();
        let b = Polynomial::from_i64_slice(16, &[4; 16]).unwrap();

        let ca = CkksPoly::from_polynomial(a.clone(), &par);
        let cb = CkksPoly::from_polynomial(b.clone(), &par);
        assert!(matches!(ca, CkksPoly::Rns(..)));

        let sum = ca.add(&cb, Some(&modulus)).unwrap();
        let expected_sum = a.add(&b, Some(&modulus)).unwrap();
        assert_eq!(sum.to_polynomial().mod_small(&modulus).coeffs, expected_sum.mod_small(&modulus).coeffs);

        let prod = ca.multiply(&cb, &modulus).unwrap();
        let expected_prod = a.multiply(&b, &modulus, None, None).unwrap();
        assert_eq!(
            prod.to_polynomial().mod_small(&modulus).coeffs,
            expected_prod.mod_small(&modulus).coeffs
        );
    }

    #[test]
    fn rotate_and_conjugate_agree_across_representations() {
        let par = rns_params();
        let p = Polynomial::from_i64_slice(16, &(0..16i64).collect::<Vec<_>>()).unwrap();
        let single = CkksPoly::Single(p.clone());
        let rns = CkksPoly::from_polynomial(p.clone(), &par);

        assert_eq!(single.rotate(3).to_polynomial().coeffs, rns.rotate(3).to_polynomial().coeffs);
        assert_eq!(single.conjugate().to_polynomial().coeffs, rns.conjugate().to_polynomial().coeffs);
    }

    #[test]
    fn zeroize_coeffs_clears_both_representations() {
        let par = rns_params();
        let p = Polynomial::from_i64_slice(16, &[5; 16]).unwrap();
        let mut rns = CkksPoly::from_polynomial(p, &par);
        rns.zeroize_coeffs();
        assert!(rns.to_polynomial().coeffs.iter().all(|c| *c == BigInt::from(0)));
    }
}
