//! `DCRTPolynomial`: the same contract as [`crate::poly::Polynomial`], but
//! stored as a vector of residue polynomials against a [`CrtContext`] so that
//! every operation dispatches per prime instead of working over a single
//! huge-modulus integer polynomial.

use crate::crt::CrtContext;
use crate::error::{Error, Result};
use crate::poly::Polynomial;
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;

#[derive(Debug, Clone, PartialEq)]
pub struct DcrtPolynomial {
    pub ring_degree: usize,
    /// One residue polynomial per prime in the owning `CrtContext`, with
    /// coefficients in `[0, primes[i])`.
    pub polys: Vec<Polynomial>,
}

impl DcrtPolynomial {
    pub fn from_polynomial(p: &Polynomial, crt: &CrtContext) -> Self {
        let polys = crt
            .primes
            .iter()
            .map(|&prime| p.mod_(&BigUint::from(prime)))
            .collect();
        DcrtPolynomial { ring_degree: p.ring_degree, polys }
    }

    fn check(&self, other: &DcrtPolynomial) -> Result<()> {
        if self.ring_degree != other.ring_degree || self.polys.len() != other.polys.len() {
            return Err(Error::InvalidParameter(
                "DCRT polynomial shape mismatch".into(),
            ));
        }
        Ok(())
    }

    pub fn add(&self, other: &DcrtPolynomial, crt: &CrtContext) -> Result<DcrtPolynomial> {
        self.check(other)?;
        let mut polys = Vec::with_capacity(self.polys.len());
        for i in 0..self.polys.len() {
            polys.push(
                self.polys[i]
                    .add(&other.polys[i], Some(&BigUint::from(crt.primes[i])))?,
            );
        }
        Ok(DcrtPolynomial { ring_degree: self.ring_degree, polys })
    }

    pub fn subtract(&self, other: &DcrtPolynomial, crt: &CrtContext) -> Result<DcrtPolynomial> {
        self.check(other)?;
        let mut polys = Vec::with_capacity(self.polys.len());
        for i in 0..self.polys.len() {
            polys.push(
                self.polys[i]
                    .subtract(&other.polys[i], Some(&BigUint::from(crt.primes[i])))?,
            );
        }
        Ok(DcrtPolynomial { ring_degree: self.ring_degree, polys })
    }

    pub fn multiply(&self, other: &DcrtPolynomial, crt: &CrtContext) -> Result<DcrtPolynomial> {
        self.check(other)?;
        let mut polys = Vec::with_capacity(self.polys.len());
        for i in 0..self.polys.len() {
            polys.push(self.polys[i].multiply(
                &other.polys[i],
                &BigUint::from(crt.primes[i]),
                Some(&crt.ntts[i]),
                None,
            )?);
        }
        Ok(DcrtPolynomial { ring_degree: self.ring_degree, polys })
    }

    pub fn scalar_multiply(&self, scalar: &BigInt, crt: &CrtContext) -> DcrtPolynomial {
        let polys = self
            .polys
            .iter()
            .enumerate()
            .map(|(i, p)| p.scalar_multiply(scalar, Some(&BigUint::from(crt.primes[i]))))
            .collect();
        DcrtPolynomial { ring_degree: self.ring_degree, polys }
    }

    pub fn rotate(&self, r: u64) -> DcrtPolynomial {
        let polys = self.polys.iter().map(|p| p.rotate(r)).collect();
        DcrtPolynomial { ring_degree: self.ring_degree, polys }
    }

    pub fn conjugate(&self) -> DcrtPolynomial {
        let polys = self.polys.iter().map(|p| p.conjugate()).collect();
        DcrtPolynomial { ring_degree: self.ring_degree, polys }
    }

    pub fn mod_small(&self, crt: &CrtContext) -> DcrtPolynomial {
        let polys = self
            .polys
            .iter()
            .enumerate()
            .map(|(i, p)| p.mod_small(&BigUint::from(crt.primes[i])))
            .collect();
        DcrtPolynomial { ring_degree: self.ring_degree, polys }
    }

    /// Reduces to an arbitrary modulus, not necessarily a product of
    /// `crt.primes`. Residue-wise reduction only works against the CRT's own
    /// primes, so this reconstructs the represented integer first.
    pub fn mod_(&self, modulus: &BigUint, crt: &CrtContext) -> Result<DcrtPolynomial> {
        let reduced = self.reconstruct(crt)?.mod_(modulus);
        Ok(DcrtPolynomial::from_polynomial(&reduced, crt))
    }

    /// Floor-divides the represented integer by `scalar`. Division by a
    /// non-unit scalar isn't residue-wise (a value divisible by `scalar`
    /// modulo one prime need not be mod another), so this reconstructs,
    /// divides, and re-splits.
    pub fn scalar_integer_divide(&self, scalar: &BigInt, crt: &CrtContext) -> Result<DcrtPolynomial> {
        let divided = self.reconstruct(crt)?.scalar_integer_divide(scalar, None);
        Ok(DcrtPolynomial::from_polynomial(&divided, crt))
    }

    /// Identity: every residue polynomial already holds an integer modulo
    /// its prime, so there is nothing to round.
    pub fn round(&self) -> DcrtPolynomial {
        self.clone()
    }

    /// Identity, for the same reason as [`Self::round`].
    pub fn floor(&self) -> DcrtPolynomial {
        self.clone()
    }

    /// Horner-evaluates the represented integer polynomial at `x`.
    pub fn evaluate(&self, x: &BigInt, crt: &CrtContext) -> Result<BigInt> {
        Ok(self.reconstruct(crt)?.evaluate(x))
    }

    /// Low-digit-first base-`B` decomposition of the represented integer,
    /// each digit re-split back into residues against the same `crt`.
    pub fn base_decompose(&self, base: &BigInt, num_levels: usize, crt: &CrtContext) -> Result<Vec<DcrtPolynomial>> {
        let reconstructed = self.reconstruct(crt)?;
        Ok(reconstructed
            .base_decompose(base, num_levels)
            .iter()
            .map(|digit| DcrtPolynomial::from_polynomial(digit, crt))
            .collect())
    }

    /// Reconstructs the represented big-integer polynomial via CRT.
    pub fn reconstruct(&self, crt: &CrtContext) -> Result<Polynomial> {
        let mut coeffs = Vec::with_capacity(self.ring_degree);
        for i in 0..self.ring_degree {
            let residues: Vec<u64> = self
                .polys
                .iter()
                .map(|p| p.coeffs[i].to_u64().unwrap_or(0))
                .collect();
            coeffs.push(BigInt::from(crt.reconstruct(&residues)?));
        }
        Polynomial::new(self.ring_degree, coeffs)
    }
}

impl crate::ring::RingElement for DcrtPolynomial {
    type Context = CrtContext;

    fn ring_degree(&self) -> usize {
        self.ring_degree
    }

    fn add(&self, other: &Self, ctx: &CrtContext) -> Result<Self> {
        DcrtPolynomial::add(self, other, ctx)
    }

    fn subtract(&self, other: &Self, ctx: &CrtContext) -> Result<Self> {
        DcrtPolynomial::subtract(self, other, ctx)
    }

    fn multiply(&self, other: &Self, ctx: &CrtContext) -> Result<Self> {
        DcrtPolynomial::multiply(self, other, ctx)
    }

    fn scalar_multiply(&self, scalar: &BigInt, ctx: &CrtContext) -> Self {
        DcrtPolynomial::scalar_multiply(self, scalar, ctx)
    }

    fn rotate(&self, r: u64) -> Self {
        DcrtPolynomial::rotate(self, r)
    }

    fn conjugate(&self) -> Self {
        DcrtPolynomial::conjugate(self)
    }

    fn mod_small(&self, ctx: &CrtContext) -> Self {
        DcrtPolynomial::mod_small(self, ctx)
    }
}
