//! Polynomial arithmetic over `R = Z[x]/(x^N + 1)` and its residue rings.
//!
//! Coefficients are arbitrary-precision signed integers: ciphertext moduli
//! in the schemes built on this crate routinely exceed 1200 bits, well
//! beyond any host integer type.

use crate::crt::CrtContext;
use crate::error::{Error, Result};
use crate::fft::FftContext;
use crate::ntt::NttContext;
use num_bigint::{BigInt, BigUint};
use num_complex::Complex64;
use num_integer::Integer;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

/// An element of `R` (or, once reduced, of `R_q`): a length-`N` vector of
/// coefficients, `coeffs[i]` being the coefficient of `x^i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    pub ring_degree: usize,
    pub coeffs: Vec<BigInt>,
}

fn mod_nonneg(c: &BigInt, modulus: &BigUint) -> BigInt {
    let m = BigInt::from(modulus.clone());
    ((c % &m) + &m) % &m
}

impl Polynomial {
    pub fn new(ring_degree: usize, coeffs: Vec<BigInt>) -> Result<Self> {
        if coeffs.len() != ring_degree {
            return Err(Error::InvalidParameter(format!(
                "polynomial coefficient count {} does not match ring degree {}",
                coeffs.len(),
                ring_degree
            )));
        }
        Ok(Polynomial { ring_degree, coeffs })
    }

    pub fn zero(ring_degree: usize) -> Self {
        Polynomial {
            ring_degree,
            coeffs: vec![BigInt::zero(); ring_degree],
        }
    }

    pub fn from_i64_slice(ring_degree: usize, coeffs: &[i64]) -> Result<Self> {
        Self::new(ring_degree, coeffs.iter().map(|&c| BigInt::from(c)).collect())
    }

    pub fn add(&self, other: &Polynomial, coeff_modulus: Option<&BigUint>) -> Result<Polynomial> {
        self.check_degree(other)?;
        let coeffs = (0..self.ring_degree)
            .map(|i| &self.coeffs[i] + &other.coeffs[i])
            .collect();
        let sum = Polynomial { ring_degree: self.ring_degree, coeffs };
        Ok(match coeff_modulus {
            Some(q) => sum.mod_(q),
            None => sum,
        })
    }

    pub fn subtract(&self, other: &Polynomial, coeff_modulus: Option<&BigUint>) -> Result<Polynomial> {
        self.check_degree(other)?;
        let coeffs = (0..self.ring_degree)
            .map(|i| &self.coeffs[i] - &other.coeffs[i])
            .collect();
        let diff = Polynomial { ring_degree: self.ring_degree, coeffs };
        Ok(match coeff_modulus {
            Some(q) => diff.mod_(q),
            None => diff,
        })
    }

    fn check_degree(&self, other: &Polynomial) -> Result<()> {
        if self.ring_degree != other.ring_degree {
            return Err(Error::InvalidParameter(format!(
                "ring degree mismatch: {} != {}",
                self.ring_degree, other.ring_degree
            )));
        }
        Ok(())
    }

    /// Dispatches to `multiply_crt`, NTT-based, or schoolbook multiplication.
    pub fn multiply(
        &self,
        other: &Polynomial,
        coeff_modulus: &BigUint,
        ntt: Option<&NttContext>,
        crt: Option<&CrtContext>,
    ) -> Result<Polynomial> {
        if let Some(crt) = crt {
            return self.multiply_crt(other, crt);
        }
        if let Some(ntt) = ntt {
            let q = coeff_modulus.to_u64().ok_or_else(|| {
                Error::InvalidParameter("NTT multiplication requires a modulus that fits in u64".into())
            })?;
            let a = ntt.ftt_fwd(&self.to_u64_coeffs(q))?;
            let b = ntt.ftt_fwd(&other.to_u64_coeffs(q))?;
            let ab: Vec<u64> = a
                .iter()
                .zip(b.iter())
                .map(|(&x, &y)| ((x as u128 * y as u128) % q as u128) as u64)
                .collect();
            let prod = ntt.ftt_inv(&ab)?;
            return Polynomial::new(
                self.ring_degree,
                prod.into_iter().map(BigInt::from).collect(),
            );
        }
        Ok(self.multiply_naive(other, Some(coeff_modulus)))
    }

    fn to_u64_coeffs(&self, q: u64) -> Vec<u64> {
        let qb = BigUint::from(q);
        self.coeffs
            .iter()
            .map(|c| {
                let r = mod_nonneg(c, &qb);
                r.to_u64().unwrap_or(0)
            })
            .collect()
    }

    /// Multiplies via per-prime NTT in a [`CrtContext`], then CRT-reconstructs.
    pub fn multiply_crt(&self, other: &Polynomial, crt: &CrtContext) -> Result<Polynomial> {
        self.check_degree(other)?;
        let mut residue_products = Vec::with_capacity(crt.num_primes());
        for (i, &p) in crt.primes.iter().enumerate() {
            let prod = self.multiply(other, &BigUint::from(p), Some(&crt.ntts[i]), None)?;
            residue_products.push(prod);
        }

        let mut final_coeffs = Vec::with_capacity(self.ring_degree);
        for i in 0..self.ring_degree {
            let values: Vec<u64> = residue_products
                .iter()
                .map(|p| p.coeffs[i].to_u64().unwrap_or(0))
                .collect();
            final_coeffs.push(BigInt::from(crt.reconstruct(&values)?));
        }

        Ok(Polynomial::new(self.ring_degree, final_coeffs)?.mod_small(&crt.modulus))
    }

    /// Multiplies via a zero-padded FFT of length `4N`, folding the
    /// negacyclic wraparound, and rounds the result back to integers.
    pub fn multiply_fft(&self, other: &Polynomial) -> Result<Polynomial> {
        self.check_degree(other)?;
        let n = self.ring_degree;
        let fft = FftContext::new(n * 8);

        let pad = |p: &Polynomial| -> Vec<Complex64> {
            let mut v: Vec<Complex64> = p
                .coeffs
                .iter()
                .map(|c| Complex64::new(c.to_f64_lossy(), 0.0))
                .collect();
            v.resize(2 * n, Complex64::new(0.0, 0.0));
            v
        };

        let a = fft.fft_fwd(&pad(self));
        let b = fft.fft_fwd(&pad(other));
        let ab: Vec<Complex64> = a.iter().zip(b.iter()).map(|(&x, &y)| x * y).collect();
        let prod = fft.fft_inv(&ab);

        let mut poly_prod = vec![Complex64::new(0.0, 0.0); n];
        for d in 0..(2 * n - 1) {
            let index = d % n;
            let sign = if d < n { 1.0 } else { -1.0 };
            poly_prod[index] += prod[d] * sign;
        }

        Polynomial::round_from_complex(n, &poly_prod)
    }

    /// O(N^2) schoolbook negacyclic multiplication.
    pub fn multiply_naive(&self, other: &Polynomial, coeff_modulus: Option<&BigUint>) -> Polynomial {
        let n = self.ring_degree;
        let mut coeffs = vec![BigInt::zero(); n];
        for d in 0..(2 * n - 1) {
            let index = d % n;
            let sign = if d < n { BigInt::from(1) } else { BigInt::from(-1) };
            let mut coeff = BigInt::zero();
            for i in 0..n {
                if d >= i && d - i < n {
                    coeff += &self.coeffs[i] * &other.coeffs[d - i];
                }
            }
            coeffs[index] += &sign * coeff;
            if let Some(q) = coeff_modulus {
                coeffs[index] = mod_nonneg(&coeffs[index], q);
            }
        }
        Polynomial { ring_degree: n, coeffs }
    }

    pub fn scalar_multiply(&self, scalar: &BigInt, coeff_modulus: Option<&BigUint>) -> Polynomial {
        let coeffs = self
            .coeffs
            .iter()
            .map(|c| {
                let prod = c * scalar;
                match coeff_modulus {
                    Some(q) => mod_nonneg(&prod, q),
                    None => prod,
                }
            })
            .collect();
        Polynomial { ring_degree: self.ring_degree, coeffs }
    }

    /// Floor division by `scalar` (towards negative infinity, matching
    /// Python's `//`), with an optional final reduction.
    pub fn scalar_integer_divide(&self, scalar: &BigInt, coeff_modulus: Option<&BigUint>) -> Polynomial {
        let coeffs = self
            .coeffs
            .iter()
            .map(|c| {
                let q = c.div_floor(scalar);
                match coeff_modulus {
                    Some(m) => mod_nonneg(&q, m),
                    None => q,
                }
            })
            .collect();
        Polynomial { ring_degree: self.ring_degree, coeffs }
    }

    /// Applies the Galois automorphism `X -> X^(5^r)`, the one-unit plaintext
    /// slot rotation.
    pub fn rotate(&self, r: u64) -> Polynomial {
        let n = self.ring_degree;
        let two_n = (2 * n) as u64;
        let k = mod_pow_u64(5, r, two_n);
        let mut coeffs = vec![BigInt::zero(); n];
        for i in 0..n {
            let index = ((i as u64 * k) % two_n) as usize;
            if index < n {
                coeffs[index] = self.coeffs[i].clone();
            } else {
                coeffs[index - n] = -self.coeffs[i].clone();
            }
        }
        Polynomial { ring_degree: n, coeffs }
    }

    /// Applies `X -> X^(-1)`.
    pub fn conjugate(&self) -> Polynomial {
        let n = self.ring_degree;
        let mut coeffs = vec![BigInt::zero(); n];
        coeffs[0] = self.coeffs[0].clone();
        for i in 1..n {
            coeffs[i] = -self.coeffs[n - i].clone();
        }
        Polynomial { ring_degree: n, coeffs }
    }

    /// Identity on an already-integer polynomial; integer polynomials are
    /// always "rounded". Complex intermediate results from `multiply_fft`
    /// round through [`Self::round_from_complex`] instead.
    pub fn round(&self) -> Polynomial {
        self.clone()
    }

    /// Truncates each coefficient towards zero, mirroring the reference's
    /// use of `int(c)` on the float-scaled coefficients produced inside
    /// `base_decompose`. Since this crate's `Polynomial` never stores floats,
    /// this is only meaningful as a semantic note: `base_decompose` below
    /// performs the equivalent floor-division directly on `BigInt`s.
    pub fn floor(&self) -> Polynomial {
        self.clone()
    }

    pub fn mod_(&self, coeff_modulus: &BigUint) -> Polynomial {
        let coeffs = self.coeffs.iter().map(|c| mod_nonneg(c, coeff_modulus)).collect();
        Polynomial { ring_degree: self.ring_degree, coeffs }
    }

    /// Lifts coefficients into `(-q/2, q/2]`.
    pub fn mod_small(&self, coeff_modulus: &BigUint) -> Polynomial {
        let m = BigInt::from(coeff_modulus.clone());
        let half = &m / 2;
        let coeffs = self
            .coeffs
            .iter()
            .map(|c| {
                let r = mod_nonneg(c, coeff_modulus);
                if r > half {
                    r - &m
                } else {
                    r
                }
            })
            .collect();
        Polynomial { ring_degree: self.ring_degree, coeffs }
    }

    /// Low-digit-first base-`B` decomposition: `self == sum_i base^i *
    /// decomposed[i] (mod base^num_levels)`.
    pub fn base_decompose(&self, base: &BigInt, num_levels: usize) -> Vec<Polynomial> {
        let base_u = base.to_biguint().expect("base must be positive");
        let mut decomposed = Vec::with_capacity(num_levels);
        let mut poly = self.clone();
        for _ in 0..num_levels {
            decomposed.push(poly.mod_(&base_u));
            poly = poly.scalar_integer_divide(base, None);
        }
        decomposed
    }

    /// Horner evaluation of the polynomial at `x`.
    pub fn evaluate(&self, x: &BigInt) -> BigInt {
        let mut result = self.coeffs[self.ring_degree - 1].clone();
        for i in (0..self.ring_degree - 1).rev() {
            result = result * x + &self.coeffs[i];
        }
        result
    }

    /// Scales every coefficient by a floating-point `factor` and rounds
    /// back to an integer with round-half-to-even, folding what the
    /// reference expresses as `scalar_multiply(factor).round()` into one
    /// step. `factor` is typically `1/scaling_factor` in the decryptors and
    /// evaluators of both schemes. Coefficients are converted through `f64`,
    /// so this loses precision for coefficients near or beyond 2^53 — the
    /// same floating-point scaling factor the reference uses.
    pub fn scale_and_round(&self, factor: f64) -> Polynomial {
        let coeffs = self
            .coeffs
            .iter()
            .map(|c| bigint_from_f64_round_half_even(c.to_f64_lossy() * factor))
            .collect();
        Polynomial { ring_degree: self.ring_degree, coeffs }
    }

    /// Rounds a complex-valued intermediate (as produced by `multiply_fft`)
    /// back into an integer `Polynomial`, using round-half-to-even and
    /// asserting the discarded imaginary part is negligible.
    pub fn round_from_complex(ring_degree: usize, values: &[Complex64]) -> Result<Polynomial> {
        const EPSILON: f64 = 1e-6;
        let mut coeffs = Vec::with_capacity(ring_degree);
        for v in values {
            if v.im.abs() >= EPSILON {
                return Err(Error::InvalidParameter(format!(
                    "discarded imaginary part {} exceeds tolerance {}",
                    v.im, EPSILON
                )));
            }
            coeffs.push(bigint_from_f64_round_half_even(v.re));
        }
        Polynomial::new(ring_degree, coeffs)
    }
}

impl crate::ring::RingElement for Polynomial {
    type Context = BigUint;

    fn ring_degree(&self) -> usize {
        self.ring_degree
    }

    fn add(&self, other: &Self, ctx: &BigUint) -> Result<Self> {
        Polynomial::add(self, other, Some(ctx))
    }

    fn subtract(&self, other: &Self, ctx: &BigUint) -> Result<Self> {
        Polynomial::subtract(self, other, Some(ctx))
    }

    fn multiply(&self, other: &Self, ctx: &BigUint) -> Result<Self> {
        Polynomial::multiply(self, other, ctx, None, None)
    }

    fn scalar_multiply(&self, scalar: &BigInt, ctx: &BigUint) -> Self {
        Polynomial::scalar_multiply(self, scalar, Some(ctx))
    }

    fn rotate(&self, r: u64) -> Self {
        Polynomial::rotate(self, r)
    }

    fn conjugate(&self) -> Self {
        Polynomial::conjugate(self)
    }

    fn mod_small(&self, ctx: &BigUint) -> Self {
        Polynomial::mod_small(self, ctx)
    }
}

trait ToF64Lossy {
    fn to_f64_lossy(&self) -> f64;
}

impl ToF64Lossy for BigInt {
    fn to_f64_lossy(&self) -> f64 {
        use num_traits::ToPrimitive;
        self.to_f64().unwrap_or(0.0)
    }
}

fn mod_pow_u64(base: u64, exp: u64, modulus: u64) -> u64 {
    let mut result: u128 = 1;
    let mut b = base as u128 % modulus as u128;
    let mut e = exp;
    let m = modulus as u128;
    while e > 0 {
        if e & 1 == 1 {
            result = (result * b) % m;
        }
        b = (b * b) % m;
        e >>= 1;
    }
    result as u64
}

fn round_half_even(x: f64) -> f64 {
    let floor = x.floor();
    let diff = x - floor;
    if diff < 0.5 {
        floor
    } else if diff > 0.5 {
        floor + 1.0
    } else if (floor as i64) % 2 == 0 {
        floor
    } else {
        floor + 1.0
    }
}

fn bigint_from_f64_round_half_even(x: f64) -> BigInt {
    let rounded = round_half_even(x);
    BigInt::from_f64(rounded).unwrap_or_else(BigInt::zero)
}

/// Rounds a plain `f64` to the nearest integer with round-half-to-even,
/// returning it as a [`BigInt`]. Exposed for callers (such as CKKS's
/// encoder) that need the same rounding convention on raw floats rather
/// than on an existing `Polynomial`'s coefficients.
pub fn round_f64_to_bigint(x: f64) -> BigInt {
    bigint_from_f64_round_half_even(x)
}

impl crate::ring::RingElement for Polynomial {
    type Context = BigUint;

    fn ring_degree(&self) -> usize {
        self.ring_degree
    }

    fn add(&self, other: &Self, ctx: &BigUint) -> Result<Self> {
        self.add(other, Some(ctx))
    }

    fn subtract(&self, other: &Self, ctx: &BigUint) -> Result<Self> {
        self.subtract(other, Some(ctx))
    }

    fn multiply(&self, other: &Self, ctx: &BigUint) -> Result<Self> {
        self.multiply(other, ctx, None, None)
    }

    fn scalar_multiply(&self, scalar: &BigInt, ctx: &BigUint) -> Self {
        self.scalar_multiply(scalar, Some(ctx))
    }

    fn rotate(&self, r: u64) -> Self {
        self.rotate(r)
    }

    fn conjugate(&self) -> Self {
        self.conjugate()
    }

    fn mod_small(&self, ctx: &BigUint) -> Self {
        self.mod_small(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coeffs: &[i64]) -> Polynomial {
        Polynomial::from_i64_slice(coeffs.len(), coeffs).unwrap()
    }

    #[test]
    fn add_and_subtract_are_pointwise() {
        let a = poly(&[1, 2, 3, 4]);
        let b = poly(&[4, 3, 2, 1]);
        let sum = a.add(&b, None).unwrap();
        assert_eq!(sum.coeffs, vec![BigInt::from(5); 4]);
        let diff = a.subtract(&b, None).unwrap();
        assert_eq!(
            diff.coeffs,
            vec![BigInt::from(-3), BigInt::from(-1), BigInt::from(1), BigInt::from(3)]
        );
    }

    #[test]
    fn rotate_matches_reference_scenario() {
        let p = poly(&[0, 1, 4, 59]);
        let rotated = p.rotate(3);
        assert_eq!(
            rotated.coeffs,
            vec![BigInt::from(0), BigInt::from(-1), BigInt::from(4), BigInt::from(-59)]
        );
    }

    #[test]
    fn conjugate_is_involutive() {
        let p = poly(&[1, 2, 3, 4]);
        let twice = p.conjugate().conjugate();
        assert_eq!(twice, p);
    }

    #[test]
    fn multiply_naive_matches_reference_scenario() {
        let a = poly(&[0, 1, 4, 5]);
        let b = poly(&[1, 2, 4, 3]);
        let q = BigUint::from(73u64);
        let prod = a.multiply_naive(&b, Some(&q));
        assert_eq!(
            prod.coeffs,
            vec![
                BigInt::from(44),
                BigInt::from(42),
                BigInt::from(64),
                BigInt::from(17)
            ]
        );
    }

    #[test]
    fn multiply_fft_agrees_with_naive_after_rounding() {
        let a = poly(&[0, 1, 4, 5]);
        let b = poly(&[1, 2, 4, 3]);
        let q = BigUint::from(73u64);
        let naive = a.multiply_naive(&b, None);
        let naive_mod = naive.mod_(&q);
        let via_fft = a.multiply_fft(&b).unwrap();
        let via_fft_mod = via_fft.mod_(&q);
        assert_eq!(naive_mod.coeffs, via_fft_mod.coeffs);
    }

    #[test]
    fn multiply_via_ntt_matches_naive() {
        let a = poly(&[0, 1, 4, 5]);
        let b = poly(&[1, 2, 4, 3]);
        let q = BigUint::from(73u64);
        let rou = crate::numth::root_of_unity(8, 73).unwrap();
        let ntt = NttContext::new(4, 73, Some(rou)).unwrap();
        let via_ntt = a.multiply(&b, &q, Some(&ntt), None).unwrap();
        let naive = a.multiply_naive(&b, Some(&q));
        assert_eq!(via_ntt.coeffs, naive.coeffs);
    }

    #[test]
    fn base_decompose_reconstructs_original() {
        let q = BigUint::from(1000u64);
        let p = poly(&[123, 456, 789, 999]);
        let base = BigInt::from(10);
        let num_levels = 4;
        let digits = p.base_decompose(&base, num_levels);

        let mut reconstructed = Polynomial::zero(4);
        let mut power = BigInt::from(1);
        for d in &digits {
            reconstructed = reconstructed
                .add(&d.scalar_multiply(&power, None), None)
                .unwrap();
            power *= &base;
        }
        assert_eq!(reconstructed.mod_(&q).coeffs, p.mod_(&q).coeffs);
    }

    #[test]
    fn mod_small_lifts_into_symmetric_range() {
        let q = BigUint::from(10u64);
        let p = poly(&[0, 4, 5, 9]);
        let lifted = p.mod_small(&q);
        assert_eq!(
            lifted.coeffs,
            vec![BigInt::from(0), BigInt::from(4), BigInt::from(5), BigInt::from(-1)]
        );
    }

    #[test]
    fn evaluate_uses_horner() {
        // p(x) = 1 + 2x + 3x^2, evaluated at x=5 => 1 + 10 + 75 = 86
        let p = poly(&[1, 2, 3]);
        assert_eq!(p.evaluate(&BigInt::from(5)), BigInt::from(86));
    }
}
