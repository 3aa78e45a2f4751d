//! Parameters for the BFV integer homomorphic encryption scheme.

use derive_builder::Builder;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

/// Parameters for the BFV scheme: a ring degree `N`, a plaintext modulus `t`,
/// and a ciphertext modulus `q`.
///
/// Unlike the RNS-chain parameters of a full production scheme, this mirrors
/// the reference it is descended from: a single (possibly very large) `q`
/// rather than a product of small CRT primes, with `Polynomial::multiply_fft`
/// standing in for a per-prime NTT during ciphertext-ciphertext
/// multiplication. `plain_modulus` alone gets its own small `NttContext` in
/// [`crate::encoder::BatchEncoder`], since it is the one modulus sized to
/// support the `2N`-th roots of unity batch encoding needs.
#[derive(Debug, Builder, PartialEq)]
#[builder(build_fn(private, name = "fallible_build"))]
pub struct BfvParameters {
    /// Number of coefficients in a polynomial; must be a power of two.
    pub(crate) poly_degree: usize,

    /// Plaintext modulus `t`.
    pub(crate) plain_modulus: u64,

    /// Ciphertext modulus `q`.
    pub(crate) ciph_modulus: BigUint,

    /// Whether encryption samples real error polynomials or substitutes the
    /// zero polynomial for them. Defaults to `true` (errors included); set
    /// to `false` to reproduce the reference's error-free debugging mode.
    #[builder(default = "true")]
    pub(crate) include_encryption_errors: bool,

    /// `q / t`, computed once and reused by every encrypt/decrypt/multiply
    /// call that needs to scale between the plaintext and ciphertext rings.
    #[builder(setter(skip))]
    pub(crate) scaling_factor: f64,

    /// Digit base for relinearization-key decomposition, `ceil(sqrt(q))`.
    #[builder(setter(skip))]
    pub(crate) relin_base: BigUint,

    /// Number of digits `c2` is decomposed into at relinearization time.
    #[builder(setter(skip))]
    pub(crate) relin_num_levels: usize,
}

impl BfvParameters {
    /// Ring degree `N`.
    pub fn degree(&self) -> usize {
        self.poly_degree
    }

    /// Plaintext modulus `t`.
    pub fn plain_modulus(&self) -> u64 {
        self.plain_modulus
    }

    /// Ciphertext modulus `q`.
    pub fn ciph_modulus(&self) -> &BigUint {
        &self.ciph_modulus
    }

    /// `q / t` as a float, used to scale plaintexts into the ciphertext ring.
    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    #[cfg(test)]
    pub fn default(poly_degree: usize) -> Self {
        BfvParametersBuilder::default()
            .poly_degree(poly_degree)
            .plain_modulus(17)
            .ciph_modulus(BigUint::from(4_611_686_018_427_387_904u64))
            .build()
            .unwrap()
    }
}

impl BfvParametersBuilder {
    /// Build a new [`BfvParameters`], validating every field the reference
    /// implementation silently trusted its caller to get right.
    pub fn build(&self) -> Result<BfvParameters, BfvParametersBuilderError> {
        if self.poly_degree.is_none() {
            return Err(BfvParametersBuilderError::UninitializedField(
                "poly_degree",
            ));
        }
        let poly_degree = self.poly_degree.unwrap();
        if poly_degree < 2 || !poly_degree.is_power_of_two() {
            return Err(BfvParametersBuilderError::ValidationError(
                "`poly_degree` must be a power of two larger or equal to 2".to_string(),
            ));
        }

        if self.plain_modulus.is_none() {
            return Err(BfvParametersBuilderError::UninitializedField(
                "plain_modulus",
            ));
        }
        let plain_modulus = self.plain_modulus.unwrap();
        if plain_modulus < 2 {
            return Err(BfvParametersBuilderError::ValidationError(
                "`plain_modulus` must be at least 2".to_string(),
            ));
        }

        if self.ciph_modulus.is_none() {
            return Err(BfvParametersBuilderError::UninitializedField(
                "ciph_modulus",
            ));
        }
        let ciph_modulus = self.ciph_modulus.clone().unwrap();
        if ciph_modulus <= BigUint::from(plain_modulus) {
            return Err(BfvParametersBuilderError::ValidationError(
                "`ciph_modulus` must be strictly larger than `plain_modulus`".to_string(),
            ));
        }

        let include_encryption_errors = self.include_encryption_errors.unwrap_or(true);

        let scaling_factor = ciph_modulus
            .to_f64()
            .ok_or_else(|| {
                BfvParametersBuilderError::ValidationError(
                    "`ciph_modulus` is too large to represent as f64".to_string(),
                )
            })?
            / plain_modulus as f64;

        let (relin_base, relin_num_levels) = relin_decomposition_params(&ciph_modulus);

        Ok(BfvParameters {
            poly_degree,
            plain_modulus,
            ciph_modulus,
            include_encryption_errors,
            scaling_factor,
            relin_base,
            relin_num_levels,
        })
    }
}

/// `base = ceil(sqrt(q))`, `num_levels` = number of base-`base` digits needed
/// to represent `q` (i.e. `floor(log_base(q)) + 1`), matching
/// `bfv_key_generator.py`'s `generate_relin_key`.
fn relin_decomposition_params(q: &BigUint) -> (BigUint, usize) {
    let mut base = q.sqrt();
    if &base * &base < *q {
        base += BigUint::one();
    }

    let mut num_levels = 0usize;
    let mut remaining = q.clone();
    while !remaining.is_zero() {
        num_levels += 1;
        remaining /= &base;
    }

    (base, num_levels.max(1))
}
