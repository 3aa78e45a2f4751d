//! Parameters for the CKKS approximate-number homomorphic encryption scheme.

use std::rc::Rc;

use derive_builder::Builder;
use fhe_math::crt::CrtContext;
use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// Parameters for the CKKS scheme: a ring degree `N`, a ciphertext modulus
/// `q`, a larger modulus `Q` used only for key-switching (relinearization,
/// rotation, conjugation, and bootstrapping's internal modulus raise), and a
/// scaling factor `delta` that ciphertexts carry and mutate across rescales.
///
/// Ciphertext and plaintext polynomials are stored as a single
/// arbitrary-precision-modulus [`fhe_math::poly::Polynomial`] by default.
/// Setting `prime_size` switches storage to an RNS/CRT chain of
/// [`fhe_math::dcrt::DcrtPolynomial`] residues against a [`CrtContext`] built
/// from primes of about that many bits, trading the single big-integer
/// representation for several per-prime NTT-friendly ones. Scheme code reads
/// [`CkksPoly`](crate::poly::CkksPoly) rather than either representation
/// directly, so this choice is transparent above `Ciphertext`/`Plaintext`.
#[derive(Debug, Builder, PartialEq)]
#[builder(build_fn(private, name = "fallible_build"))]
pub struct CkksParameters {
    /// Number of coefficients in a polynomial, and twice the number of
    /// plaintext slots; must be a power of two.
    pub(crate) poly_degree: usize,

    /// Ciphertext modulus `q`.
    pub(crate) ciph_modulus: BigUint,

    /// Auxiliary modulus `Q` used by every key-switching operation
    /// (relinearization, rotation, conjugation) and by bootstrapping's
    /// modulus-raise step.
    pub(crate) big_modulus: BigUint,

    /// Scaling factor `delta` a freshly encoded plaintext (and a freshly
    /// encrypted ciphertext) carries.
    pub(crate) scaling_factor: f64,

    /// Hamming weight of the sampled secret key, i.e. the number of nonzero
    /// coefficients. Matches `ckks_key_generator.py`'s `generate_secret_key`.
    #[builder(default = "64")]
    pub(crate) hamming_weight: usize,

    /// Number of terms of the degree-7 Taylor expansion of `exp` bootstrap
    /// evaluates, and the number of squarings afterward (`exp_taylor`'s
    /// polynomial is always degree 7; this only controls `exp`'s repeated
    /// squaring depth).
    #[builder(default = "6")]
    pub(crate) taylor_iterations: usize,

    /// Whether encryption samples real error polynomials or substitutes the
    /// zero polynomial for them, mirroring [`bfv::parameters::BfvParameters`].
    #[builder(default = "true")]
    pub(crate) include_encryption_errors: bool,

    /// Bit size of each RNS prime. `None` keeps the default single-modulus
    /// representation; `Some(bits)` switches polynomial storage to RNS/CRT,
    /// with primes generated at roughly that many bits each.
    #[builder(default = "None")]
    pub(crate) prime_size: Option<usize>,

    /// The RNS chain built from `prime_size`, or `None` in single-modulus
    /// mode. Computed by the builder, never set directly.
    #[builder(setter(skip), default)]
    pub(crate) crt: Option<Rc<CrtContext>>,
}

impl CkksParameters {
    /// Ring degree `N`.
    pub fn degree(&self) -> usize {
        self.poly_degree
    }

    /// Number of plaintext slots, `N / 2`.
    pub fn num_slots(&self) -> usize {
        self.poly_degree / 2
    }

    /// Ciphertext modulus `q`.
    pub fn ciph_modulus(&self) -> &BigUint {
        &self.ciph_modulus
    }

    /// Key-switching modulus `Q`.
    pub fn big_modulus(&self) -> &BigUint {
        &self.big_modulus
    }

    /// Scaling factor `delta` a freshly encoded plaintext carries.
    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    pub fn hamming_weight(&self) -> usize {
        self.hamming_weight
    }

    pub fn taylor_iterations(&self) -> usize {
        self.taylor_iterations
    }

    /// Bit size of each RNS prime, or `None` in single-modulus mode.
    pub fn prime_size(&self) -> Option<usize> {
        self.prime_size
    }

    /// The RNS chain, when `prime_size` was set.
    pub fn crt_context(&self) -> Option<&Rc<CrtContext>> {
        self.crt.as_ref()
    }

    /// Whether ciphertext and plaintext polynomials are stored in RNS/CRT
    /// form rather than as a single big-modulus [`fhe_math::poly::Polynomial`].
    pub fn is_rns(&self) -> bool {
        self.crt.is_some()
    }

    #[cfg(test)]
    pub fn default(poly_degree: usize) -> Self {
        CkksParametersBuilder::default()
            .poly_degree(poly_degree)
            .ciph_modulus(BigUint::from(1u64) << 40)
            .big_modulus(BigUint::from(1u64) << 1200)
            .scaling_factor((1u64 << 30) as f64)
            .hamming_weight(poly_degree / 2)
            .build()
            .unwrap()
    }
}

impl CkksParametersBuilder {
    /// Build a new [`CkksParameters`], validating every field the reference
    /// silently trusted its caller to get right.
    pub fn build(&self) -> Result<CkksParameters, CkksParametersBuilderError> {
        if self.poly_degree.is_none() {
            return Err(CkksParametersBuilderError::UninitializedField("poly_degree"));
        }
        let poly_degree = self.poly_degree.unwrap();
        if poly_degree < 2 || !poly_degree.is_power_of_two() {
            return Err(CkksParametersBuilderError::ValidationError(
                "`poly_degree` must be a power of two larger or equal to 2".to_string(),
            ));
        }

        if self.ciph_modulus.is_none() {
            return Err(CkksParametersBuilderError::UninitializedField("ciph_modulus"));
        }
        let ciph_modulus = self.ciph_modulus.clone().unwrap();

        if self.big_modulus.is_none() {
            return Err(CkksParametersBuilderError::UninitializedField("big_modulus"));
        }
        let big_modulus = self.big_modulus.clone().unwrap();
        if big_modulus <= ciph_modulus {
            return Err(CkksParametersBuilderError::ValidationError(
                "`big_modulus` must be strictly larger than `ciph_modulus`".to_string(),
            ));
        }

        if self.scaling_factor.is_none() {
            return Err(CkksParametersBuilderError::UninitializedField("scaling_factor"));
        }
        let scaling_factor = self.scaling_factor.unwrap();
        if scaling_factor <= 1.0 {
            return Err(CkksParametersBuilderError::ValidationError(
                "`scaling_factor` must be greater than 1".to_string(),
            ));
        }

        let hamming_weight = self.hamming_weight.unwrap_or(64);
        if hamming_weight > poly_degree {
            return Err(CkksParametersBuilderError::ValidationError(
                "`hamming_weight` cannot exceed `poly_degree`".to_string(),
            ));
        }

        let taylor_iterations = self.taylor_iterations.unwrap_or(6);
        let include_encryption_errors = self.include_encryption_errors.unwrap_or(true);

        // Sanity check `ciph_modulus` fits the f64 arithmetic bootstrapping's
        // modulus raise relies on (see `evaluator::Evaluator::raise_modulus`).
        if ciph_modulus.to_f64().is_none() {
            return Err(CkksParametersBuilderError::ValidationError(
                "`ciph_modulus` is too large to represent as f64".to_string(),
            ));
        }

        let prime_size = self.prime_size.unwrap_or(None);
        let crt = match prime_size {
            Some(bits) => {
                if bits == 0 {
                    return Err(CkksParametersBuilderError::ValidationError(
                        "`prime_size` must be nonzero".to_string(),
                    ));
                }
                // num_primes = 1 + floor(1 + log2(N) + 4*log2(Q) / prime_size)
                let log2_n = poly_degree.trailing_zeros() as f64;
                let log2_big_q = big_modulus.bits() as f64;
                let num_primes =
                    1 + (1.0 + log2_n + 4.0 * log2_big_q / bits as f64).floor() as usize;
                let ctx = CrtContext::new(num_primes, bits as u32, poly_degree).map_err(|e| {
                    CkksParametersBuilderError::ValidationError(format!(
                        "failed to build RNS/CRT context: {e}"
                    ))
                })?;
                Some(Rc::new(ctx))
            }
            None => None,
        };

        Ok(CkksParameters {
            poly_degree,
            ciph_modulus,
            big_modulus,
            scaling_factor,
            hamming_weight,
            taylor_iterations,
            include_encryption_errors,
            prime_size,
            crt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CkksParametersBuilder, CkksParametersBuilderError};
    use num_bigint::BigUint;

    fn q() -> BigUint {
        BigUint::from(1u64) << 40
    }

    fn big_q() -> BigUint {
        BigUint::from(1u64) << 1200
    }

    #[test]
    fn builder_rejects_missing_fields() {
        let err = CkksParametersBuilder::default().build().unwrap_err();
        assert!(matches!(
            err,
            CkksParametersBuilderError::UninitializedField("poly_degree")
        ));
    }

    #[test]
    fn builder_rejects_big_modulus_not_larger_than_ciph_modulus() {
        let err = CkksParametersBuilder::default()
            .poly_degree(16)
            .ciph_modulus(q())
            .big_modulus(BigUint::from(4u64))
            .scaling_factor((1u64 << 30) as f64)
            .build()
            .unwrap_err();
        assert!(matches!(err, CkksParametersBuilderError::ValidationError(_)));
    }

    #[test]
    fn builder_defaults_are_applied() {
        let params = CkksParametersBuilder::default()
            .poly_degree(128)
            .ciph_modulus(q())
            .big_modulus(big_q())
            .scaling_factor((1u64 << 30) as f64)
            .build()
            .unwrap();
        assert_eq!(params.hamming_weight(), 64);
        assert_eq!(params.taylor_iterations(), 6);
        assert!(params.include_encryption_errors);
        assert_eq!(params.num_slots(), 64);
    }

    #[test]
    fn default_helper_builds_usable_parameters() {
        let params = super::CkksParameters::default(16);
        assert_eq!(params.degree(), 16);
        assert_eq!(params.num_slots(), 8);
        assert!(!params.is_rns());
        assert!(params.crt_context().is_none());
    }

    #[test]
    fn prime_size_builds_a_crt_context_sized_by_the_formula() {
        let params = CkksParametersBuilder::default()
            .poly_degree(16)
            .ciph_modulus(q())
            .big_modulus(big_q())
            .scaling_factor((1u64 << 30) as f64)
            .prime_size(59)
            .build()
            .unwrap();
        assert!(params.is_rns());
        let crt = params.crt_context().unwrap();
        let log2_n = 16u32.trailing_zeros() as f64;
        let log2_big_q = big_q().bits() as f64;
        let expected_num_primes = 1 + (1.0 + log2_n + 4.0 * log2_big_q / 59.0).floor() as usize;
        assert_eq!(crt.num_primes(), expected_num_primes);
    }

    #[test]
    fn prime_size_zero_is_rejected() {
        let err = CkksParametersBuilder::default()
            .poly_degree(16)
            .ciph_modulus(q())
            .big_modulus(big_q())
            .scaling_factor((1u64 << 30) as f64)
            .prime_size(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, CkksParametersBuilderError::ValidationError(_)));
    }
}
