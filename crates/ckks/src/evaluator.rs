//! Homomorphic operations on CKKS ciphertexts, including the bootstrapping
//! pipeline.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::rc::Rc;

use fhe_math::matrix::{diagonal, rotate as rotate_vec};
use fhe_math::poly::Polynomial;
use num_bigint::{BigInt, BigUint};
use num_complex::Complex64;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

use crate::bootstrap::BootstrappingContext;
use crate::ciphertext::Ciphertext;
use crate::encoder::CkksEncoder;
use crate::error::{Error, Result};
use crate::keys::{RelinKey, RotationKey, SwitchingKey};
use crate::parameters::CkksParameters;
use crate::plaintext::Plaintext;
use crate::poly::CkksPoly;

/// Stateless evaluator: every operation takes its operands (and, for
/// ciphertext-modifying operations, the keys and modulus/scale they need)
/// explicitly, mirroring `ckks_evaluator.py`'s free functions. Unlike the
/// reference, the active scaling factor during bootstrapping's matrix
/// multiplications is threaded as an explicit parameter rather than stored
/// and mutated on `self`.
pub struct Evaluator {
    par: Rc<CkksParameters>,
}

fn mismatch_moduli(a: &BigUint, b: &BigUint) -> Error {
    Error::Math(fhe_math::Error::ModulusMismatch(a.to_string(), b.to_string()))
}

fn mismatch_scales(a: f64, b: f64) -> Error {
    Error::Math(fhe_math::Error::ScalingFactorMismatch(a.to_string(), b.to_string()))
}

fn scale_to_biguint(scale: f64) -> BigUint {
    BigUint::from_f64(scale.round()).expect("scaling factor must be a nonnegative integer")
}

impl Evaluator {
    pub fn new(par: Rc<CkksParameters>) -> Self {
        Self { par }
    }

    pub fn add(&self, ct1: &Ciphertext, ct2: &Ciphertext) -> Result<Ciphertext> {
        if ct1.modulus != ct2.modulus {
            return Err(mismatch_moduli(&ct1.modulus, &ct2.modulus));
        }
        if ct1.scaling_factor != ct2.scaling_factor {
            return Err(mismatch_scales(ct1.scaling_factor, ct2.scaling_factor));
        }
        let modulus = &ct1.modulus;
        let c0 = ct1.c0.add(&ct2.c0, Some(modulus))?;
        let c1 = ct1.c1.add(&ct2.c1, Some(modulus))?;
        Ok(Ciphertext::new(&self.par, c0, c1, ct1.scaling_factor, modulus.clone()))
    }

    pub fn subtract(&self, ct1: &Ciphertext, ct2: &Ciphertext) -> Result<Ciphertext> {
        if ct1.modulus != ct2.modulus {
            return Err(mismatch_moduli(&ct1.modulus, &ct2.modulus));
        }
        if ct1.scaling_factor != ct2.scaling_factor {
            return Err(mismatch_scales(ct1.scaling_factor, ct2.scaling_factor));
        }
        let modulus = &ct1.modulus;
        let c0 = ct1.c0.subtract(&ct2.c0, Some(modulus))?;
        let c1 = ct1.c1.subtract(&ct2.c1, Some(modulus))?;
        Ok(Ciphertext::new(&self.par, c0, c1, ct1.scaling_factor, modulus.clone()))
    }

    pub fn add_plain(&self, ct: &Ciphertext, plain: &Plaintext) -> Result<Ciphertext> {
        if ct.scaling_factor != plain.scaling_factor() {
            return Err(mismatch_scales(ct.scaling_factor, plain.scaling_factor()));
        }
        let modulus = &ct.modulus;
        let c0 = ct.c0.add(plain.poly(), Some(modulus))?;
        Ok(Ciphertext::new(&self.par, c0, ct.c1.clone(), ct.scaling_factor, modulus.clone()))
    }

    pub fn multiply_plain(&self, ct: &Ciphertext, plain: &Plaintext) -> Result<Ciphertext> {
        let modulus = &ct.modulus;
        let c0 = ct.c0.multiply(plain.poly(), modulus)?;
        let c1 = ct.c1.multiply(plain.poly(), modulus)?;
        let new_scale = ct.scaling_factor * plain.scaling_factor();
        Ok(Ciphertext::new(&self.par, c0, c1, new_scale, modulus.clone()))
    }

    /// Multiplies two ciphertexts and relinearizes back down to size two.
    ///
    /// Matches `ckks_evaluator.py`'s `multiply` followed immediately by
    /// `relinearize`. Requires `ct1` and `ct2` to share a modulus; their
    /// scaling factors need not match, since the product's is their product.
    pub fn multiply(&self, ct1: &Ciphertext, ct2: &Ciphertext, relin_key: &RelinKey) -> Result<Ciphertext> {
        if ct1.modulus != ct2.modulus {
            return Err(mismatch_moduli(&ct1.modulus, &ct2.modulus));
        }
        let modulus = ct1.modulus.clone();

        let c0 = ct1.c0.multiply(&ct2.c0, &modulus)?.mod_small(&modulus);
        let cross_a = ct1.c0.multiply(&ct2.c1, &modulus)?;
        let cross_b = ct1.c1.multiply(&ct2.c0, &modulus)?;
        let c1 = cross_a.add(&cross_b, Some(&modulus))?.mod_small(&modulus);
        let c2 = ct1.c1.multiply(&ct2.c1, &modulus)?.mod_small(&modulus);

        let new_scale = ct1.scaling_factor * ct2.scaling_factor;
        self.relinearize(relin_key, c0, c1, c2, new_scale, modulus)
    }

    /// Relinearizes a degree-two `(c0, c1, c2)` triple back to size two,
    /// using the auxiliary modulus `Q` for the key-switch.
    fn relinearize(
        &self,
        relin_key: &RelinKey,
        c0: CkksPoly,
        c1: CkksPoly,
        c2: CkksPoly,
        new_scaling_factor: f64,
        modulus: BigUint,
    ) -> Result<Ciphertext> {
        let big = &self.par.big_modulus;
        let q_big = &modulus * big;
        let key = relin_key.key();

        let term0 = key
            .p0
            .multiply(&c2, &q_big)?
            .mod_small(&q_big)
            .scalar_integer_divide(&BigInt::from(big.clone()), None);
        let new_c0 = term0.add(&c0, Some(&modulus))?.mod_small(&modulus);

        let term1 = key
            .p1
            .multiply(&c2, &q_big)?
            .mod_small(&q_big)
            .scalar_integer_divide(&BigInt::from(big.clone()), None);
        let new_c1 = term1.add(&c1, Some(&modulus))?.mod_small(&modulus);

        Ok(Ciphertext::new(&self.par, new_c0, new_c1, new_scaling_factor, modulus))
    }

    /// Divides the modulus and rescales the coefficients by `division_factor`,
    /// reducing the scaling factor accordingly. Matches `rescale`.
    pub fn rescale(&self, ct: &Ciphertext, division_factor: &BigUint) -> Ciphertext {
        let divisor = BigInt::from(division_factor.clone());
        let c0 = ct.c0.scalar_integer_divide(&divisor, None);
        let c1 = ct.c1.scalar_integer_divide(&divisor, None);
        let new_modulus = &ct.modulus / division_factor;
        let new_scale = ct.scaling_factor / division_factor.to_f64().unwrap_or(1.0);
        Ciphertext::new(&self.par, c0, c1, new_scale, new_modulus)
    }

    /// Drops the modulus by `division_factor` without touching the
    /// coefficients' scale, for aligning a ciphertext's level with one that
    /// has already been rescaled. Matches `lower_modulus`.
    pub fn lower_modulus(&self, ct: &Ciphertext, division_factor: &BigUint) -> Ciphertext {
        let new_modulus = &ct.modulus / division_factor;
        let c0 = ct.c0.mod_small(&new_modulus);
        let c1 = ct.c1.mod_small(&new_modulus);
        Ciphertext::new(&self.par, c0, c1, ct.scaling_factor, new_modulus)
    }

    /// Switches the key a ciphertext's `c1` term is encrypted under, via the
    /// auxiliary modulus `Q`. Matches `switch_key`.
    fn switch_key(&self, c0: &CkksPoly, c1: &CkksPoly, modulus: &BigUint, key: &SwitchingKey) -> Result<Ciphertext> {
        let big = &self.par.big_modulus;
        let q_big = modulus * big;

        let term0 = key
            .p0
            .multiply(c1, &q_big)?
            .mod_small(&q_big)
            .scalar_integer_divide(&BigInt::from(big.clone()), None);
        let new_c0 = term0.add(c0, Some(modulus))?.mod_small(modulus);

        let term1 = key
            .p1
            .multiply(c1, &q_big)?
            .mod_small(&q_big)
            .scalar_integer_divide(&BigInt::from(big.clone()), None)
            .mod_small(modulus);

        Ok(Ciphertext { par: self.par.clone(), c0: new_c0, c1: term1, scaling_factor: 0.0, modulus: modulus.clone() })
    }

    /// Rotates plaintext slots by `rotation` positions, via the Galois
    /// automorphism `X -> X^(5^rotation)` followed by a key-switch. Matches
    /// `rotate`.
    pub fn rotate(&self, ct: &Ciphertext, rot_key: &RotationKey) -> Result<Ciphertext> {
        let rotated_c0 = ct.c0.rotate(rot_key.rotation);
        let rotated_c1 = ct.c1.rotate(rot_key.rotation);
        let mut result = self.switch_key(&rotated_c0, &rotated_c1, &ct.modulus, &rot_key.key)?;
        result.scaling_factor = ct.scaling_factor;
        Ok(result)
    }

    /// Applies complex conjugation to plaintext slots, via `X -> X^(-1)`
    /// followed by a key-switch. Matches `conjugate`.
    pub fn conjugate(&self, ct: &Ciphertext, conj_key: &SwitchingKey) -> Result<Ciphertext> {
        let conj_c0 = ct.c0.conjugate().mod_small(&ct.modulus);
        let conj_c1 = ct.c1.conjugate().mod_small(&ct.modulus);
        let mut result = self.switch_key(&conj_c0, &conj_c1, &ct.modulus, conj_key)?;
        result.scaling_factor = ct.scaling_factor;
        Ok(result)
    }

    /// Multiplies a ciphertext by a plaintext matrix via the baby-step
    /// giant-step diagonal decomposition, rotating and combining diagonals
    /// rather than materializing the matrix. Matches `multiply_matrix`.
    ///
    /// `scale` is the scaling factor to encode each diagonal's plaintext at,
    /// and is expected to equal `ct`'s own scaling factor.
    pub fn multiply_matrix(
        &self,
        ct: &Ciphertext,
        matrix: &[Vec<Complex64>],
        rot_keys: &HashMap<u64, RotationKey>,
        encoder: &CkksEncoder,
        scale: f64,
    ) -> Result<Ciphertext> {
        let matrix_len = matrix.len();
        let mut n1 = (matrix_len as f64).sqrt().floor() as usize;
        if n1 * n1 != matrix_len {
            n1 = (2.0 * matrix_len as f64).sqrt().floor() as usize;
        }
        let n1 = n1.max(1);
        let n2 = matrix_len / n1;

        let mut ciph_rots = Vec::with_capacity(n1);
        for i in 0..n1 {
            if i == 0 {
                ciph_rots.push(ct.clone());
            } else {
                let key = rot_keys
                    .get(&(i as u64))
                    .expect("multiply_matrix requires a rotation key for every baby step");
                ciph_rots.push(self.rotate(ct, key)?);
            }
        }

        let mut outer_sum: Option<Ciphertext> = None;
        for j in 0..n2 {
            let shift = n1 * j;
            let mut inner_sum: Option<Ciphertext> = None;
            for i in 0..n1 {
                let diag = diagonal(matrix, shift + i);
                let neg_shift = (matrix_len - shift % matrix_len) % matrix_len;
                let diag = rotate_vec(&diag, neg_shift);
                let diag_plain = encoder.encode(&diag, scale)?;
                let term = self.multiply_plain(&ciph_rots[i], &diag_plain)?;
                inner_sum = Some(match inner_sum {
                    None => term,
                    Some(sum) => self.add(&sum, &term)?,
                });
            }
            let inner_sum = inner_sum.expect("n1 >= 1");
            let rotated_sum = if shift == 0 {
                inner_sum
            } else {
                let key = rot_keys
                    .get(&(shift as u64))
                    .expect("multiply_matrix requires a rotation key for every giant step");
                self.rotate(&inner_sum, key)?
            };
            outer_sum = Some(match outer_sum {
                None => rotated_sum,
                Some(sum) => self.add(&sum, &rotated_sum)?,
            });
        }

        let result = outer_sum.expect("n2 >= 1");
        Ok(self.rescale(&result, &scale_to_biguint(scale)))
    }

    fn create_constant_plain(&self, scale: f64, value: f64) -> Plaintext {
        let mut coeffs = vec![BigInt::zero(); self.par.poly_degree];
        coeffs[0] = fhe_math::poly::round_f64_to_bigint(value * scale);
        let poly = Polynomial::new(self.par.poly_degree, coeffs).expect("fixed-size coefficient vector");
        Plaintext::new(&self.par, CkksPoly::from_polynomial(poly, &self.par), scale)
    }

    fn create_complex_constant_plain(&self, scale: f64, value: Complex64, encoder: &CkksEncoder) -> Result<Plaintext> {
        let values = vec![value; self.par.num_slots()];
        encoder.encode(&values, scale)
    }

    /// The degree-7 Taylor expansion of `exp(x)`, evaluated via four
    /// independent partial sums (degrees 0-1, 2-3, 4-5, 6-7) that are
    /// explicitly rescaled and level-aligned before being combined.
    fn exp_taylor(&self, ct: &Ciphertext, relin_key: &RelinKey, scale: f64) -> Result<Ciphertext> {
        let division_factor = scale_to_biguint(scale);

        let ct2 = self.multiply(ct, ct, relin_key)?;
        let ct2 = self.rescale(&ct2, &division_factor);
        let ct4 = self.multiply(&ct2, &ct2, relin_key)?;
        let ct4 = self.rescale(&ct4, &division_factor);

        let const1 = self.create_constant_plain(scale, 1.0);
        let ct01 = self.add_plain(ct, &const1)?;
        let const1 = self.create_constant_plain(scale, 1.0);
        let ct01 = self.multiply_plain(&ct01, &const1)?;
        let ct01 = self.rescale(&ct01, &division_factor);

        let const3 = self.create_constant_plain(scale, 3.0);
        let ct23 = self.add_plain(ct, &const3)?;
        let const_sixth = self.create_constant_plain(scale, 1.0 / 6.0);
        let ct23 = self.multiply_plain(&ct23, &const_sixth)?;
        let ct23 = self.rescale(&ct23, &division_factor);
        let ct23 = self.multiply(&ct23, &ct2, relin_key)?;
        let ct23 = self.rescale(&ct23, &division_factor);

        let ct01 = self.lower_modulus(&ct01, &division_factor);
        let ct23 = self.add(&ct23, &ct01)?;

        let const5 = self.create_constant_plain(scale, 5.0);
        let ct45 = self.add_plain(ct, &const5)?;
        let const_120th = self.create_constant_plain(scale, 1.0 / 120.0);
        let ct45 = self.multiply_plain(&ct45, &const_120th)?;
        let ct45 = self.rescale(&ct45, &division_factor);

        let const7 = self.create_constant_plain(scale, 7.0);
        let ct7 = self.add_plain(ct, &const7)?;
        let const_5040th = self.create_constant_plain(scale, 1.0 / 5040.0);
        let ct7 = self.multiply_plain(&ct7, &const_5040th)?;
        let ct7 = self.rescale(&ct7, &division_factor);
        let ct7 = self.multiply(&ct7, &ct2, relin_key)?;
        let ct7 = self.rescale(&ct7, &division_factor);

        let ct45 = self.lower_modulus(&ct45, &division_factor);
        let ct7 = self.add(&ct7, &ct45)?;

        let ct7 = self.multiply(&ct7, &ct4, relin_key)?;
        let ct7 = self.rescale(&ct7, &division_factor);

        let ct23 = self.lower_modulus(&ct23, &division_factor);
        self.add(&ct7, &ct23)
    }

    /// Evaluates `exp(const * ct)` via repeated squaring of a Taylor
    /// approximation over a fraction of the input, halving accumulated
    /// approximation error each doubling. Matches `exp`.
    fn exp(
        &self,
        ct: &Ciphertext,
        const_value: Complex64,
        relin_key: &RelinKey,
        encoder: &CkksEncoder,
        boot: &BootstrappingContext,
        scale: f64,
    ) -> Result<Ciphertext> {
        let division_factor = scale_to_biguint(scale);
        let num_iterations = boot.num_taylor_iterations;
        let scaled_const = const_value / Complex64::new(2f64.powi(num_iterations as i32), 0.0);

        let const_plain = self.create_complex_constant_plain(scale, scaled_const, encoder)?;
        let ct = self.multiply_plain(ct, &const_plain)?;
        let ct = self.rescale(&ct, &division_factor);
        let mut ct = self.exp_taylor(&ct, relin_key, scale)?;

        for _ in 0..num_iterations {
            ct = self.multiply(&ct, &ct, relin_key)?;
            ct = self.rescale(&ct, &division_factor);
        }

        Ok(ct)
    }

    /// Transforms a ciphertext encoding slot values into one whose `c0`/`c1`
    /// carry the real/imaginary parts of those slots as coefficients,
    /// splitting the work across `boot`'s conjugate-transpose matrices.
    /// Matches `coeff_to_slot`.
    pub fn coeff_to_slot(
        &self,
        ct: &Ciphertext,
        rot_keys: &HashMap<u64, RotationKey>,
        conj_key: &SwitchingKey,
        encoder: &CkksEncoder,
        boot: &BootstrappingContext,
        scale: f64,
    ) -> Result<(Ciphertext, Ciphertext)> {
        let division_factor = scale_to_biguint(scale);
        let inv_degree = 1.0 / self.par.poly_degree as f64;

        let s1 = self.multiply_matrix(ct, &boot.encoding_mat_conj_transpose0, rot_keys, encoder, scale)?;
        let conj_ct = self.conjugate(ct, conj_key)?;
        let s2 = self.multiply_matrix(&conj_ct, &boot.encoding_mat_transpose0, rot_keys, encoder, scale)?;
        let ciph0 = self.add(&s1, &s2)?;
        let const_plain = self.create_constant_plain(ciph0.scaling_factor, inv_degree);
        let ciph0 = self.multiply_plain(&ciph0, &const_plain)?;
        let ciph0 = self.rescale(&ciph0, &division_factor);

        let s1 = self.multiply_matrix(ct, &boot.encoding_mat_conj_transpose1, rot_keys, encoder, scale)?;
        let s2 = self.multiply_matrix(&conj_ct, &boot.encoding_mat_transpose1, rot_keys, encoder, scale)?;
        let ciph1 = self.add(&s1, &s2)?;
        let const_plain = self.create_constant_plain(ciph1.scaling_factor, inv_degree);
        let ciph1 = self.multiply_plain(&ciph1, &const_plain)?;
        let ciph1 = self.rescale(&ciph1, &division_factor);

        Ok((ciph0, ciph1))
    }

    /// The inverse transform of [`Self::coeff_to_slot`]. Matches
    /// `slot_to_coeff`.
    pub fn slot_to_coeff(
        &self,
        ct0: &Ciphertext,
        ct1: &Ciphertext,
        rot_keys: &HashMap<u64, RotationKey>,
        encoder: &CkksEncoder,
        boot: &BootstrappingContext,
        scale: f64,
    ) -> Result<Ciphertext> {
        let s1 = self.multiply_matrix(ct0, &boot.encoding_mat0, rot_keys, encoder, scale)?;
        let s2 = self.multiply_matrix(ct1, &boot.encoding_mat1, rot_keys, encoder, scale)?;
        self.add(&s1, &s2)
    }

    /// Raises a ciphertext's modulus from `q` to the auxiliary modulus `Q`,
    /// returning the scaling factor bootstrapping's subsequent steps should
    /// use (the old modulus, as a float) alongside the raised ciphertext.
    /// Matches `raise_modulus`, but threads the new scale back to the caller
    /// instead of mutating evaluator state.
    pub fn raise_modulus(&self, ct: &Ciphertext) -> (f64, Ciphertext) {
        let scale = ct.modulus.to_f64().expect("ciph_modulus must fit in f64");
        let raised = Ciphertext::new(&self.par, ct.c0.clone(), ct.c1.clone(), scale, self.par.big_modulus.clone());
        (scale, raised)
    }

    /// The full bootstrapping pipeline: raise the modulus, move coefficients
    /// into slots, approximate the sawtooth-removing sine via a scaled
    /// `exp`, and move back. Returns the original (pre-raise) ciphertext
    /// alongside the refreshed one. Matches `bootstrap`.
    pub fn bootstrap(
        &self,
        ct: &Ciphertext,
        rot_keys: &HashMap<u64, RotationKey>,
        conj_key: &SwitchingKey,
        relin_key: &RelinKey,
        encoder: &CkksEncoder,
        boot: &BootstrappingContext,
    ) -> Result<(Ciphertext, Ciphertext)> {
        let original = ct.clone();
        let old_modulus = ct.modulus.to_f64().expect("ciph_modulus must fit in f64");
        let old_scaling_factor = self.par.scaling_factor;

        let (scale, raised) = self.raise_modulus(ct);
        let (ciph0, ciph1) = self.coeff_to_slot(&raised, rot_keys, conj_key, encoder, boot, scale)?;

        let const_value = Complex64::new(0.0, scale / old_modulus * 2.0 * PI);

        let exp0 = self.exp(&ciph0, const_value, relin_key, encoder, boot, scale)?;
        let neg_exp0 = self.conjugate(&exp0, conj_key)?;
        let exp1 = self.exp(&ciph1, const_value, relin_key, encoder, boot, scale)?;
        let neg_exp1 = self.conjugate(&exp1, conj_key)?;

        let sin0 = self.subtract(&exp0, &neg_exp0)?;
        let sin1 = self.subtract(&exp1, &neg_exp1)?;

        let ratio = old_modulus / scale;
        let const_value = Complex64::new(ratio * 0.25 / PI, 0.0) / Complex64::new(0.0, 1.0);

        let const_plain = self.create_complex_constant_plain(sin0.scaling_factor, const_value, encoder)?;
        let ciph0 = self.multiply_plain(&sin0, &const_plain)?;
        let division_factor = scale_to_biguint(sin0.scaling_factor);
        let ciph0 = self.rescale(&ciph0, &division_factor);

        let const_plain = self.create_complex_constant_plain(sin1.scaling_factor, const_value, encoder)?;
        let ciph1 = self.multiply_plain(&sin1, &const_plain)?;
        let division_factor = scale_to_biguint(sin1.scaling_factor);
        let ciph1 = self.rescale(&ciph1, &division_factor);

        let refreshed = self.slot_to_coeff(&ciph0, &ciph1, rot_keys, encoder, boot, ciph0.scaling_factor)?;
        let refreshed = Ciphertext::new(&self.par, refreshed.c0, refreshed.c1, old_scaling_factor, refreshed.modulus);

        Ok((original, refreshed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decryptor::Decryptor;
    use crate::encryptor::Encryptor;
    use crate::keys::{PublicKey, SecretKey};
    use crate::parameters::CkksParametersBuilder;
    use fhe_math::sampling::ChaChaRandomSource;
    use num_bigint::BigUint;

    fn small_params() -> Rc<CkksParameters> {
        Rc::new(
            CkksParametersBuilder::default()
                .poly_degree(16)
                .ciph_modulus(BigUint::from(1u64) << 40)
                .big_modulus(BigUint::from(1u64) << 1200)
                .scaling_factor((1u64 << 30) as f64)
                .hamming_weight(8)
                .include_encryption_errors(false)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn add_is_homomorphic_over_encoded_values() {
        let par = small_params();
        let mut rng = ChaChaRandomSource::new([21u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let pk = PublicKey::generate(&sk, &mut rng);
        let encryptor = Encryptor::new(pk);
        let evaluator = Evaluator::new(par.clone());
        let encoder = CkksEncoder::new(par.clone());

        let a = vec![Complex64::new(3.0, 0.0); par.num_slots()];
        let b = vec![Complex64::new(4.0, 0.0); par.num_slots()];
        let pt_a = encoder.encode(&a, par.scaling_factor()).unwrap();
        let pt_b = encoder.encode(&b, par.scaling_factor()).unwrap();
        let ct_a = encryptor.encrypt(&pt_a, &mut rng);
        let ct_b = encryptor.encrypt(&pt_b, &mut rng);

        let ct_c = evaluator.add(&ct_a, &ct_b).unwrap();
        let decryptor = Decryptor::new(sk);
        let pt_c = decryptor.decrypt(&ct_c);
        let decoded = encoder.decode(&pt_c).unwrap();
        for v in decoded {
            assert!((v - Complex64::new(7.0, 0.0)).norm() < 1e-3);
        }
    }

    #[test]
    fn multiply_and_relinearize_approximate_the_elementwise_product() {
        let par = small_params();
        let mut rng = ChaChaRandomSource::new([23u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let pk = PublicKey::generate(&sk, &mut rng);
        let encryptor = Encryptor::new(pk);
        let evaluator = Evaluator::new(par.clone());
        let encoder = CkksEncoder::new(par.clone());
        let relin_key = RelinKey::generate(&sk, &mut rng);

        let a = vec![Complex64::new(3.0, 0.0); par.num_slots()];
        let b = vec![Complex64::new(2.0, 0.0); par.num_slots()];
        let pt_a = encoder.encode(&a, par.scaling_factor()).unwrap();
        let pt_b = encoder.encode(&b, par.scaling_factor()).unwrap();
        let ct_a = encryptor.encrypt(&pt_a, &mut rng);
        let ct_b = encryptor.encrypt(&pt_b, &mut rng);

        let ct_c = evaluator.multiply(&ct_a, &ct_b, &relin_key).unwrap();
        let decryptor = Decryptor::new(sk);
        let pt_c = decryptor.decrypt(&ct_c);
        let decoded = encoder.decode(&pt_c).unwrap();
        for v in decoded {
            assert!((v - Complex64::new(6.0, 0.0)).norm() < 1e-2, "{}", v);
        }
    }

    #[test]
    fn rotate_matches_a_cyclic_shift_of_the_slots() {
        let par = small_params();
        let mut rng = ChaChaRandomSource::new([29u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let pk = PublicKey::generate(&sk, &mut rng);
        let encryptor = Encryptor::new(pk);
        let evaluator = Evaluator::new(par.clone());
        let encoder = CkksEncoder::new(par.clone());

        let values: Vec<Complex64> = (0..par.num_slots()).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let pt = encoder.encode(&values, par.scaling_factor()).unwrap();
        let ct = encryptor.encrypt(&pt, &mut rng);

        let rot_key = RotationKey::generate(&sk, 1, &mut rng);
        let rotated_ct = evaluator.rotate(&ct, &rot_key).unwrap();

        let decryptor = Decryptor::new(sk);
        let decrypted = decryptor.decrypt(&rotated_ct);
        let decoded = encoder.decode(&decrypted).unwrap();
        let expected = fhe_math::matrix::rotate(
            &values,
            1,
        );
        for (a, b) in decoded.iter().zip(expected.iter()) {
            assert!((a - b).norm() < 1e-2, "{} vs {}", a, b);
        }
    }

    #[test]
    fn rns_mode_add_and_multiply_agree_with_single_modulus_mode() {
        let par = Rc::new(
            CkksParametersBuilder::default()
                .poly_degree(16)
                .ciph_modulus(BigUint::from(1u64) << 40)
                .big_modulus(BigUint::from(1u64) << 1200)
                .scaling_factor((1u64 << 30) as f64)
                .hamming_weight(8)
                .include_encryption_errors(false)
                .prime_size(59)
                .build()
                .unwrap(),
        );
        assert!(par.is_rns());

        let mut rng = ChaChaRandomSource::new([41u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let pk = PublicKey::generate(&sk, &mut rng);
        let encryptor = Encryptor::new(pk);
        let evaluator = Evaluator::new(par.clone());
        let encoder = CkksEncoder::new(par.clone());
        let relin_key = RelinKey::generate(&sk, &mut rng);

        let a = vec![Complex64::new(3.0, 0.0); par.num_slots()];
        let b = vec![Complex64::new(2.0, 0.0); par.num_slots()];
        let pt_a = encoder.encode(&a, par.scaling_factor()).unwrap();
        let pt_b = encoder.encode(&b, par.scaling_factor()).unwrap();
        let ct_a = encryptor.encrypt(&pt_a, &mut rng);
        let ct_b = encryptor.encrypt(&pt_b, &mut rng);

        let ct_sum = evaluator.add(&ct_a, &ct_b).unwrap();
        let decryptor = Decryptor::new(sk);
        let decoded_sum = encoder.decode(&decryptor.decrypt(&ct_sum)).unwrap();
        for v in decoded_sum {
            assert!((v - Complex64::new(5.0, 0.0)).norm() < 1e-3, "{}", v);
        }

        let ct_prod = evaluator.multiply(&ct_a, &ct_b, &relin_key).unwrap();
        let decoded_prod = encoder.decode(&decryptor.decrypt(&ct_prod)).unwrap();
        for v in decoded_prod {
            assert!((v - Complex64::new(6.0, 0.0)).norm() < 1e-2, "{}", v);
        }
    }

    #[test]
    fn bootstrap_recovers_encoded_values_within_tolerance() {
        let par = Rc::new(
            CkksParametersBuilder::default()
                .poly_degree(16)
                .ciph_modulus(BigUint::from(1u64) << 40)
                .big_modulus(BigUint::from(1u64) << 1200)
                .scaling_factor((1u64 << 30) as f64)
                .hamming_weight(8)
                .taylor_iterations(7)
                .include_encryption_errors(false)
                .build()
                .unwrap(),
        );
        let mut rng = ChaChaRandomSource::new([37u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let pk = PublicKey::generate(&sk, &mut rng);
        let encryptor = Encryptor::new(pk);
        let evaluator = Evaluator::new(par.clone());
        let encoder = CkksEncoder::new(par.clone());
        let relin_key = RelinKey::generate(&sk, &mut rng);
        let conj_key = SwitchingKey::generate_conj_key(&par, &sk, &mut rng);
        let boot = BootstrappingContext::new(&par);

        let num_slots = par.num_slots();
        let mut n1 = (num_slots as f64).sqrt().floor() as usize;
        if n1 * n1 != num_slots {
            n1 = (2.0 * num_slots as f64).sqrt().floor() as usize;
        }
        let n1 = n1.max(1);
        let mut rot_keys = HashMap::new();
        for i in 1..n1 {
            rot_keys.insert(i as u64, RotationKey::generate(&sk, i as u64, &mut rng));
        }
        let n2 = num_slots / n1;
        for j in 1..n2 {
            let shift = (n1 * j) as u64;
            rot_keys.insert(shift, RotationKey::generate(&sk, shift, &mut rng));
        }

        let values: Vec<Complex64> = (0..num_slots).map(|i| Complex64::new(0.3 + 0.1 * i as f64, 0.0)).collect();
        let pt = encoder.encode(&values, par.scaling_factor()).unwrap();
        let ct = encryptor.encrypt(&pt, &mut rng);

        let (_original, refreshed) = evaluator.bootstrap(&ct, &rot_keys, &conj_key, &relin_key, &encoder, &boot).unwrap();

        let decryptor = Decryptor::new(sk);
        let decrypted = decryptor.decrypt(&refreshed);
        let decoded = encoder.decode(&decrypted).unwrap();
        for (a, b) in values.iter().zip(decoded.iter()) {
            assert!((a - b).norm() < 0.05, "{} vs {}", a, b);
        }
    }

    #[test]
    fn conjugate_is_approximately_involutive() {
        let par = small_params();
        let mut rng = ChaChaRandomSource::new([31u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let pk = PublicKey::generate(&sk, &mut rng);
        let encryptor = Encryptor::new(pk);
        let evaluator = Evaluator::new(par.clone());
        let encoder = CkksEncoder::new(par.clone());

        let values: Vec<Complex64> = (0..par.num_slots()).map(|i| Complex64::new(i as f64, 1.0)).collect();
        let pt = encoder.encode(&values, par.scaling_factor()).unwrap();
        let ct = encryptor.encrypt(&pt, &mut rng);

        let conj_key = SwitchingKey::generate_conj_key(&par, &sk, &mut rng);
        let conjugated_once = evaluator.conjugate(&ct, &conj_key).unwrap();
        let conjugated_twice = evaluator.conjugate(&conjugated_once, &conj_key).unwrap();

        let decryptor = Decryptor::new(sk);
        let decrypted = decryptor.decrypt(&conjugated_twice);
        let decoded = encoder.decode(&decrypted).unwrap();
        for (v, orig) in decoded.iter().zip(values.iter()) {
            assert!((v - orig).norm() < 1e-2, "{} vs {}", v, orig);
        }
    }
}
