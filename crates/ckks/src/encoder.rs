//! Encoding complex vectors into plaintext polynomials and back, via the
//! CKKS canonical embedding.

use std::rc::Rc;

use fhe_math::fft::FftContext;
use fhe_math::poly::{round_f64_to_bigint, Polynomial};
use fhe_math::{Error, Result};
use num_complex::Complex64;
use num_traits::ToPrimitive;

use crate::parameters::CkksParameters;
use crate::plaintext::Plaintext;
use crate::poly::CkksPoly;

/// Encodes/decodes length-`N/2` complex vectors into degree-`N` plaintext
/// polynomials, matching `ckks_encoder.py`.
pub struct CkksEncoder {
    par: Rc<CkksParameters>,
    fft: FftContext,
}

impl CkksEncoder {
    pub fn new(par: Rc<CkksParameters>) -> Self {
        let fft = FftContext::new(2 * par.poly_degree);
        Self { par, fft }
    }

    /// Encodes `values` (exactly `N/2` of them) at the given `scaling_factor`.
    pub fn encode(&self, values: &[Complex64], scaling_factor: f64) -> Result<Plaintext> {
        let num_values = self.par.num_slots();
        if values.len() != num_values {
            return Err(Error::InvalidParameter(format!(
                "encode expects exactly {} values, got {}",
                num_values,
                values.len()
            )));
        }

        let to_scale = self.fft.embedding_inv(values)?;

        let mut coeffs = vec![num_bigint::BigInt::from(0); self.par.poly_degree];
        for i in 0..num_values {
            coeffs[i] = round_f64_to_bigint(to_scale[i].re * scaling_factor);
            coeffs[i + num_values] = round_f64_to_bigint(to_scale[i].im * scaling_factor);
        }

        let poly = Polynomial::new(self.par.poly_degree, coeffs)?;
        Ok(Plaintext::new(&self.par, CkksPoly::from_polynomial(poly, &self.par), scaling_factor))
    }

    /// Decodes a plaintext back into its `N/2` complex values.
    pub fn decode(&self, plain: &Plaintext) -> Result<Vec<Complex64>> {
        let num_values = self.par.num_slots();
        let reconstructed = plain.poly().to_polynomial();
        let coeffs = &reconstructed.coeffs;
        let scale = plain.scaling_factor();

        let message: Vec<Complex64> = (0..num_values)
            .map(|i| {
                let re = coeffs[i].to_f64().unwrap_or(0.0) / scale;
                let im = coeffs[i + num_values].to_f64().unwrap_or(0.0) / scale;
                Complex64::new(re, im)
            })
            .collect();

        self.fft.embedding(&message)
    }
}
