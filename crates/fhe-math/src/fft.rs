//! Complex FFT and the CKKS canonical-embedding variant ("EMB").

use crate::bitops::{bit_reverse_vec, reverse_bits};
use crate::error::{Error, Result};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Precomputed roots of unity and rotation group for an FFT of length
/// `fft_length` (a power of two). `fft_length / 4` is the number of CKKS
/// slots the embedding variant operates on.
#[derive(Debug, Clone)]
pub struct FftContext {
    pub fft_length: usize,
    roots_of_unity: Vec<Complex64>,
    roots_of_unity_inv: Vec<Complex64>,
    rot_group: Vec<usize>,
}

impl FftContext {
    pub fn new(fft_length: usize) -> Self {
        debug_assert!(fft_length.is_power_of_two());
        let mut roots_of_unity = vec![Complex64::new(0.0, 0.0); fft_length];
        let mut roots_of_unity_inv = vec![Complex64::new(0.0, 0.0); fft_length];
        for i in 0..fft_length {
            let angle = 2.0 * PI * (i as f64) / (fft_length as f64);
            roots_of_unity[i] = Complex64::new(angle.cos(), angle.sin());
            roots_of_unity_inv[i] = Complex64::new((-angle).cos(), (-angle).sin());
        }

        let num_slots = fft_length / 4;
        let mut rot_group = vec![1usize; num_slots.max(1)];
        for i in 1..num_slots {
            rot_group[i] = (5 * rot_group[i - 1]) % fft_length;
        }

        FftContext {
            fft_length,
            roots_of_unity,
            roots_of_unity_inv,
            rot_group,
        }
    }

    /// Iterated complex FFT; `rou` must be at least as long as `coeffs`.
    pub fn fft(&self, coeffs: &[Complex64], rou: &[Complex64]) -> Vec<Complex64> {
        let n = coeffs.len();
        debug_assert!(rou.len() >= n);
        let mut result = bit_reverse_vec(coeffs);
        let log_n = n.trailing_zeros();

        for logm in 1..=log_n {
            let half = 1usize << (logm - 1);
            let step = 1usize << logm;
            let mut j = 0;
            while j < n {
                for i in 0..half {
                    let even = j + i;
                    let odd = j + i + half;
                    let rou_idx = (i * self.fft_length) >> logm;
                    let factor = rou[rou_idx] * result[odd];
                    let plus = result[even] + factor;
                    let minus = result[even] - factor;
                    result[even] = plus;
                    result[odd] = minus;
                }
                j += step;
            }
        }
        result
    }

    pub fn fft_fwd(&self, coeffs: &[Complex64]) -> Vec<Complex64> {
        self.fft(coeffs, &self.roots_of_unity)
    }

    pub fn fft_inv(&self, coeffs: &[Complex64]) -> Vec<Complex64> {
        let n = coeffs.len();
        let mut result = self.fft(coeffs, &self.roots_of_unity_inv);
        for v in result.iter_mut() {
            *v /= n as f64;
        }
        result
    }

    fn check_embedding_input(&self, values: &[Complex64]) -> Result<()> {
        if values.len() > self.fft_length / 4 {
            return Err(Error::InvalidParameter(format!(
                "embedding input must have length at most {}, got {}",
                self.fft_length / 4,
                values.len()
            )));
        }
        Ok(())
    }

    /// Evaluates at the primitive roots indexed `1 (mod 4)`: `w, w^5, w^(5^2), ...`.
    pub fn embedding(&self, coeffs: &[Complex64]) -> Result<Vec<Complex64>> {
        self.check_embedding_input(coeffs)?;
        let n = coeffs.len();
        let mut result = bit_reverse_vec(coeffs);
        let log_n = n.trailing_zeros();

        for logm in 1..=log_n {
            let idx_mod = 1usize << (logm + 2);
            let gap = self.fft_length / idx_mod;
            let half = 1usize << (logm - 1);
            let step = 1usize << logm;
            let mut j = 0;
            while j < n {
                for i in 0..half {
                    let even = j + i;
                    let odd = j + i + half;
                    let rou_idx = (self.rot_group[i] % idx_mod) * gap;
                    let factor = self.roots_of_unity[rou_idx] * result[odd];
                    let plus = result[even] + factor;
                    let minus = result[even] - factor;
                    result[even] = plus;
                    result[odd] = minus;
                }
                j += step;
            }
        }
        Ok(result)
    }

    /// Exact inverse of [`Self::embedding`].
    pub fn embedding_inv(&self, values: &[Complex64]) -> Result<Vec<Complex64>> {
        self.check_embedding_input(values)?;
        let n = values.len();
        let mut result = values.to_vec();
        let log_n = n.trailing_zeros();

        for logm in (1..=log_n).rev() {
            let idx_mod = 1usize << (logm + 2);
            let gap = self.fft_length / idx_mod;
            let half = 1usize << (logm - 1);
            let step = 1usize << logm;
            let mut j = 0;
            while j < n {
                for i in 0..half {
                    let even = j + i;
                    let odd = j + i + half;
                    let rou_idx = (self.rot_group[i] % idx_mod) * gap;
                    let plus = result[even] + result[odd];
                    let mut minus = result[even] - result[odd];
                    minus *= self.roots_of_unity_inv[rou_idx];
                    result[even] = plus;
                    result[odd] = minus;
                }
                j += step;
            }
        }

        let mut to_scale_down = bit_reverse_vec(&result);
        for v in to_scale_down.iter_mut() {
            *v /= n as f64;
        }
        Ok(to_scale_down)
    }
}
