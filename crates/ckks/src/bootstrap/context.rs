//! Precomputed encoding matrices for CKKS bootstrapping's coefficient-to-slot
//! and slot-to-coefficient linear transforms.

use std::f64::consts::PI;

use fhe_math::matrix::{conjugate_matrix, transpose_matrix};
use num_complex::Complex64;

use crate::parameters::CkksParameters;

/// The four matrices (and their transposes/conjugate-transposes)
/// `coeff_to_slot`/`slot_to_coeff` multiply a ciphertext by, plus the
/// Taylor-expansion depth `exp` uses during the sine-extraction step.
///
/// Matches `ckks_bootstrapping_context.py`.
pub struct BootstrappingContext {
    pub num_taylor_iterations: usize,
    pub encoding_mat0: Vec<Vec<Complex64>>,
    pub encoding_mat1: Vec<Vec<Complex64>>,
    pub encoding_mat_transpose0: Vec<Vec<Complex64>>,
    pub encoding_mat_transpose1: Vec<Vec<Complex64>>,
    pub encoding_mat_conj_transpose0: Vec<Vec<Complex64>>,
    pub encoding_mat_conj_transpose1: Vec<Vec<Complex64>>,
}

impl BootstrappingContext {
    pub fn new(par: &CkksParameters) -> Self {
        let poly_degree = par.poly_degree;
        let num_slots = par.num_slots();

        let mut primitive_roots = vec![Complex64::new(0.0, 0.0); num_slots];
        let mut power: u64 = 1;
        for root in primitive_roots.iter_mut() {
            *root = get_primitive_root(power, poly_degree);
            power = (power * 5) % (2 * poly_degree as u64);
        }

        let mut encoding_mat0 = vec![vec![Complex64::new(0.0, 0.0); num_slots]; num_slots];
        let mut encoding_mat1 = vec![vec![Complex64::new(0.0, 0.0); num_slots]; num_slots];
        for i in 0..num_slots {
            encoding_mat0[i][0] = Complex64::new(1.0, 0.0);
            for k in 1..num_slots {
                encoding_mat0[i][k] = encoding_mat0[i][k - 1] * primitive_roots[i];
            }
            encoding_mat1[i][0] = encoding_mat0[i][num_slots - 1] * primitive_roots[i];
            for k in 1..num_slots {
                encoding_mat1[i][k] = encoding_mat1[i][k - 1] * primitive_roots[i];
            }
        }

        let encoding_mat_transpose0 = transpose_matrix(&encoding_mat0);
        let encoding_mat_transpose1 = transpose_matrix(&encoding_mat1);
        let encoding_mat_conj_transpose0 = conjugate_matrix(&encoding_mat_transpose0);
        let encoding_mat_conj_transpose1 = conjugate_matrix(&encoding_mat_transpose1);

        Self {
            num_taylor_iterations: par.taylor_iterations(),
            encoding_mat0,
            encoding_mat1,
            encoding_mat_transpose0,
            encoding_mat_transpose1,
            encoding_mat_conj_transpose0,
            encoding_mat_conj_transpose1,
        }
    }
}

/// `exp(i * pi * index / poly_degree)`.
fn get_primitive_root(index: u64, poly_degree: usize) -> Complex64 {
    let angle = PI * (index as f64) / (poly_degree as f64);
    Complex64::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn encoding_matrices_have_num_slots_shape() {
        let par = CkksParameters::default(16);
        let ctx = BootstrappingContext::new(&par);
        let n = par.num_slots();
        assert_eq!(ctx.encoding_mat0.len(), n);
        assert_eq!(ctx.encoding_mat0[0].len(), n);
        assert_eq!(ctx.encoding_mat1.len(), n);
        assert_eq!(ctx.encoding_mat_transpose0.len(), n);
        assert_eq!(ctx.encoding_mat_conj_transpose0.len(), n);
    }

    #[test]
    fn first_column_of_mat0_is_all_ones() {
        let par = CkksParameters::default(16);
        let ctx = BootstrappingContext::new(&par);
        for row in ctx.encoding_mat0.iter() {
            assert!((row[0] - Complex64::new(1.0, 0.0)).norm() < 1e-9);
        }
    }
}
