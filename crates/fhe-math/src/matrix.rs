//! Vector/matrix helpers used by CKKS matrix-by-ciphertext multiplication
//! and bootstrapping's encoding matrices.

use num_complex::Complex64;

pub fn matrix_vector_multiply(mat: &[Vec<Complex64>], vec: &[Complex64]) -> Vec<Complex64> {
    mat.iter()
        .map(|row| {
            row.iter()
                .zip(vec.iter())
                .fold(Complex64::new(0.0, 0.0), |acc, (&m, &v)| acc + m * v)
        })
        .collect()
}

pub fn add(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(&x, &y)| x + y).collect()
}

pub fn scalar_multiply(v: &[Complex64], c: Complex64) -> Vec<Complex64> {
    v.iter().map(|&x| x * c).collect()
}

/// The `i`th diagonal `(M[0][i], M[1][i+1], ..., M[N-1][i-1])` of an `N x N`
/// matrix.
pub fn diagonal(mat: &[Vec<Complex64>], i: usize) -> Vec<Complex64> {
    let n = mat.len();
    (0..n).map(|j| mat[j % n][(i + j) % n]).collect()
}

/// Rotates a vector left by `i`: `(v[i], v[i+1], ..., v[i-1])`.
pub fn rotate(v: &[Complex64], i: usize) -> Vec<Complex64> {
    let n = v.len();
    (0..n).map(|j| v[(j + i) % n]).collect()
}

pub fn transpose_matrix(mat: &[Vec<Complex64>]) -> Vec<Vec<Complex64>> {
    let rows = mat.len();
    let cols = mat[0].len();
    (0..cols)
        .map(|c| (0..rows).map(|r| mat[r][c]).collect())
        .collect()
}

pub fn conjugate_matrix(mat: &[Vec<Complex64>]) -> Vec<Vec<Complex64>> {
    mat.iter()
        .map(|row| row.iter().map(|v| v.conj()).collect())
        .collect()
}
