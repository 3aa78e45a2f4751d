//! Ciphertext type for the BFV scheme.

use std::ops::{Add, Neg, Sub};
use std::rc::Rc;

use fhe_math::poly::Polynomial;

use crate::parameters::BfvParameters;

/// A fresh or relinearized BFV ciphertext, always of size two: `(c0, c1)`
/// such that `c0 + c1 * s ~= delta * m (mod q)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ciphertext {
    pub(crate) par: Rc<BfvParameters>,
    pub(crate) c0: Polynomial,
    pub(crate) c1: Polynomial,
}

impl Ciphertext {
    pub(crate) fn new(par: &Rc<BfvParameters>, c0: Polynomial, c1: Polynomial) -> Self {
        Self { par: par.clone(), c0, c1 }
    }
}

impl Add<&Ciphertext> for &Ciphertext {
    type Output = Ciphertext;

    fn add(self, rhs: &Ciphertext) -> Ciphertext {
        debug_assert_eq!(self.par, rhs.par);
        let q = &self.par.ciph_modulus;
        Ciphertext {
            par: self.par.clone(),
            c0: self.c0.add(&rhs.c0, Some(q)).expect("degree-matched addition"),
            c1: self.c1.add(&rhs.c1, Some(q)).expect("degree-matched addition"),
        }
    }
}

impl Sub<&Ciphertext> for &Ciphertext {
    type Output = Ciphertext;

    fn sub(self, rhs: &Ciphertext) -> Ciphertext {
        debug_assert_eq!(self.par, rhs.par);
        let q = &self.par.ciph_modulus;
        Ciphertext {
            par: self.par.clone(),
            c0: self.c0.subtract(&rhs.c0, Some(q)).expect("degree-matched subtraction"),
            c1: self.c1.subtract(&rhs.c1, Some(q)).expect("degree-matched subtraction"),
        }
    }
}

impl Neg for &Ciphertext {
    type Output = Ciphertext;

    fn neg(self) -> Ciphertext {
        let q = &self.par.ciph_modulus;
        let minus_one = num_bigint::BigInt::from(-1);
        Ciphertext {
            par: self.par.clone(),
            c0: self.c0.scalar_multiply(&minus_one, Some(q)),
            c1: self.c1.scalar_multiply(&minus_one, Some(q)),
        }
    }
}
