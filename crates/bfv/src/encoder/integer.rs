//! Base-`B` positional integer encoding of a single scalar into a BFV
//! plaintext polynomial.
//!
//! Matches `int_encoder.py`: `encode` only loops while the value is
//! positive, so negative inputs silently produce the zero polynomial. This
//! is carried forward unchanged rather than inventing a sign-magnitude
//! scheme the reference never has.

use std::rc::Rc;

use fhe_math::poly::Polynomial;
use fhe_math::{Error, Result};
use fhe_traits::{FheDecoder, FheEncoder};
use num_bigint::BigInt;
use num_traits::Zero;

use crate::parameters::BfvParameters;
use crate::plaintext::Plaintext;

pub struct IntegerEncoder {
    par: Rc<BfvParameters>,
    base: BigInt,
}

impl IntegerEncoder {
    pub fn new(par: Rc<BfvParameters>) -> Self {
        Self::with_base(par, 2)
    }

    pub fn with_base(par: Rc<BfvParameters>, base: u32) -> Self {
        Self { par, base: BigInt::from(base) }
    }
}

impl FheEncoder<&BigInt> for IntegerEncoder {
    type Plaintext = Plaintext;

    fn encode(&self, value: &BigInt) -> Result<Plaintext> {
        let n = self.par.poly_degree;
        let mut coeffs = vec![BigInt::zero(); n];
        let mut remaining = value.clone();
        let mut i = 0;
        while remaining > BigInt::zero() {
            if i == n {
                return Err(Error::InvalidParameter(format!(
                    "{value} needs more than {n} base-{} digits to encode",
                    self.base
                )));
            }
            coeffs[i] = &remaining % &self.base;
            remaining /= &self.base;
            i += 1;
        }
        Ok(Plaintext::new(&self.par, Polynomial::new(n, coeffs)?))
    }
}

impl FheDecoder<BigInt> for IntegerEncoder {
    type Plaintext = Plaintext;

    fn decode(&self, plaintext: &Plaintext) -> Result<BigInt> {
        Ok(plaintext.poly().evaluate(&self.base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Rc<BfvParameters> {
        Rc::new(
            crate::parameters::BfvParametersBuilder::default()
                .poly_degree(16)
                .plain_modulus(1153)
                .ciph_modulus(num_bigint::BigUint::from(4_611_686_018_427_387_904u64))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn encodes_and_decodes_a_positive_integer() {
        let encoder = IntegerEncoder::new(params());
        let value = BigInt::from(42);
        let pt = encoder.encode(&value).unwrap();
        assert_eq!(encoder.decode(&pt).unwrap(), value);
    }

    #[test]
    fn negative_values_encode_to_the_zero_polynomial() {
        let encoder = IntegerEncoder::new(params());
        let pt = encoder.encode(&BigInt::from(-7)).unwrap();
        assert!(pt.poly().coeffs.iter().all(|c| *c == BigInt::zero()));
    }

    #[test]
    fn rejects_values_with_too_many_digits() {
        let par = Rc::new(
            crate::parameters::BfvParametersBuilder::default()
                .poly_degree(4)
                .plain_modulus(1153)
                .ciph_modulus(num_bigint::BigUint::from(4_611_686_018_427_387_904u64))
                .build()
                .unwrap(),
        );
        let encoder = IntegerEncoder::new(par);
        // 2^5 needs 5 base-2 digits but the ring only has 4 coefficients.
        let value = BigInt::from(32);
        assert!(encoder.encode(&value).is_err());
    }
}
