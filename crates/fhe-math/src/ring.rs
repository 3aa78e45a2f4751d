//! Shared capability interface for ring elements of `R` / `R_q`.
//!
//! Implemented by both [`crate::poly::Polynomial`] (a single big-modulus
//! representation) and [`crate::dcrt::DcrtPolynomial`] (an RNS/CRT
//! representation split across several NTT-friendly primes). Code that
//! should work identically over either representation is written once
//! against `RingElement` instead of duplicated per representation, per the
//! design note that `Polynomial` and `DcrtPolynomial` "must share a single
//! public interface ... model as a capability interface with two
//! implementations; scheme code must be polymorphic over it."
use num_bigint::BigInt;

use crate::error::Result;

/// A ring element supporting the operations schemes build on, parameterized
/// by whatever a given representation needs to know about the modulus: a
/// single [`num_bigint::BigUint`] for [`crate::poly::Polynomial`], a
/// [`crate::crt::CrtContext`] for [`crate::dcrt::DcrtPolynomial`].
pub trait RingElement: Sized + Clone {
    type Context;

    fn ring_degree(&self) -> usize;
    fn add(&self, other: &Self, ctx: &Self::Context) -> Result<Self>;
    fn subtract(&self, other: &Self, ctx: &Self::Context) -> Result<Self>;
    fn multiply(&self, other: &Self, ctx: &Self::Context) -> Result<Self>;
    fn scalar_multiply(&self, scalar: &BigInt, ctx: &Self::Context) -> Self;
    fn rotate(&self, r: u64) -> Self;
    fn conjugate(&self) -> Self;
    fn mod_small(&self, ctx: &Self::Context) -> Self;
}
