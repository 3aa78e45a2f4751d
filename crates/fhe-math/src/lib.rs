//! Arbitrary-precision ring arithmetic and the transforms that accelerate it.
//!
//! This crate is the arithmetic foundation of the workspace: number theory,
//! bit-reversal, the NTT/FTT, the FFT and canonical embedding, an RNS/CRT
//! context, the `Polynomial` and `DcrtPolynomial` ring element types (sharing
//! the `ring::RingElement` capability interface), the `RandomSource`
//! sampling interface, and small matrix helpers for CKKS's
//! matrix-by-ciphertext multiplication. The `bfv` and `ckks` crates build
//! scheme semantics on top of it and add nothing to the ring arithmetic
//! itself.

pub mod bitops;
pub mod crt;
pub mod dcrt;
pub mod error;
pub mod fft;
pub mod matrix;
pub mod ntt;
pub mod numth;
pub mod poly;
pub mod ring;
pub mod sampling;

pub use error::{Error, Result};
