//! Error kinds shared by every component in this crate, and re-exported by
//! the scheme crates built on top of it.

use thiserror::Error;

/// Errors produced by the ring-arithmetic core.
///
/// All operations here are pure with respect to their inputs: a failure
/// leaves no partial state and the caller is free to retry with different
/// arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("ciphertext moduli do not match: {0} != {1}")]
    ModulusMismatch(String, String),

    #[error("scaling factors do not match: {0} != {1}")]
    ScalingFactorMismatch(String, String),

    #[error("CRT reconstruction expected {expected} residues, got {got}")]
    CrtWrongLength { expected: usize, got: usize },

    #[error("no root of unity of order {order} exists modulo {modulus}")]
    NoRootOfUnity { order: u64, modulus: String },

    #[error("expected a Plaintext to decode")]
    DecodeTypeError,

    #[error("random source failed to produce a value")]
    RandomnessExhausted,
}

pub type Result<T> = std::result::Result<T, Error>;
