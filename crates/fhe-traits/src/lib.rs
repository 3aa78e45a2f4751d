//! Scheme-agnostic traits implemented by both `bfv` and `ckks`.
//!
//! Generalized from the trait-based API the mature scheme crate in the
//! teacher workspace (its `fhers` crate, built on `fhers-traits`) exposes;
//! here a single crate covers both schemes since they share the same shape
//! of interface (parameters own everything read-only; encoder/encrypter/
//! decrypter are thin, stateless wrappers around a parameters reference).

use fhe_math::Result;

/// Immutable scheme parameters shared by every other component.
pub trait FheParameters {
    /// Ring degree `N`.
    fn degree(&self) -> usize;
}

/// Encodes a plaintext-shaped value into a scheme's `Plaintext` type.
pub trait FheEncoder<Value> {
    type Plaintext;
    fn encode(&self, value: Value) -> Result<Self::Plaintext>;
}

/// Decodes a scheme's `Plaintext` type back into a plaintext-shaped value.
pub trait FheDecoder<Value> {
    type Plaintext;
    fn decode(&self, plaintext: &Self::Plaintext) -> Result<Value>;
}

/// Encrypts a `Plaintext` into a `Ciphertext`.
pub trait FheEncrypter<Plaintext, Ciphertext> {
    fn encrypt(&self, plaintext: &Plaintext) -> Result<Ciphertext>;
}

/// Decrypts a `Ciphertext` back into a `Plaintext`.
pub trait FheDecrypter<Plaintext, Ciphertext> {
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Plaintext>;
}
