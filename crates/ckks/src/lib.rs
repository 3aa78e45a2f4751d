//! The CKKS approximate-number homomorphic encryption scheme over `R =
//! Z[x]/(x^N + 1)`, including bootstrapping.

pub mod bootstrap;
pub mod ciphertext;
pub mod decryptor;
pub mod encoder;
pub mod encryptor;
pub mod error;
pub mod evaluator;
pub mod keys;
pub mod parameters;
pub mod plaintext;
pub mod poly;

pub use bootstrap::BootstrappingContext;
pub use ciphertext::Ciphertext;
pub use decryptor::Decryptor;
pub use encoder::CkksEncoder;
pub use encryptor::Encryptor;
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use keys::{PublicKey, RelinKey, RotationKey, SecretKey, SwitchingKey};
pub use parameters::{CkksParameters, CkksParametersBuilder, CkksParametersBuilderError};
pub use plaintext::Plaintext;
pub use poly::CkksPoly;
