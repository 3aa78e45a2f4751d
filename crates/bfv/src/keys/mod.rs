mod public_key;
mod relin_key;
mod secret_key;

pub use public_key::PublicKey;
pub use relin_key::RelinKey;
pub use secret_key::SecretKey;
