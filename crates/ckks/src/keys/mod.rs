mod public_key;
mod relin_key;
mod rotation_key;
mod secret_key;
mod switching_key;

pub use public_key::PublicKey;
pub use relin_key::RelinKey;
pub use rotation_key::RotationKey;
pub use secret_key::SecretKey;
pub use switching_key::SwitchingKey;
