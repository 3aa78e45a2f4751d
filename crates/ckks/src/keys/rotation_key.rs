//! Rotation keys for the CKKS scheme's Galois-automorphism slot rotation.

use std::rc::Rc;

use fhe_math::sampling::RandomSource;

use crate::keys::{SecretKey, SwitchingKey};
use crate::parameters::CkksParameters;

/// A switching key from `s.rotate(rotation)` back to `s`, one per rotation
/// amount a caller wants to support. Matches `ckks_key_generator.py`'s
/// `generate_rot_key`.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationKey {
    pub rotation: u64,
    pub(crate) key: SwitchingKey,
}

impl RotationKey {
    pub fn generate(sk: &SecretKey, rotation: u64, rng: &mut impl RandomSource) -> Self {
        let par = sk.parameters();
        let rotated = sk.poly().rotate(rotation);
        let key = SwitchingKey::generate(par, sk, &rotated, rng);
        Self { rotation, key }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhe_math::sampling::ChaChaRandomSource;

    #[test]
    fn rotation_key_records_its_rotation_amount() {
        let par = Rc::new(CkksParameters::default(16));
        let mut rng = ChaChaRandomSource::new([5u8; 32]);
        let sk = SecretKey::generate(&par, &mut rng);
        let rk = RotationKey::generate(&sk, 3, &mut rng);
        assert_eq!(rk.rotation, 3);
    }
}
