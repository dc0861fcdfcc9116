use rand::RngCore;
use rand_core::OsRng;

use crate::zeroizing::SecretSeed;

/// Generates a fixed-size array of cryptographically secure random bytes.
pub fn random_bytes_fixed<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Generates a fresh 32-byte signing seed from the OS RNG.
///
/// Every call yields an unrelated seed; nothing is persisted.
pub fn random_seed() -> SecretSeed {
    SecretSeed::new(random_bytes_fixed::<32>())
}
