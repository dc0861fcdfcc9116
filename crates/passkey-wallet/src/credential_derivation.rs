//! Wallet derivation from an authentication credential's public key.
//!
//! The credential public key is opaque, variable-length input. Derivation
//! maps it to a 32-byte Ed25519 seed, which is then expanded into a Solana
//! keypair. Both schemes are pure functions of the input bytes: no
//! randomness, no clock, no counter.
//!
//! `XorPlaceholder` is NOT a key derivation function. Short inputs cycle,
//! the transform is invertible, and anyone who sees the credential public key
//! (which is public) can rebuild the private key. It exists for wallets that
//! were created with it. New wallets should use `HkdfSha256`.

use std::str::FromStr;

use crypto_utils::kdf::hkdf_sha256_seed;
use crypto_utils::SecretSeed;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::WalletError;
use crate::types::SolKeypair;

/// HKDF info label binding derived seeds to this use.
pub const SEED_DOMAIN_LABEL: &[u8] = b"passkey-wallet/solana-seed/v1";

/// Multiplier of the positional mask in the placeholder scheme.
const XOR_POSITION_STEP: usize = 7;

/// How credential bytes are turned into a seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyDerivation {
    /// `seed[i] = pk[i % len] ^ (i * 7)`. Deterministic, not secure.
    #[default]
    XorPlaceholder,
    /// HKDF-SHA256 over the credential bytes with [`SEED_DOMAIN_LABEL`].
    HkdfSha256,
}

impl FromStr for KeyDerivation {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xor" | "xor_placeholder" => Ok(KeyDerivation::XorPlaceholder),
            "hkdf" | "hkdf_sha256" => Ok(KeyDerivation::HkdfSha256),
            other => Err(WalletError::Config(format!(
                "unknown derivation scheme {other:?} (expected \"xor\" or \"hkdf\")"
            ))),
        }
    }
}

/// Derive the wallet for `credential_public_key` with the placeholder scheme.
pub fn derive(credential_public_key: &[u8]) -> Result<SolKeypair, WalletError> {
    derive_with(KeyDerivation::XorPlaceholder, credential_public_key)
}

/// Derive the wallet for `credential_public_key` with the given scheme.
pub fn derive_with(
    scheme: KeyDerivation,
    credential_public_key: &[u8],
) -> Result<SolKeypair, WalletError> {
    if credential_public_key.is_empty() {
        return Err(WalletError::InvalidInput(
            "credential public key is empty".into(),
        ));
    }

    let seed = match scheme {
        KeyDerivation::XorPlaceholder => xor_seed(credential_public_key),
        KeyDerivation::HkdfSha256 => {
            hkdf_sha256_seed(credential_public_key, None, SEED_DOMAIN_LABEL)?
        }
    };

    Ok(SolKeypair::from_seed(seed))
}

/// Rebuild a wallet from the credential public key stored at registration.
///
/// Recovery is derivation: the same credential bytes and scheme give back the
/// keypair that owns the original address. There is no path that hands out
/// a fresh key under an old address.
pub fn recover(
    scheme: KeyDerivation,
    credential_public_key: &[u8],
    expected_address: &str,
) -> Result<SolKeypair, WalletError> {
    let wallet = derive_with(scheme, credential_public_key)?;
    if wallet.address() != expected_address {
        return Err(WalletError::DerivationFailed(format!(
            "credential derives {} under {scheme:?}, not {expected_address}",
            wallet.address()
        )));
    }
    Ok(wallet)
}

fn xor_seed(input: &[u8]) -> SecretSeed {
    let mut seed = [0u8; 32];
    for (i, byte) in seed.iter_mut().enumerate() {
        *byte = input[i % input.len()] ^ (i * XOR_POSITION_STEP) as u8;
    }
    let out = SecretSeed::new(seed);
    seed.zeroize();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREDENTIAL: [u8; 3] = [0x01, 0x02, 0x03];

    #[test]
    fn xor_seed_matches_formula() {
        let wallet = derive(&CREDENTIAL).unwrap();
        let expected: Vec<u8> = (0..32)
            .map(|i| CREDENTIAL[i % 3] ^ (i * 7) as u8)
            .collect();
        assert_eq!(wallet.seed().as_slice(), expected.as_slice());
        // Spot-check a few positions by hand.
        assert_eq!(wallet.seed()[0], 0x01);
        assert_eq!(wallet.seed()[1], 0x02 ^ 7);
        assert_eq!(wallet.seed()[31], 0x02 ^ 217);
    }

    #[test]
    fn derive_is_deterministic() {
        let a = derive(&CREDENTIAL).unwrap();
        let b = derive(&CREDENTIAL).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn derive_hkdf_is_deterministic() {
        let a = derive_with(KeyDerivation::HkdfSha256, &CREDENTIAL).unwrap();
        let b = derive_with(KeyDerivation::HkdfSha256, &CREDENTIAL).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn hkdf_known_seed() {
        let wallet = derive_with(KeyDerivation::HkdfSha256, &CREDENTIAL).unwrap();
        let expected: [u8; 32] = [
            0x46, 0xf8, 0xd6, 0x86, 0x58, 0x50, 0x83, 0x6b, 0xf5, 0x6c, 0xf5, 0x6d, 0x21, 0x29,
            0x95, 0xb5, 0xee, 0x7c, 0x96, 0xa5, 0xdf, 0x66, 0x6a, 0x2b, 0x2f, 0x19, 0x67, 0x20,
            0x12, 0x23, 0xb7, 0x2a,
        ];
        assert_eq!(wallet.seed(), &expected);
    }

    #[test]
    fn schemes_disagree() {
        let xor = derive_with(KeyDerivation::XorPlaceholder, &CREDENTIAL).unwrap();
        let hkdf = derive_with(KeyDerivation::HkdfSha256, &CREDENTIAL).unwrap();
        assert_ne!(xor.address(), hkdf.address());
    }

    #[test]
    fn single_byte_input_fills_seed() {
        for scheme in [KeyDerivation::XorPlaceholder, KeyDerivation::HkdfSha256] {
            let wallet = derive_with(scheme, &[0xAB]).unwrap();
            assert_eq!(wallet.seed().len(), 32);
        }
        let wallet = derive(&[0xAB]).unwrap();
        assert!(wallet
            .seed()
            .iter()
            .enumerate()
            .all(|(i, b)| *b == 0xAB ^ (i * 7) as u8));
    }

    #[test]
    fn long_input_only_uses_first_32_bytes_under_xor() {
        let mut long = vec![0x5Au8; 64];
        let a = derive(&long).unwrap();
        long[40] ^= 0xFF;
        let b = derive(&long).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_bit_flip_changes_seed() {
        let base: Vec<u8> = (0u8..65).collect();
        let original = derive(&base).unwrap();
        for byte in 0..32 {
            for bit in 0..8 {
                let mut flipped = base.clone();
                flipped[byte] ^= 1 << bit;
                let changed = derive(&flipped).unwrap();
                assert_ne!(original.seed(), changed.seed(), "byte {byte} bit {bit}");
            }
        }
    }

    #[test]
    fn single_bit_flip_changes_hkdf_seed() {
        let base = [0x10u8, 0x20, 0x30, 0x40];
        let original = derive_with(KeyDerivation::HkdfSha256, &base).unwrap();
        let mut flipped = base;
        flipped[3] ^= 0x01;
        let changed = derive_with(KeyDerivation::HkdfSha256, &flipped).unwrap();
        assert_ne!(original.seed(), changed.seed());
    }

    #[test]
    fn empty_input_rejected() {
        for scheme in [KeyDerivation::XorPlaceholder, KeyDerivation::HkdfSha256] {
            let err = derive_with(scheme, &[]).unwrap_err();
            assert!(matches!(err, WalletError::InvalidInput(_)));
        }
    }

    #[test]
    fn recover_returns_original_keypair() {
        let original = derive(&CREDENTIAL).unwrap();
        let recovered =
            recover(KeyDerivation::XorPlaceholder, &CREDENTIAL, original.address()).unwrap();
        assert_eq!(original, recovered);
    }

    #[test]
    fn recover_rejects_wrong_address() {
        let other = derive(&[9, 9, 9]).unwrap();
        let err = recover(KeyDerivation::XorPlaceholder, &CREDENTIAL, other.address()).unwrap_err();
        assert!(matches!(err, WalletError::DerivationFailed(_)));
    }

    #[test]
    fn scheme_parsing() {
        assert_eq!("xor".parse::<KeyDerivation>().unwrap(), KeyDerivation::XorPlaceholder);
        assert_eq!(" HKDF ".parse::<KeyDerivation>().unwrap(), KeyDerivation::HkdfSha256);
        assert!(matches!(
            "scrypt".parse::<KeyDerivation>().unwrap_err(),
            WalletError::Config(_)
        ));
    }
}
