//! Solana address derivation and validation.
//!
//! Solana addresses are simply Base58-encoded 32-byte Ed25519 public keys.
//! There is no hashing step (unlike Bitcoin or Ethereum).

use zeroize::Zeroize;

use crate::error::SolError;

/// Convert a 32-byte Ed25519 public key to a Solana address string.
pub fn pubkey_to_address(ed25519_pubkey: &[u8; 32]) -> String {
    bs58::encode(ed25519_pubkey).into_string()
}

/// Expand a 32-byte seed into its Ed25519 public key.
///
/// This is the standard Solana seed-to-keypair expansion: the seed is the
/// Ed25519 secret scalar source and the public key is the address.
pub fn pubkey_from_seed(seed: &[u8; 32]) -> [u8; 32] {
    let mut copy = *seed;
    let signing_key = ed25519_dalek::SigningKey::from_bytes(&copy);
    copy.zeroize();
    signing_key.verifying_key().to_bytes()
}

/// Decode a Solana address string to its 32-byte representation.
///
/// Returns an error if the address is not valid Base58 or does not decode
/// to exactly 32 bytes.
pub fn address_to_bytes(address: &str) -> Result<[u8; 32], SolError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })?;

    Ok(arr)
}

/// Check that `address` is a well-formed Solana address.
pub fn validate_address(address: &str) -> Result<(), SolError> {
    address_to_bytes(address).map(|_| ())
}
