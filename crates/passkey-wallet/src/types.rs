use chain_sol::{pubkey_from_seed, pubkey_to_address};
use crypto_utils::SecretSeed;
use serde::{Deserialize, Serialize};

/// An Ed25519 keypair in Solana form: seed, public key, Base58 address.
///
/// The seed is zeroized on drop and redacted from `Debug`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolKeypair {
    seed: SecretSeed,
    public_key: [u8; 32],
    address: String,
}

impl SolKeypair {
    /// Expand `seed` into the full keypair with the standard Solana expansion.
    pub fn from_seed(seed: SecretSeed) -> Self {
        let public_key = pubkey_from_seed(seed.as_bytes());
        Self {
            address: pubkey_to_address(&public_key),
            seed,
            public_key,
        }
    }

    /// The 32-byte signing seed. Treat as secret.
    pub fn seed(&self) -> &[u8; 32] {
        self.seed.as_bytes()
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// The non-secret part, suitable for handing to a UI or storing.
    pub fn summary(&self) -> WalletSummary {
        WalletSummary {
            address: self.address.clone(),
            public_key: bs58::encode(self.public_key).into_string(),
        }
    }
}

/// Public wallet identity. Never carries secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub address: String,
    pub public_key: String,
}
