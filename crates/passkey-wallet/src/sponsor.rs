//! Sponsor (fee payer) resolution.
//!
//! The sponsor is resolved once per build flow from an optional persisted
//! secret. A usable secret gives a stable sponsor across runs. Anything else
//! falls back to a random per-process sponsor, which is only good for demos:
//! its address changes every run and nothing funds it. The fallback is
//! reported through [`SponsorSource::Ephemeral`] and a `warn!` so callers can
//! tell the two apart.

use std::sync::OnceLock;

use crypto_utils::random::random_seed;
use crypto_utils::SecretSeed;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::error::WalletError;
use crate::types::SolKeypair;

/// Where the sponsor keypair came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SponsorSource {
    /// Decoded from the configured secret; stable across runs.
    Configured,
    /// Randomly generated for this process.
    Ephemeral { reason: String },
}

impl SponsorSource {
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, SponsorSource::Ephemeral { .. })
    }
}

/// A sponsor keypair together with its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedSponsor {
    pub keypair: SolKeypair,
    pub source: SponsorSource,
}

impl ResolvedSponsor {
    /// Wrap an explicitly supplied keypair, e.g. a funded key loaded by the host.
    pub fn configured(keypair: SolKeypair) -> Self {
        Self {
            keypair,
            source: SponsorSource::Configured,
        }
    }
}

/// Resolve the sponsor from an optional encoded secret.
///
/// Never fails: an absent, placeholder or undecodable secret yields an
/// ephemeral sponsor.
pub fn resolve_sponsor(secret: Option<&str>) -> ResolvedSponsor {
    let reason = match secret.map(str::trim) {
        None => "no sponsor secret configured".to_string(),
        Some(s) if is_placeholder(s) => "sponsor secret is a placeholder".to_string(),
        Some(s) => match decode_sponsor_secret(s) {
            Ok(keypair) => {
                info!(sponsor = %keypair.address(), "using configured sponsor");
                return ResolvedSponsor::configured(keypair);
            }
            Err(e) => format!("sponsor secret could not be decoded: {e}"),
        },
    };

    let keypair = SolKeypair::from_seed(random_seed());
    warn!(
        sponsor = %keypair.address(),
        %reason,
        "falling back to an ephemeral sponsor; it changes every run and is not funded"
    );
    ResolvedSponsor {
        keypair,
        source: SponsorSource::Ephemeral { reason },
    }
}

/// Decode a sponsor secret.
///
/// Accepted forms:
/// - Base58 of a 64-byte keypair (seed followed by public key)
/// - Base58 of a 32-byte seed
/// - a JSON byte array of either length, as written by `solana-keygen`
pub fn decode_sponsor_secret(secret: &str) -> Result<SolKeypair, WalletError> {
    let secret = secret.trim();
    let bytes: Zeroizing<Vec<u8>> = if secret.starts_with('[') {
        Zeroizing::new(
            serde_json::from_str::<Vec<u8>>(secret)
                .map_err(|e| WalletError::InvalidPrivateKey(format!("bad JSON key array: {e}")))?,
        )
    } else {
        Zeroizing::new(
            bs58::decode(secret)
                .into_vec()
                .map_err(|e| WalletError::InvalidPrivateKey(format!("base58 decode failed: {e}")))?,
        )
    };

    let mut seed = [0u8; 32];
    match bytes.len() {
        32 => seed.copy_from_slice(&bytes),
        64 => seed.copy_from_slice(&bytes[..32]),
        n => {
            return Err(WalletError::InvalidPrivateKey(format!(
                "expected 32 or 64 bytes, got {n}"
            )))
        }
    }
    let keypair = SolKeypair::from_seed(SecretSeed::new(seed));
    zeroize::Zeroize::zeroize(&mut seed);

    if bytes.len() == 64 && keypair.public_key().as_slice() != &bytes[32..] {
        return Err(WalletError::InvalidPrivateKey(
            "public half does not match the seed".into(),
        ));
    }

    Ok(keypair)
}

fn is_placeholder(secret: &str) -> bool {
    let lower = secret.to_ascii_lowercase();
    secret.is_empty()
        || lower.starts_with("your_")
        || lower.starts_with("your-")
        || (secret.starts_with('<') && secret.ends_with('>'))
        || lower == "changeme"
}

/// Process-lifetime sponsor, resolved on first use and read-only afterwards.
#[derive(Debug, Default)]
pub struct SponsorCache {
    cell: OnceLock<ResolvedSponsor>,
}

impl SponsorCache {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Return the cached sponsor, resolving it from `secret` on first call.
    ///
    /// Later calls ignore `secret`; concurrent first calls resolve once.
    pub fn get_or_resolve(&self, secret: Option<&str>) -> &ResolvedSponsor {
        self.cell.get_or_init(|| resolve_sponsor(secret))
    }

    pub fn get(&self) -> Option<&ResolvedSponsor> {
        self.cell.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_sol::pubkey_from_seed;

    fn keypair_bytes(seed: [u8; 32]) -> Vec<u8> {
        let mut out = seed.to_vec();
        out.extend_from_slice(&pubkey_from_seed(&seed));
        out
    }

    #[test]
    fn base58_keypair_is_configured() {
        let encoded = bs58::encode(keypair_bytes([5; 32])).into_string();
        let sponsor = resolve_sponsor(Some(&encoded));
        assert_eq!(sponsor.source, SponsorSource::Configured);
        assert_eq!(sponsor.keypair.seed(), &[5; 32]);
    }

    #[test]
    fn base58_seed_is_configured() {
        let encoded = bs58::encode([6u8; 32]).into_string();
        let sponsor = resolve_sponsor(Some(&encoded));
        assert!(!sponsor.source.is_ephemeral());
        assert_eq!(sponsor.keypair.public_key(), &pubkey_from_seed(&[6; 32]));
    }

    #[test]
    fn json_array_is_configured() {
        let json = serde_json::to_string(&keypair_bytes([7; 32])).unwrap();
        let sponsor = resolve_sponsor(Some(&json));
        assert_eq!(sponsor.source, SponsorSource::Configured);
        assert_eq!(sponsor.keypair.seed(), &[7; 32]);
    }

    #[test]
    fn configured_sponsor_is_stable() {
        let encoded = bs58::encode([8u8; 32]).into_string();
        let a = resolve_sponsor(Some(&encoded));
        let b = resolve_sponsor(Some(&encoded));
        assert_eq!(a.keypair.address(), b.keypair.address());
    }

    #[test]
    fn missing_secret_falls_back() {
        let sponsor = resolve_sponsor(None);
        assert!(sponsor.source.is_ephemeral());
    }

    #[test]
    fn ephemeral_sponsors_differ() {
        let a = resolve_sponsor(None);
        let b = resolve_sponsor(None);
        assert_ne!(a.keypair.address(), b.keypair.address());
    }

    #[test]
    fn placeholders_fall_back() {
        for placeholder in ["", "   ", "YOUR_SPONSOR_SECRET_KEY", "<sponsor-key>", "changeme"] {
            let sponsor = resolve_sponsor(Some(placeholder));
            assert_eq!(
                sponsor.source,
                SponsorSource::Ephemeral {
                    reason: "sponsor secret is a placeholder".into()
                },
                "{placeholder:?}"
            );
        }
    }

    #[test]
    fn garbage_falls_back_with_reason() {
        let sponsor = resolve_sponsor(Some("0OIl-not-base58"));
        match sponsor.source {
            SponsorSource::Ephemeral { reason } => assert!(reason.contains("could not be decoded")),
            other => panic!("expected ephemeral, got {other:?}"),
        }
    }

    #[test]
    fn wrong_length_rejected() {
        let err = decode_sponsor_secret(&bs58::encode([1u8; 16]).into_string()).unwrap_err();
        assert!(err.to_string().contains("got 16"));
    }

    #[test]
    fn mismatched_public_half_rejected() {
        let mut bytes = keypair_bytes([9; 32]);
        bytes[63] ^= 0x01;
        let err = decode_sponsor_secret(&bs58::encode(&bytes).into_string()).unwrap_err();
        assert!(matches!(err, WalletError::InvalidPrivateKey(_)));
    }

    #[test]
    fn source_serializes_with_tag() {
        let json = serde_json::to_value(SponsorSource::Ephemeral {
            reason: "none".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "ephemeral");
        assert_eq!(json["reason"], "none");
    }

    #[test]
    fn cache_resolves_once() {
        let cache = SponsorCache::new();
        assert!(cache.get().is_none());

        let first = cache.get_or_resolve(None).keypair.address().to_string();
        let configured = bs58::encode([3u8; 32]).into_string();
        let second = cache.get_or_resolve(Some(&configured));

        assert_eq!(second.keypair.address(), first);
        assert!(second.source.is_ephemeral());
    }
}
