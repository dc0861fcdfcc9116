//! Runtime configuration, read from the environment.

use std::time::Duration;

use crypto_utils::ZeroizingString;

use crate::credential_derivation::KeyDerivation;
use crate::error::WalletError;

/// Encoded sponsor secret (Base58 or JSON byte array). Optional.
pub const ENV_SPONSOR_SECRET: &str = "PASSKEY_SPONSOR_SECRET";

/// Timeout applied to each ledger call, in milliseconds.
pub const ENV_LEDGER_TIMEOUT_MS: &str = "PASSKEY_LEDGER_TIMEOUT_MS";

/// Seed derivation scheme: `xor` or `hkdf`.
pub const ENV_DERIVATION: &str = "PASSKEY_DERIVATION";

pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct WalletConfig {
    pub sponsor_secret: Option<ZeroizingString>,
    pub ledger_timeout: Duration,
    pub derivation: KeyDerivation,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            sponsor_secret: None,
            ledger_timeout: DEFAULT_LEDGER_TIMEOUT,
            derivation: KeyDerivation::default(),
        }
    }
}

impl WalletConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, WalletError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WalletError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // A blank secret is kept: sponsor resolution reports it as a placeholder.
        let mut config = Self {
            sponsor_secret: lookup(ENV_SPONSOR_SECRET).map(ZeroizingString::new),
            ..Self::default()
        };

        if let Some(raw) = lookup(ENV_LEDGER_TIMEOUT_MS) {
            let ms: u64 = raw.trim().parse().map_err(|e| {
                WalletError::Config(format!("{ENV_LEDGER_TIMEOUT_MS}={raw:?}: {e}"))
            })?;
            if ms == 0 {
                return Err(WalletError::Config(format!(
                    "{ENV_LEDGER_TIMEOUT_MS} must be greater than zero"
                )));
            }
            config.ledger_timeout = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup(ENV_DERIVATION) {
            config.derivation = raw.parse()?;
        }

        Ok(config)
    }

    pub fn sponsor_secret(&self) -> Option<&str> {
        self.sponsor_secret.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = WalletConfig::from_lookup(|_| None).unwrap();
        assert!(config.sponsor_secret().is_none());
        assert_eq!(config.ledger_timeout, DEFAULT_LEDGER_TIMEOUT);
        assert_eq!(config.derivation, KeyDerivation::XorPlaceholder);
    }

    #[test]
    fn reads_all_keys() {
        let config = WalletConfig::from_lookup(lookup_from(&[
            (ENV_SPONSOR_SECRET, "abc"),
            (ENV_LEDGER_TIMEOUT_MS, "1500"),
            (ENV_DERIVATION, "hkdf"),
        ]))
        .unwrap();
        assert_eq!(config.sponsor_secret(), Some("abc"));
        assert_eq!(config.ledger_timeout, Duration::from_millis(1500));
        assert_eq!(config.derivation, KeyDerivation::HkdfSha256);
    }

    #[test]
    fn secret_alone_keeps_other_defaults() {
        let config = WalletConfig::from_lookup(lookup_from(&[(ENV_SPONSOR_SECRET, "  ")])).unwrap();
        assert_eq!(config.sponsor_secret(), Some("  "));
        assert_eq!(config.ledger_timeout, DEFAULT_LEDGER_TIMEOUT);
        assert_eq!(config.derivation, KeyDerivation::XorPlaceholder);
    }

    #[test]
    fn bad_timeout_rejected() {
        let err = WalletConfig::from_lookup(lookup_from(&[(ENV_LEDGER_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, WalletError::Config(_)));

        let err = WalletConfig::from_lookup(lookup_from(&[(ENV_LEDGER_TIMEOUT_MS, "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn bad_scheme_rejected() {
        let err = WalletConfig::from_lookup(lookup_from(&[(ENV_DERIVATION, "pbkdf2")]))
            .unwrap_err();
        assert!(matches!(err, WalletError::Config(_)));
    }

    #[test]
    fn debug_hides_secret() {
        let config =
            WalletConfig::from_lookup(lookup_from(&[(ENV_SPONSOR_SECRET, "hunter2")])).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
