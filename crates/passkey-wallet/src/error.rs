use std::time::Duration;

use chain_sol::SolError;
use crypto_utils::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Missing recent blockhash")]
    MissingBlockhash,

    #[error("Signer mismatch: {0}")]
    SignerMismatch(String),

    #[error("Incomplete signatures: {0}")]
    IncompleteSignature(String),

    #[error("Invalid envelope state: {0}")]
    InvalidState(String),

    #[error("Transaction build failed: {0}")]
    TransactionFailed(String),

    #[error("Ledger {operation} timed out after {}ms", .elapsed.as_millis())]
    NetworkTimeout {
        operation: &'static str,
        elapsed: Duration,
    },

    #[error("Ledger request failed: {0}")]
    Ledger(String),

    #[error("Submission failed: {0}")]
    Submission(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WalletError {
    /// Whether the caller may retry the same operation unchanged.
    ///
    /// Only timeouts qualify. Resubmitting after a timeout is still subject
    /// to blockhash expiry, which is the caller's call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WalletError::NetworkTimeout { .. })
    }
}

impl From<CryptoError> for WalletError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidInput(msg) => WalletError::InvalidInput(msg),
            other => WalletError::DerivationFailed(other.to_string()),
        }
    }
}

impl From<SolError> for WalletError {
    fn from(e: SolError) -> Self {
        match e {
            SolError::MissingBlockhash => WalletError::MissingBlockhash,
            SolError::SignerMismatch(msg) => WalletError::SignerMismatch(msg),
            SolError::IncompleteSignature(msg) => WalletError::IncompleteSignature(msg),
            SolError::InvalidState(msg) => WalletError::InvalidState(msg),
            SolError::InvalidPrivateKey(msg) => WalletError::InvalidPrivateKey(msg),
            SolError::InvalidAddress(msg) => WalletError::InvalidInput(msg),
            other => WalletError::TransactionFailed(format!("SOL: {other}")),
        }
    }
}
