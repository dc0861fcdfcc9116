use thiserror::Error;

/// Solana chain operation errors.
#[derive(Debug, Error)]
pub enum SolError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("missing recent blockhash")]
    MissingBlockhash,

    #[error("signer mismatch: {0}")]
    SignerMismatch(String),

    #[error("incomplete signatures: {0}")]
    IncompleteSignature(String),

    #[error("invalid envelope state: {0}")]
    InvalidState(String),

    #[error("signature verification failed: {0}")]
    VerificationError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}
