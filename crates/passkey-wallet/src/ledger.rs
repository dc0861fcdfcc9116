//! The ledger collaborator and the flows that talk to it.
//!
//! Every ledger call is a suspension point with no inherent deadline, so each
//! one is wrapped in the caller-supplied timeout. A timeout surfaces as
//! [`WalletError::NetworkTimeout`], which is retryable; a ledger-side failure
//! is not retried here. Whether resubmitting is safe depends on the
//! blockhash validity window, which only the caller can judge.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chain_sol::SponsoredEnvelope;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::WalletError;
use crate::sponsor::{ResolvedSponsor, SponsorSource};
use crate::sponsored_note::{build_sponsored_note, to_wire_bytes};
use crate::types::SolKeypair;

/// Confirmation status reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Finalized,
    Failed(String),
}

/// Errors reported by a [`Ledger`] implementation.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("transaction rejected: {0}")]
    Rejected(String),
}

/// Read and write access to the chain.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// A recent blockhash to anchor a new transaction.
    async fn recent_blockhash(&self) -> Result<[u8; 32], LedgerError>;

    /// Balance of `address` in lamports.
    async fn balance(&self, address: &str) -> Result<u64, LedgerError>;

    /// Submit serialized wire bytes. Returns the transaction id.
    async fn submit(&self, wire: &[u8]) -> Result<String, LedgerError>;

    async fn confirm(&self, transaction_id: &str) -> Result<TransactionStatus, LedgerError>;
}

/// Outcome of a submitted sponsored note.
#[derive(Debug, Clone)]
pub struct SubmittedNote {
    pub transaction_id: String,
    pub sponsor_source: SponsorSource,
    pub wire: Vec<u8>,
}

async fn bounded<T, F>(operation: &'static str, timeout: Duration, fut: F) -> Result<T, WalletError>
where
    F: Future<Output = Result<T, LedgerError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(|e| match e {
            LedgerError::Rejected(msg) => WalletError::Submission(msg),
            LedgerError::Rpc(msg) if operation == "submit" => WalletError::Submission(msg),
            LedgerError::Rpc(msg) => WalletError::Ledger(format!("{operation}: {msg}")),
        }),
        Err(_) => {
            warn!(operation, timeout_ms = timeout.as_millis() as u64, "ledger call timed out");
            Err(WalletError::NetworkTimeout {
                operation,
                elapsed: timeout,
            })
        }
    }
}

/// Serialize a signed envelope and hand it to the ledger.
///
/// Serialization runs first, so an envelope missing a signature fails with
/// [`WalletError::IncompleteSignature`] without any network call.
pub async fn submit_envelope(
    ledger: &dyn Ledger,
    envelope: &mut SponsoredEnvelope,
    timeout: Duration,
) -> Result<String, WalletError> {
    let wire = to_wire_bytes(envelope)?;
    bounded("submit", timeout, ledger.submit(&wire)).await
}

/// Fetch a blockhash, build and co-sign the note, and submit it.
pub async fn submit_sponsored_note(
    ledger: &dyn Ledger,
    subject: &SolKeypair,
    note: &str,
    sponsor: &ResolvedSponsor,
    timeout: Duration,
) -> Result<SubmittedNote, WalletError> {
    let blockhash = bounded("recent_blockhash", timeout, ledger.recent_blockhash()).await?;
    let mut built = build_sponsored_note(subject, note, sponsor, &blockhash)?;
    let wire = to_wire_bytes(&mut built.envelope)?;
    let transaction_id = bounded("submit", timeout, ledger.submit(&wire)).await?;

    info!(
        %transaction_id,
        subject = %subject.address(),
        sponsor = %sponsor.keypair.address(),
        ephemeral_sponsor = built.sponsor_source.is_ephemeral(),
        "submitted sponsored note"
    );

    Ok(SubmittedNote {
        transaction_id,
        sponsor_source: built.sponsor_source,
        wire,
    })
}

pub async fn fetch_balance(
    ledger: &dyn Ledger,
    wallet: &SolKeypair,
    timeout: Duration,
) -> Result<u64, WalletError> {
    bounded("balance", timeout, ledger.balance(wallet.address())).await
}

pub async fn confirm_transaction(
    ledger: &dyn Ledger,
    transaction_id: &str,
    timeout: Duration,
) -> Result<TransactionStatus, WalletError> {
    bounded("confirm", timeout, ledger.confirm(transaction_id)).await
}
