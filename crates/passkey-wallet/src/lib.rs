//! Passkey-derived Solana wallets with fee-sponsored transactions.
//!
//! A credential's public key is mapped to a deterministic Solana keypair
//! ([`derive`] / [`derive_with`]). That wallet can then authorize memo
//! transactions whose network fee is paid by a separate sponsor identity
//! ([`build_sponsored_note`]). Ledger and authenticator access are traits
//! ([`Ledger`], [`Authenticator`]); this crate ships no network client.

pub mod auth;
pub mod config;
pub mod credential_derivation;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod sponsor;
pub mod sponsored_note;
pub mod types;

pub use auth::{onboard, unlock, AuthError, Authenticator, Credential, Registration};
pub use config::WalletConfig;
pub use credential_derivation::{derive, derive_with, recover, KeyDerivation};
pub use error::WalletError;
pub use ledger::{
    confirm_transaction, fetch_balance, submit_envelope, submit_sponsored_note, Ledger,
    LedgerError, SubmittedNote, TransactionStatus,
};
pub use logging::{init_logging, LogFormat};
pub use sponsor::{resolve_sponsor, ResolvedSponsor, SponsorCache, SponsorSource};
pub use sponsored_note::{build_sponsored_note, to_wire_bytes, transaction_id, SponsoredNote};
pub use types::{SolKeypair, WalletSummary};

pub use chain_sol::{EnvelopeState, SponsoredEnvelope};
