//! Solana support for passkey-derived wallets.
//!
//! This crate handles Solana addresses, manual message compilation and wire
//! serialization, memo instructions, and two-signer fee-sponsored envelopes,
//! all without pulling in `solana-sdk` (which drags in tokio and 200+
//! transitive dependencies).
//!
//! Solana's compact binary wire format is implemented by hand, using
//! `ed25519-dalek` for Ed25519 signing and `bs58` for Base58 encoding.

pub mod address;
pub mod error;
pub mod memo;
pub mod sponsored;
pub mod transaction;

pub use address::{address_to_bytes, pubkey_from_seed, pubkey_to_address, validate_address};
pub use error::SolError;
pub use memo::{build_memo_instruction, build_note_instruction, MEMO_PROGRAM_ID};
pub use sponsored::{EnvelopeState, SponsoredEnvelope};
pub use transaction::{
    compile_transaction, decode_compact_u16, encode_compact_u16, serialize_message,
    CompiledInstruction, SolAccountMeta, SolInstruction, SolTransaction, PACKET_DATA_SIZE,
};
