//! SPL Memo program instructions.
//!
//! The memo program records its instruction data in the transaction log and
//! requires every account passed to it to have signed. That makes it the
//! simplest way to have a wallet attest to an arbitrary payload on chain.

use crate::error::SolError;
use crate::transaction::{SolAccountMeta, SolInstruction};

/// SPL Memo v2 program ID: `MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr`
pub const MEMO_PROGRAM_ID: [u8; 32] = [
    0x05, 0x4a, 0x53, 0x5a, 0x99, 0x29, 0x21, 0x06, 0x4d, 0x24, 0xe8, 0x71, 0x60, 0xda, 0x38,
    0x7c, 0x7c, 0x35, 0xb5, 0xdd, 0xbc, 0x92, 0xbb, 0x81, 0xe4, 0x1f, 0xa8, 0x40, 0x41, 0x05,
    0x44, 0x8d,
];

/// Build a memo instruction signed by `subject`.
///
/// `subject` is a required signer with no write permission. `payload` is
/// carried verbatim as instruction data.
pub fn build_memo_instruction(subject: &[u8; 32], payload: &[u8]) -> SolInstruction {
    SolInstruction {
        program_id: MEMO_PROGRAM_ID,
        accounts: vec![SolAccountMeta {
            pubkey: *subject,
            is_signer: true,
            is_writable: false,
        }],
        data: payload.to_vec(),
    }
}

/// Build a memo instruction carrying a human-readable note.
pub fn build_note_instruction(subject: &[u8; 32], note: &str) -> Result<SolInstruction, SolError> {
    if note.is_empty() {
        return Err(SolError::TransactionBuildError("note must not be empty".into()));
    }
    Ok(build_memo_instruction(subject, note.as_bytes()))
}
