//! Solana message compilation and the compact binary wire primitives.
//!
//! Transactions are built by hand, with no `solana-sdk` dependency. The wire
//! format is:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```

use crate::error::SolError;

/// Maximum size of a serialized transaction (IPv6 MTU minus headers).
pub const PACKET_DATA_SIZE: usize = 1232;

/// Size of an Ed25519 signature on the wire.
pub const SIGNATURE_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a compact-u16 value from a byte slice.
///
/// Returns `(value, bytes_consumed)` or an error if the data is truncated.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let mut value: u32 = 0;
    let mut shift = 0u32;
    let mut consumed = 0usize;

    loop {
        let byte = *data.get(consumed).ok_or_else(|| {
            SolError::SerializationError(
                "unexpected end of data while decoding compact-u16".into(),
            )
        })?;
        consumed += 1;

        value |= ((byte & 0x7f) as u32) << shift;
        shift += 7;

        if byte & 0x80 == 0 || consumed >= 3 {
            break;
        }
    }

    if value > u16::MAX as u32 {
        return Err(SolError::SerializationError(
            "compact-u16 value overflow".into(),
        ));
    }

    Ok((value as u16, consumed))
}

/// Encode a length as compact-u16, rejecting lengths that do not fit.
fn encode_len(len: usize, what: &str) -> Result<Vec<u8>, SolError> {
    let len = u16::try_from(len)
        .map_err(|_| SolError::SerializationError(format!("too many {what}: {len}")))?;
    Ok(encode_compact_u16(len))
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in a Solana instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolAccountMeta {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

/// A Solana instruction (before it is compiled into a transaction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolInstruction {
    pub program_id: [u8; 32],
    pub accounts: Vec<SolAccountMeta>,
    pub data: Vec<u8>,
}

impl SolInstruction {
    /// Distinct keys this instruction requires a signature from, in order.
    pub fn signers(&self) -> Vec<[u8; 32]> {
        let mut out: Vec<[u8; 32]> = Vec::new();
        for meta in self.accounts.iter().filter(|m| m.is_signer) {
            if !out.contains(&meta.pubkey) {
                out.push(meta.pubkey);
            }
        }
        out
    }
}

/// A compiled Solana message, ready to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolTransaction {
    /// All account keys referenced by this transaction, in canonical order:
    ///   1. writable signers
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<[u8; 32]>,

    /// Number of required signatures (first N accounts are signers).
    pub num_required_signatures: u8,
    /// How many of the signing accounts are read-only.
    pub num_readonly_signed: u8,
    /// How many of the non-signing accounts are read-only.
    pub num_readonly_unsigned: u8,

    /// Recent blockhash (32 bytes).
    pub recent_blockhash: [u8; 32],

    /// Compiled instructions (account references replaced with indices).
    pub compiled_instructions: Vec<CompiledInstruction>,
}

impl SolTransaction {
    /// The keys whose signatures this message requires, in slot order.
    pub fn signer_keys(&self) -> &[[u8; 32]] {
        &self.account_keys[..self.num_required_signatures as usize]
    }

    /// Signature slot for `pubkey`, if it is one of the required signers.
    pub fn signer_index(&self, pubkey: &[u8; 32]) -> Option<usize> {
        self.signer_keys().iter().position(|k| k == pubkey)
    }
}

/// A compiled instruction where account references are replaced by u8 indices
/// into the transaction's `account_keys` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    /// Index into `account_keys` for the program to invoke.
    pub program_id_index: u8,
    /// Indices into `account_keys` for each account the instruction reads/writes.
    pub account_indices: Vec<u8>,
    /// Opaque instruction data.
    pub data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Compile a set of instructions into a message with a single fee payer.
///
/// The fee payer is always a writable signer and is placed at index 0 in the
/// account keys. Other signers follow it in the canonical order.
pub fn compile_transaction(
    instructions: &[SolInstruction],
    fee_payer: &[u8; 32],
    recent_blockhash: &[u8; 32],
) -> Result<SolTransaction, SolError> {
    struct AccountEntry {
        pubkey: [u8; 32],
        is_signer: bool,
        is_writable: bool,
    }

    // Instruction account lists are tiny; a Vec keeps insertion order for free.
    let mut entries: Vec<AccountEntry> = Vec::new();

    let mut upsert = |pubkey: [u8; 32], signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    upsert(*fee_payer, true, true);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        // Program IDs are non-signer, read-only accounts.
        upsert(ix.program_id, false, false);
    }

    // Stable sort: within a category, insertion order is kept, so the fee
    // payer stays ahead of every other writable signer.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    if entries.len() > u8::MAX as usize {
        return Err(SolError::TransactionBuildError(format!(
            "too many accounts: {}",
            entries.len()
        )));
    }

    if entries[0].pubkey != *fee_payer {
        let pos = entries
            .iter()
            .position(|e| e.pubkey == *fee_payer)
            .ok_or_else(|| SolError::TransactionBuildError("fee payer lost during compile".into()))?;
        entries.swap(0, pos);
    }

    let num_signers = entries.iter().filter(|e| e.is_signer).count() as u8;
    let num_readonly_signed = entries
        .iter()
        .filter(|e| e.is_signer && !e.is_writable)
        .count() as u8;
    let num_readonly_unsigned = entries
        .iter()
        .filter(|e| !e.is_signer && !e.is_writable)
        .count() as u8;

    let account_keys: Vec<[u8; 32]> = entries.iter().map(|e| e.pubkey).collect();

    let index_of = |key: &[u8; 32], what: &str| -> Result<u8, SolError> {
        account_keys
            .iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| SolError::TransactionBuildError(format!("{what} not in account keys")))
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let program_id_index = index_of(&ix.program_id, "program_id")?;
        let account_indices = ix
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey, "account"))
            .collect::<Result<Vec<u8>, SolError>>()?;

        compiled.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(SolTransaction {
        account_keys,
        num_required_signatures: num_signers,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        compiled_instructions: compiled,
    })
}

/// Serialize the transaction message (the bytes that get signed).
pub fn serialize_message(tx: &SolTransaction) -> Result<Vec<u8>, SolError> {
    let mut buf = Vec::with_capacity(256);

    buf.push(tx.num_required_signatures);
    buf.push(tx.num_readonly_signed);
    buf.push(tx.num_readonly_unsigned);

    buf.extend_from_slice(&encode_len(tx.account_keys.len(), "account keys")?);
    for key in &tx.account_keys {
        buf.extend_from_slice(key);
    }

    buf.extend_from_slice(&tx.recent_blockhash);

    buf.extend_from_slice(&encode_len(tx.compiled_instructions.len(), "instructions")?);
    for ix in &tx.compiled_instructions {
        buf.push(ix.program_id_index);

        buf.extend_from_slice(&encode_len(ix.account_indices.len(), "instruction accounts")?);
        buf.extend_from_slice(&ix.account_indices);

        buf.extend_from_slice(&encode_len(ix.data.len(), "instruction data bytes")?);
        buf.extend_from_slice(&ix.data);
    }

    Ok(buf)
}

/// Assemble the wire format from filled signature slots and message bytes.
pub fn encode_wire(signatures: &[[u8; SIGNATURE_LEN]], message: &[u8]) -> Result<Vec<u8>, SolError> {
    let mut wire = Vec::with_capacity(3 + signatures.len() * SIGNATURE_LEN + message.len());
    wire.extend_from_slice(&encode_len(signatures.len(), "signatures")?);
    for sig in signatures {
        wire.extend_from_slice(sig);
    }
    wire.extend_from_slice(message);

    if wire.len() > PACKET_DATA_SIZE {
        return Err(SolError::SerializationError(format!(
            "transaction is {} bytes, limit is {PACKET_DATA_SIZE}",
            wire.len()
        )));
    }

    Ok(wire)
}
