//! The sponsored note flow: a derived wallet attests to a note on chain while
//! the sponsor pays the fee.

use chain_sol::{build_note_instruction, decode_compact_u16, SponsoredEnvelope};
use tracing::debug;

use crate::error::WalletError;
use crate::sponsor::{ResolvedSponsor, SponsorSource};
use crate::types::SolKeypair;

/// A fully co-signed note transaction and the provenance of its sponsor.
#[derive(Debug, Clone)]
pub struct SponsoredNote {
    pub envelope: SponsoredEnvelope,
    pub sponsor_source: SponsorSource,
}

/// Build instruction, assemble and co-sign in one step.
///
/// `subject` signs first, `sponsor` second. Nothing is sent anywhere.
pub fn build_sponsored_note(
    subject: &SolKeypair,
    note: &str,
    sponsor: &ResolvedSponsor,
    recent_blockhash: &[u8],
) -> Result<SponsoredNote, WalletError> {
    let instruction = build_note_instruction(subject.public_key(), note)?;
    let envelope =
        SponsoredEnvelope::assemble(&[instruction], sponsor.keypair.public_key(), recent_blockhash)?
            .co_sign(subject.seed(), sponsor.keypair.seed())?;

    debug!(
        subject = %subject.address(),
        sponsor = %sponsor.keypair.address(),
        ephemeral_sponsor = sponsor.source.is_ephemeral(),
        note_len = note.len(),
        "built sponsored note"
    );

    Ok(SponsoredNote {
        envelope,
        sponsor_source: sponsor.source.clone(),
    })
}

/// Wire bytes for a fully signed envelope.
///
/// Fails with [`WalletError::IncompleteSignature`] if any slot is empty, so a
/// half-signed transaction never reaches the ledger.
pub fn to_wire_bytes(envelope: &mut SponsoredEnvelope) -> Result<Vec<u8>, WalletError> {
    Ok(envelope.serialize()?)
}

/// The transaction id of serialized wire bytes: the Base58 fee-payer signature.
pub fn transaction_id(wire: &[u8]) -> Result<String, WalletError> {
    let (count, used) = decode_compact_u16(wire)?;
    if count == 0 {
        return Err(WalletError::InvalidInput("transaction has no signatures".into()));
    }
    let first = wire.get(used..used + 64).ok_or_else(|| {
        WalletError::InvalidInput("transaction truncated inside first signature".into())
    })?;
    Ok(bs58::encode(first).into_string())
}
