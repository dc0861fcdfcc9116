//! Fee-sponsored transaction envelopes.
//!
//! A sponsored envelope has exactly two required signers: the sponsor, which
//! is the fee payer and sits in signature slot 0, and the subject, the single
//! non-fee-payer signer referenced by the instructions. Signing is a
//! two-phase protocol with explicit states:
//!
//! ```text
//! Assembled --subject--> PartiallySigned { by: subject } --sponsor--> FullySigned --serialize--> Serialized
//! ```
//!
//! Both signers sign the same message bytes, which are computed once at
//! assembly and never touched by signing.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use zeroize::Zeroize;

use crate::address::pubkey_to_address;
use crate::error::SolError;
use crate::transaction::{
    compile_transaction, encode_wire, serialize_message, SolInstruction, SolTransaction,
    SIGNATURE_LEN,
};

/// Lifecycle of a [`SponsoredEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Compiled, no signatures yet. Instructions may still be added.
    Assembled,
    /// The subject has signed; the sponsor has not.
    PartiallySigned { by: [u8; 32] },
    /// Every required slot holds a signature.
    FullySigned,
    /// Wire bytes have been produced. Terminal.
    Serialized,
}

/// An in-memory sponsored transaction at some point of its lifecycle.
#[derive(Debug, Clone)]
pub struct SponsoredEnvelope {
    instructions: Vec<SolInstruction>,
    fee_payer: [u8; 32],
    subject: [u8; 32],
    message: SolTransaction,
    message_bytes: Vec<u8>,
    signatures: Vec<Option<[u8; SIGNATURE_LEN]>>,
    state: EnvelopeState,
}

impl SponsoredEnvelope {
    /// Compile `instructions` into an unsigned envelope paid for by `fee_payer`.
    ///
    /// The blockhash is checked first: an empty or all-zero blockhash fails
    /// with [`SolError::MissingBlockhash`] before anything is compiled.
    pub fn assemble(
        instructions: &[SolInstruction],
        fee_payer: &[u8; 32],
        recent_blockhash: &[u8],
    ) -> Result<Self, SolError> {
        let blockhash = parse_blockhash(recent_blockhash)?;
        let (message, subject) = compile_sponsored(instructions, fee_payer, &blockhash)?;
        let message_bytes = serialize_message(&message)?;

        Ok(Self {
            instructions: instructions.to_vec(),
            fee_payer: *fee_payer,
            subject,
            signatures: vec![None; message.num_required_signatures as usize],
            message,
            message_bytes,
            state: EnvelopeState::Assembled,
        })
    }

    /// Append an instruction. Only allowed before anyone has signed, since
    /// it changes the message bytes.
    pub fn add_instruction(&mut self, instruction: SolInstruction) -> Result<(), SolError> {
        if self.state != EnvelopeState::Assembled {
            return Err(SolError::InvalidState(format!(
                "cannot add instructions in state {:?}",
                self.state
            )));
        }

        let mut instructions = self.instructions.clone();
        instructions.push(instruction);
        let (message, subject) =
            compile_sponsored(&instructions, &self.fee_payer, &self.message.recent_blockhash)?;
        if subject != self.subject {
            return Err(SolError::TransactionBuildError(
                "instruction introduces a different subject signer".into(),
            ));
        }

        self.message_bytes = serialize_message(&message)?;
        self.message = message;
        self.instructions = instructions;
        Ok(())
    }

    /// Apply the subject signature and then the sponsor signature.
    ///
    /// Both identities are checked before either signature is written, so a
    /// mismatch leaves no partial state behind.
    pub fn co_sign(mut self, subject_key: &[u8; 32], sponsor_key: &[u8; 32]) -> Result<Self, SolError> {
        if self.state != EnvelopeState::Assembled {
            return Err(SolError::InvalidState(format!(
                "co-signing requires an unsigned envelope, found {:?}",
                self.state
            )));
        }

        let subject_signer = signing_key(subject_key);
        let sponsor_signer = signing_key(sponsor_key);
        self.check_identity(&subject_signer, &self.subject, "subject")?;
        self.check_identity(&sponsor_signer, &self.fee_payer, "sponsor")?;

        self.write_signature(&subject_signer)?;
        self.state = EnvelopeState::PartiallySigned { by: self.subject };
        self.write_signature(&sponsor_signer)?;
        self.state = EnvelopeState::FullySigned;
        Ok(self)
    }

    /// First phase: the subject authorizes the instruction.
    pub fn sign_as_subject(&mut self, subject_key: &[u8; 32]) -> Result<(), SolError> {
        if self.state != EnvelopeState::Assembled {
            return Err(SolError::InvalidState(format!(
                "subject must sign an unsigned envelope, found {:?}",
                self.state
            )));
        }

        let signer = signing_key(subject_key);
        self.check_identity(&signer, &self.subject, "subject")?;
        self.write_signature(&signer)?;
        self.state = EnvelopeState::PartiallySigned { by: self.subject };
        Ok(())
    }

    /// Second phase: the sponsor authorizes fee payment.
    pub fn sign_as_sponsor(&mut self, sponsor_key: &[u8; 32]) -> Result<(), SolError> {
        match self.state {
            EnvelopeState::PartiallySigned { by } if by == self.subject => {}
            other => {
                return Err(SolError::InvalidState(format!(
                    "sponsor signs after the subject, found {other:?}"
                )))
            }
        }

        let signer = signing_key(sponsor_key);
        self.check_identity(&signer, &self.fee_payer, "sponsor")?;
        self.write_signature(&signer)?;
        self.state = EnvelopeState::FullySigned;
        Ok(())
    }

    /// Produce wire bytes. Every signature slot must be filled.
    ///
    /// After the first call the envelope is `Serialized`; later calls return
    /// the same bytes.
    pub fn serialize(&mut self) -> Result<Vec<u8>, SolError> {
        let missing: Vec<String> = self
            .signatures
            .iter()
            .zip(self.message.signer_keys())
            .filter(|(sig, _)| sig.is_none())
            .map(|(_, key)| pubkey_to_address(key))
            .collect();
        if !missing.is_empty() {
            return Err(SolError::IncompleteSignature(format!(
                "{} of {} signatures missing ({})",
                missing.len(),
                self.signatures.len(),
                missing.join(", ")
            )));
        }

        let signatures: Vec<[u8; SIGNATURE_LEN]> = self.signatures.iter().flatten().copied().collect();
        let wire = encode_wire(&signatures, &self.message_bytes)?;
        self.state = EnvelopeState::Serialized;
        Ok(wire)
    }

    /// Verify every present signature against its signer key.
    pub fn verify_signatures(&self) -> Result<(), SolError> {
        for (slot, key) in self.signatures.iter().zip(self.message.signer_keys()) {
            let Some(sig) = slot else { continue };
            let vk = VerifyingKey::from_bytes(key)
                .map_err(|e| SolError::VerificationError(format!("bad signer key: {e}")))?;
            vk.verify_strict(&self.message_bytes, &Signature::from_bytes(sig))
                .map_err(|e| {
                    SolError::VerificationError(format!("{}: {e}", pubkey_to_address(key)))
                })?;
        }
        Ok(())
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    pub fn fee_payer(&self) -> &[u8; 32] {
        &self.fee_payer
    }

    pub fn subject(&self) -> &[u8; 32] {
        &self.subject
    }

    pub fn message(&self) -> &SolTransaction {
        &self.message
    }

    /// The canonical message bytes every signer signs.
    pub fn message_bytes(&self) -> &[u8] {
        &self.message_bytes
    }

    /// Signature slots in account order (sponsor first).
    pub fn signatures(&self) -> &[Option<[u8; SIGNATURE_LEN]>] {
        &self.signatures
    }

    fn check_identity(&self, signer: &SigningKey, expected: &[u8; 32], role: &str) -> Result<(), SolError> {
        let actual = signer.verifying_key().to_bytes();
        if actual != *expected {
            return Err(SolError::SignerMismatch(format!(
                "{role} key {} does not match envelope {role} {}",
                pubkey_to_address(&actual),
                pubkey_to_address(expected)
            )));
        }
        Ok(())
    }

    fn write_signature(&mut self, signer: &SigningKey) -> Result<(), SolError> {
        let pubkey = signer.verifying_key().to_bytes();
        let slot = self.message.signer_index(&pubkey).ok_or_else(|| {
            SolError::SignerMismatch(format!(
                "{} is not a required signer",
                pubkey_to_address(&pubkey)
            ))
        })?;
        let signature = signer.sign(&self.message_bytes);
        self.signatures[slot] = Some(signature.to_bytes());
        Ok(())
    }
}

fn signing_key(private_key: &[u8; 32]) -> SigningKey {
    let mut seed = *private_key;
    let key = SigningKey::from_bytes(&seed);
    seed.zeroize();
    key
}

fn parse_blockhash(recent_blockhash: &[u8]) -> Result<[u8; 32], SolError> {
    if recent_blockhash.is_empty() || recent_blockhash.iter().all(|&b| b == 0) {
        return Err(SolError::MissingBlockhash);
    }
    recent_blockhash.try_into().map_err(|_| {
        SolError::TransactionBuildError(format!(
            "blockhash must be 32 bytes, got {}",
            recent_blockhash.len()
        ))
    })
}

/// Compile and check the two-signer shape. Returns the message and the subject.
fn compile_sponsored(
    instructions: &[SolInstruction],
    fee_payer: &[u8; 32],
    blockhash: &[u8; 32],
) -> Result<(SolTransaction, [u8; 32]), SolError> {
    if instructions.is_empty() {
        return Err(SolError::TransactionBuildError(
            "envelope needs at least one instruction".into(),
        ));
    }

    let mut subjects: Vec<[u8; 32]> = Vec::new();
    for key in instructions.iter().flat_map(|ix| ix.signers()) {
        if key == *fee_payer {
            return Err(SolError::TransactionBuildError(
                "fee payer must be distinct from the instruction signer".into(),
            ));
        }
        if !subjects.contains(&key) {
            subjects.push(key);
        }
    }
    let subject = match subjects.as_slice() {
        [only] => *only,
        [] => {
            return Err(SolError::TransactionBuildError(
                "instructions name no subject signer".into(),
            ))
        }
        many => {
            return Err(SolError::TransactionBuildError(format!(
                "sponsored envelopes carry one subject signer, found {}",
                many.len()
            )))
        }
    };

    let message = compile_transaction(instructions, fee_payer, blockhash)?;
    Ok((message, subject))
}
