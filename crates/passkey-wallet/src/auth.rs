//! The authentication collaborator (a passkey / WebAuthn ceremony).
//!
//! Only the credential's public key and id are consumed. The authentication
//! proof itself is the authenticator's business and is not checked here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::credential_derivation::{derive_with, recover, KeyDerivation};
use crate::error::WalletError;
use crate::types::{SolKeypair, WalletSummary};

/// A registered credential, as persisted by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub credential_id: String,
    pub public_key: Vec<u8>,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct AuthError(pub String);

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Run the registration ceremony for `username`.
    async fn register(&self, username: &str) -> Result<Credential, AuthError>;

    /// Run an authentication ceremony. Returns the id of the credential used.
    async fn authenticate(&self) -> Result<String, AuthError>;
}

/// What a host needs to persist after onboarding: the credential and the
/// public wallet identity. The keypair itself is re-derived on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub credential: Credential,
    pub wallet: WalletSummary,
    pub derivation: KeyDerivation,
}

/// Register a credential and derive its wallet.
pub async fn onboard(
    auth: &dyn Authenticator,
    username: &str,
    derivation: KeyDerivation,
) -> Result<(Registration, SolKeypair), WalletError> {
    if username.trim().is_empty() {
        return Err(WalletError::InvalidInput("username is empty".into()));
    }

    let credential = auth
        .register(username)
        .await
        .map_err(|e| WalletError::Authentication(format!("registration: {e}")))?;
    let wallet = derive_with(derivation, &credential.public_key)?;

    info!(
        credential_id = %credential.credential_id,
        address = %wallet.address(),
        ?derivation,
        "onboarded credential"
    );

    let registration = Registration {
        credential,
        wallet: wallet.summary(),
        derivation,
    };
    Ok((registration, wallet))
}

/// Authenticate and rebuild the signing keypair for a stored registration.
///
/// The authenticator must vouch for the same credential that was registered.
/// The keypair is re-derived from the stored credential public key and must
/// land on the stored address.
pub async fn unlock(
    auth: &dyn Authenticator,
    registration: &Registration,
) -> Result<SolKeypair, WalletError> {
    let credential_id = auth
        .authenticate()
        .await
        .map_err(|e| WalletError::Authentication(format!("authentication: {e}")))?;

    if credential_id != registration.credential.credential_id {
        return Err(WalletError::Authentication(format!(
            "authenticated with credential {credential_id}, wallet belongs to {}",
            registration.credential.credential_id
        )));
    }

    recover(
        registration.derivation,
        &registration.credential.public_key,
        &registration.wallet.address,
    )
}
