//! # crypto-utils
//!
//! Key derivation, secret-holding wrappers, and secure random generation
//! shared by the wallet crates.

pub mod error;
pub mod kdf;
pub mod random;
pub mod zeroizing;

pub use error::CryptoError;
pub use zeroizing::{SecretSeed, ZeroizingString};
