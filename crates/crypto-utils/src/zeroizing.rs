use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte Ed25519 seed that is zeroed when dropped.
///
/// `Debug` is redacted so a seed never ends up in a log line.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretSeed([u8; 32]);

impl SecretSeed {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SecretSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretSeed(<redacted>)")
    }
}

impl PartialEq for SecretSeed {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretSeed {}

/// A `String` wrapper that is zeroed when dropped.
///
/// Use this for sensitive string data (encoded secret keys read from the
/// environment) that must not linger in memory after use.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ZeroizingString(String);

impl ZeroizingString {
    /// Creates a new `ZeroizingString` from a `String`.
    pub fn new(data: String) -> Self {
        Self(data)
    }

    /// Returns the length of the inner string in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the inner string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ZeroizingString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZeroizingString(<{} bytes redacted>)", self.0.len())
    }
}

impl Deref for ZeroizingString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ZeroizingString {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl From<&str> for ZeroizingString {
    fn from(data: &str) -> Self {
        Self::new(data.to_owned())
    }
}
