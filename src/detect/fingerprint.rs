use sha2::{Digest, Sha256};
use std::fmt;

/// Content digest of a payload as received over the wire.
///
/// Used only to tell whether two payloads are byte-identical.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes the lowercase hex SHA-256 of `bytes`.
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Wraps a digest previously read back from a store.
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
