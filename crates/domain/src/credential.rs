//! Salted password digests for tourist and school accounts.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A salted SHA-256 digest stored as `<salt>$<hex digest>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Derive a digest for `password` with a fresh random salt.
    #[must_use]
    pub fn derive(password: &str) -> Self {
        let salt = uuid::Uuid::new_v4().simple().to_string();
        Self::with_salt(&salt, password)
    }

    fn with_salt(salt: &str, password: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        Self(format!("{salt}${}", hex::encode(hasher.finalize())))
    }

    /// Restore a digest previously produced by [`as_str`](Self::as_str).
    #[must_use]
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check `password` against this digest.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        match self.0.split_once('$') {
            Some((salt, _)) => Self::with_salt(salt, password) == *self,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_verify_the_original_password() {
        let digest = PasswordDigest::derive("Secret#2024");
        assert!(digest.verify("Secret#2024"));
    }

    #[test]
    fn should_reject_a_different_password() {
        let digest = PasswordDigest::derive("Secret#2024");
        assert!(!digest.verify("secret#2024"));
    }

    #[test]
    fn should_salt_each_derivation() {
        let a = PasswordDigest::derive("Secret#2024");
        let b = PasswordDigest::derive("Secret#2024");
        assert_ne!(a, b);
    }

    #[test]
    fn should_verify_after_restoring_from_storage() {
        let digest = PasswordDigest::derive("Secret#2024");
        let restored = PasswordDigest::from_stored(digest.as_str());
        assert!(restored.verify("Secret#2024"));
    }

    #[test]
    fn should_reject_everything_when_digest_is_empty() {
        assert!(!PasswordDigest::default().verify(""));
    }
}
