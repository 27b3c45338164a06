//! Password hashing seam.
//!
//! The algorithm is the caller's choice. [`SaltedSha256Hasher`] is a
//! reference implementation for tests and local runs.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::Secret;

/// An opaque password hash. Never the raw password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an encoded hash produced by a [`PasswordHasher`].
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The encoded form, suitable for storage.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Hashes raw passwords for storage.
pub trait PasswordHasher: Send + Sync {
    /// Produces an opaque hash of `raw`.
    fn hash(&self, raw: &Secret<String>) -> PasswordHash;

    /// Returns `true` if `raw` matches `hash`.
    fn verify(&self, raw: &Secret<String>, hash: &PasswordHash) -> bool;
}

/// SHA-256 over a random 16-byte salt and the password.
///
/// Encoded as `sha256$<salt hex>$<digest hex>`.
///
/// # Examples
///
/// ```
/// use task_guard::{PasswordHasher, SaltedSha256Hasher, Secret};
///
/// let hasher = SaltedSha256Hasher;
/// let raw = Secret::new("ValidP@ss123".to_string());
/// let hash = hasher.hash(&raw);
///
/// assert!(!hash.as_str().contains("ValidP@ss123"));
/// assert!(hasher.verify(&raw, &hash));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SaltedSha256Hasher;

const SCHEME: &str = "sha256";

impl SaltedSha256Hasher {
    fn digest(salt: &[u8], raw: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(raw.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl PasswordHasher for SaltedSha256Hasher {
    fn hash(&self, raw: &Secret<String>) -> PasswordHash {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = Self::digest(&salt, raw.expose_secret());
        PasswordHash(format!("{SCHEME}${}${digest}", hex::encode(salt)))
    }

    fn verify(&self, raw: &Secret<String>, hash: &PasswordHash) -> bool {
        let mut parts = hash.0.splitn(3, '$');
        let (Some(SCHEME), Some(salt_hex), Some(expected)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        Self::digest(&salt, raw.expose_secret()) == expected
    }
}
