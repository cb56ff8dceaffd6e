//! # Digests
//!
//! SHA-256 over canonical bytes (document ids) and over plain strings
//! (`nameHash`, `saltedDomainHash`). Structured values must pass through
//! [`CanonicalBytes`] first; only values that are already strings on the
//! wire are hashed directly.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A 32-byte SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest([u8; 32]);

impl Sha256Digest {
    fn of(data: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&Sha256::digest(data));
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|b| write!(f, "{b:02x}"))
    }
}

pub fn sha256_digest(data: &CanonicalBytes) -> Sha256Digest {
    Sha256Digest::of(data.as_bytes())
}

/// Hex digest of canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

/// Hex digest of the UTF-8 bytes of `data`.
pub fn sha256_hex_str(data: &str) -> String {
    Sha256Digest::of(data.as_bytes()).to_hex()
}
