//! Image fingerprinting for logs.
//!
//! Uploaded bytes are never logged; the SHA-256 digest identifies an image
//! across the request span and the upstream call.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// First 12 hex characters of the digest, for compact log fields.
pub fn short_digest(data: &[u8]) -> String {
    let mut hex = sha256_hex(data);
    hex.truncate(12);
    hex
}
