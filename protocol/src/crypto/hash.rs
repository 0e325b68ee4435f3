//! # Hashing Utilities
//!
//! SHA-256 over raw bytes, plus the hex rendering every block hash uses.
//! Block digests are always 64 lowercase hex characters; [`is_digest_hex`]
//! is the shape check the validator relies on.

use sha2::{Digest, Sha256};

use crate::config::DIGEST_HEX_LENGTH;

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use linkchain_protocol::crypto::sha256;
///
/// let hash = sha256(b"linkchain");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute SHA-256 and render it as lowercase hex.
///
/// ```
/// use linkchain_protocol::crypto::sha256_hex;
///
/// assert_eq!(
///     sha256_hex(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// True iff `s` looks like a digest we produced: exactly
/// [`DIGEST_HEX_LENGTH`] lowercase hex characters.
///
/// Uppercase hex is rejected. `hex::encode` never emits it, so an uppercase
/// digest can only come from somewhere else.
pub fn is_digest_hex(s: &str) -> bool {
    s.len() == DIGEST_HEX_LENGTH
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
