//! # Cryptographic Primitives
//!
//! The chain needs exactly one primitive: a collision-resistant digest.
//! We use SHA-256 from the `sha2` crate and render it as lowercase hex.
//! Nothing here is hand-rolled; this module is a thin, typed wrapper.

pub mod hash;

pub use hash::{is_digest_hex, sha256, sha256_hex};
