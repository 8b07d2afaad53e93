//! Canonical data model primitives for HumanSign envelopes and event chains.
//!
//! Every byte that participates in hashing passes through this crate:
//! block hashes are SHA-256 over RFC 8785 canonical JSON, document hashes are
//! SHA-256 over the raw bytes, and both are exchanged as 64-character hex.
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic hashing.
pub mod canonicalizer;
/// Digest primitives and the genesis sentinel.
pub mod digest;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, Canonicalizer, DEFAULT_MAX_DEPTH};
pub use digest::{DigestAlg, HexDigest, GENESIS_HASH, SHA256_LEN};
pub use validation::ValidationError;
