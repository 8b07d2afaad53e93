//! Verification core for HumanSign sessions.
//!
//! This crate provides:
//! - Event, block and chain types matching the envelope wire format
//! - Hash-chain verification producing a [`VerifiedChain`] marker type
//! - Chain flattening, accepted only for verified chains
//! - Signed-envelope verification behind a [`SignatureOracle`]
//! - Document hash binding
//!
//! Core invariants:
//! - Structural token checks run before any cryptography
//! - The document hash is compared only after the signature verified
//! - Error messages never echo unverified payload contents
//! - Every check is pure and fails fast on the first violation
//!
#![deny(missing_docs)]

/// Block and chain types plus the block hash rule.
pub mod block;
/// Hash-chain verification and flattening.
pub mod chain;
/// Signed envelope parsing and verification.
pub mod envelope;
/// Error types for core operations.
pub mod errors;
/// Event wire types.
pub mod event;
/// Document hash binding.
pub mod integrity;
/// Signature oracle trait and JWS implementation.
pub mod oracle;
/// Envelope sealing for fixtures and tooling.
pub mod seal;
/// Session identity and verified session view.
pub mod session;

pub use block::{compute_block_hash, Block, Chain, ChainBuilder};
pub use chain::{ChainFlattener, HashChainVerifier, VerifiedChain};
pub use envelope::{
    extract_token, Envelope, EnvelopeConfig, EnvelopeVerifier, DEFAULT_MAX_TOKEN_BYTES,
};
pub use errors::{ChainError, CoreError, EnvelopeError, IntegrityError};
pub use event::{Event, SessionEvent};
pub use integrity::IntegrityBinder;
pub use oracle::{JwsOracle, OracleError, SignatureOracle, VerifyingKey};
pub use seal::{seal_envelope, SealingKey};
pub use session::{SessionMetadata, VerifiedSession};
