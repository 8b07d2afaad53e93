use thiserror::Error;

/// Hash-chain integrity violations. Each names the offending block index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The chain has no blocks.
    #[error("event chain is empty")]
    EmptyChain,
    /// Stored `block_hash` differs from the recomputed digest.
    #[error("block {index}: block hash does not match its contents")]
    BlockHashMismatch {
        /// Offending block.
        index: usize,
    },
    /// `prev_hash` does not link to the previous block (or genesis).
    #[error("block {index}: prev_hash does not link to the previous block")]
    ChainBroken {
        /// Offending block.
        index: usize,
    },
    /// Block range is inverted or an event lies outside it / out of order.
    #[error("block {index}: event timestamps violate the block time range")]
    TimeRangeViolation {
        /// Offending block.
        index: usize,
    },
    /// Block ends after the next block starts.
    #[error("block {index}: time range overlaps the next block")]
    NonMonotonicChain {
        /// Offending block.
        index: usize,
    },
}

impl ChainError {
    /// Offending block index, if the violation is block-specific.
    pub fn index(&self) -> Option<usize> {
        match self {
            ChainError::EmptyChain => None,
            ChainError::BlockHashMismatch { index }
            | ChainError::ChainBroken { index }
            | ChainError::TimeRangeViolation { index }
            | ChainError::NonMonotonicChain { index } => Some(*index),
        }
    }
}

/// Envelope parsing and signature failures.
///
/// Reasons are static strings: nothing from an unverified token is echoed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Token cannot be parsed or fails structural sanity checks.
    #[error("malformed envelope: {reason}")]
    MalformedEnvelope {
        /// Which structural check failed.
        reason: &'static str,
    },
    /// Cryptographic verification failed.
    #[error("envelope signature is invalid")]
    SignatureInvalid,
    /// A required payload field is missing or has the wrong type.
    #[error("malformed payload: field `{field}` is missing or invalid")]
    MalformedPayload {
        /// Payload key that failed.
        field: &'static str,
    },
}

/// Document binding failures.
#[derive(Error, Debug)]
pub enum IntegrityError {
    /// Document content hash disagrees with the sealed hash.
    #[error("document was modified after sealing")]
    HashMismatch,
    /// The document stream could not be read.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

/// Core error types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Chain verification failed.
    #[error(transparent)]
    Chain(#[from] ChainError),
    /// Envelope verification failed.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    /// Document binding failed.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    /// Invalid block construction input.
    #[error("invalid block: {0}")]
    InvalidBlock(String),
    /// Verifying or signing key could not be loaded.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// Token could not be signed.
    #[error("signing failed: {0}")]
    Signing(String),
    /// Canonicalization error.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] humansign_canonical::CanonicalizationError),
}
