use humansign_core::{ChainError, CoreError, EnvelopeError, IntegrityError};
use humansign_features::FeatureError;
use serde::Serialize;
use thiserror::Error;

/// Failure of any pipeline stage. The first failing stage wins.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Envelope parsing or signature verification failed.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    /// Document does not match the sealed hash, or could not be read.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    /// Event chain failed verification.
    #[error(transparent)]
    Chain(#[from] ChainError),
    /// Feature extraction or scoring failed.
    #[error(transparent)]
    Feature(#[from] FeatureError),
    /// Verifier could not be constructed from its configuration.
    #[error("invalid configuration: {0}")]
    Configuration(#[from] CoreError),
}

/// Stable, flat classification of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Token failed structural checks.
    MalformedEnvelope,
    /// Signature did not verify.
    SignatureInvalid,
    /// Signed payload lacks a required field.
    MalformedPayload,
    /// Document was modified after sealing.
    HashMismatch,
    /// Document stream could not be read.
    DocumentUnreadable,
    /// Chain has no blocks.
    EmptyChain,
    /// A block's stored hash is wrong.
    BlockHashMismatch,
    /// A block does not link to its predecessor.
    ChainBroken,
    /// A block's events fall outside its time range.
    TimeRangeViolation,
    /// Adjacent blocks overlap in time.
    NonMonotonicChain,
    /// Session too short to score.
    InsufficientEvents,
    /// Scorer failed.
    ScoringUnavailable,
    /// Verifier misconfigured.
    InvalidConfiguration,
}

impl ErrorKind {
    /// Stable string code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedEnvelope => "MALFORMED_ENVELOPE",
            ErrorKind::SignatureInvalid => "SIGNATURE_INVALID",
            ErrorKind::MalformedPayload => "MALFORMED_PAYLOAD",
            ErrorKind::HashMismatch => "HASH_MISMATCH",
            ErrorKind::DocumentUnreadable => "DOCUMENT_UNREADABLE",
            ErrorKind::EmptyChain => "EMPTY_CHAIN",
            ErrorKind::BlockHashMismatch => "BLOCK_HASH_MISMATCH",
            ErrorKind::ChainBroken => "CHAIN_BROKEN",
            ErrorKind::TimeRangeViolation => "TIME_RANGE_VIOLATION",
            ErrorKind::NonMonotonicChain => "NON_MONOTONIC_CHAIN",
            ErrorKind::InsufficientEvents => "INSUFFICIENT_EVENTS",
            ErrorKind::ScoringUnavailable => "SCORING_UNAVAILABLE",
            ErrorKind::InvalidConfiguration => "INVALID_CONFIGURATION",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PipelineError {
    /// Flat kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Envelope(e) => match e {
                EnvelopeError::MalformedEnvelope { .. } => ErrorKind::MalformedEnvelope,
                EnvelopeError::SignatureInvalid => ErrorKind::SignatureInvalid,
                EnvelopeError::MalformedPayload { .. } => ErrorKind::MalformedPayload,
            },
            PipelineError::Integrity(IntegrityError::HashMismatch) => ErrorKind::HashMismatch,
            PipelineError::Integrity(IntegrityError::Io(_)) => ErrorKind::DocumentUnreadable,
            PipelineError::Chain(e) => match e {
                ChainError::EmptyChain => ErrorKind::EmptyChain,
                ChainError::BlockHashMismatch { .. } => ErrorKind::BlockHashMismatch,
                ChainError::ChainBroken { .. } => ErrorKind::ChainBroken,
                ChainError::TimeRangeViolation { .. } => ErrorKind::TimeRangeViolation,
                ChainError::NonMonotonicChain { .. } => ErrorKind::NonMonotonicChain,
            },
            PipelineError::Feature(FeatureError::InsufficientEvents { .. }) => {
                ErrorKind::InsufficientEvents
            }
            PipelineError::Feature(FeatureError::ScoringUnavailable { .. }) => {
                ErrorKind::ScoringUnavailable
            }
            PipelineError::Configuration(_) => ErrorKind::InvalidConfiguration,
        }
    }

    /// Offending block index for chain errors.
    pub fn block_index(&self) -> Option<usize> {
        match self {
            PipelineError::Chain(e) => e.index(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_stable_codes() {
        let cases: Vec<(PipelineError, &str)> = vec![
            (EnvelopeError::SignatureInvalid.into(), "SIGNATURE_INVALID"),
            (IntegrityError::HashMismatch.into(), "HASH_MISMATCH"),
            (
                ChainError::ChainBroken { index: 2 }.into(),
                "CHAIN_BROKEN",
            ),
            (
                FeatureError::InsufficientEvents {
                    found: 1,
                    required: 10,
                }
                .into(),
                "INSUFFICIENT_EVENTS",
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.kind().as_str(), code);
        }
    }

    #[test]
    fn serde_name_matches_code() {
        let json = serde_json::to_value(ErrorKind::NonMonotonicChain).unwrap();
        assert_eq!(json, "NON_MONOTONIC_CHAIN");
    }

    #[test]
    fn io_failure_is_document_unreadable() {
        let err: PipelineError =
            IntegrityError::Io(std::io::Error::new(std::io::ErrorKind::Other, "gone")).into();
        assert_eq!(err.kind(), ErrorKind::DocumentUnreadable);
        assert_eq!(err.block_index(), None);
    }

    #[test]
    fn chain_errors_expose_block_index() {
        let err: PipelineError = ChainError::BlockHashMismatch { index: 4 }.into();
        assert_eq!(err.block_index(), Some(4));
    }
}
