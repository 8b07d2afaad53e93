use thiserror::Error;

/// Feature extraction and scoring failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    /// Too few events to produce meaningful features.
    #[error("insufficient events: found {found}, required {required}")]
    InsufficientEvents {
        /// Events in the session.
        found: usize,
        /// Configured minimum.
        required: usize,
    },
    /// The scorer could not produce a valid distribution.
    #[error("authorship scoring unavailable: {reason}")]
    ScoringUnavailable {
        /// Why scoring failed.
        reason: String,
    },
}

impl FeatureError {
    pub(crate) fn scoring(reason: impl Into<String>) -> Self {
        FeatureError::ScoringUnavailable {
            reason: reason.into(),
        }
    }
}
