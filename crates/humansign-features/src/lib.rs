//! Behavioral features and authorship scoring for verified HumanSign sessions.
//!
//! This crate provides:
//! - A versioned, ordered feature schema ([`FEATURE_NAMES`])
//! - Deterministic extraction from flattened session events
//! - The [`AuthorshipScorer`] seam plus a built-in [`HeuristicScorer`]
//!
//! Extraction only consumes events that already passed chain verification;
//! nothing here re-checks integrity.
//!
#![deny(missing_docs)]

/// Error types for extraction and scoring.
pub mod errors;
/// Feature schema and extractor.
pub mod extractor;
/// Event kind classification.
pub mod kinds;
/// Authorship scoring.
pub mod scorer;

pub use errors::FeatureError;
pub use extractor::{
    FeatureConfig, FeatureExtractor, FeatureVector, FEATURE_COUNT, FEATURE_NAMES,
    FEATURE_SCHEMA_VERSION,
};
pub use kinds::EventClass;
pub use scorer::{AuthorshipScore, AuthorshipScorer, HeuristicScorer, PROBABILITY_TOLERANCE};
