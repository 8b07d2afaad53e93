//! Authorship scoring over feature vectors.

use serde::Serialize;
use tracing::debug;

use crate::errors::FeatureError;
use crate::extractor::{FeatureVector, FEATURE_COUNT, FEATURE_SCHEMA_VERSION};

/// Allowed deviation of a probability sum from 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Probability distribution over authorship classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AuthorshipScore {
    /// Typed by a person.
    pub organic_human: f64,
    /// Produced with generative assistance.
    pub ai_assisted: f64,
    /// Pasted from elsewhere.
    pub pasted: f64,
}

impl AuthorshipScore {
    /// Validates a distribution: finite, non-negative, summing to 1.
    pub fn new(organic_human: f64, ai_assisted: f64, pasted: f64) -> Result<Self, FeatureError> {
        let parts = [organic_human, ai_assisted, pasted];
        if parts.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(FeatureError::scoring(
                "probabilities must be finite and non-negative",
            ));
        }
        if (parts.iter().sum::<f64>() - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(FeatureError::scoring("probabilities do not sum to 1"));
        }
        Ok(Self {
            organic_human,
            ai_assisted,
            pasted,
        })
    }
}

/// Maps a feature vector to an [`AuthorshipScore`].
///
/// Implementations must be deterministic for a given vector and must reject
/// vectors whose schema they were not built for.
pub trait AuthorshipScorer: Send + Sync {
    /// Schema version this scorer accepts.
    fn schema_version(&self) -> u32 {
        FEATURE_SCHEMA_VERSION
    }

    /// Scores `features`.
    fn score(&self, features: &FeatureVector) -> Result<AuthorshipScore, FeatureError>;
}

// Indices into the v1 vector.
const IKI_CV: usize = 6;
const BURST_RATIO: usize = 7;
const PAUSE_RATIO: usize = 8;
const PASTE_RATIO: usize = 11;
const DELETION_RATIO: usize = 12;
const TYPING_RATE: usize = 13;

/// Typing rate at which the rate input saturates.
const TYPING_RATE_CEILING: f64 = 600.0;

/// `(feature index, weight)` terms of one class logit.
type Terms = &'static [(usize, f64)];

const ORGANIC: (f64, Terms) = (
    0.5,
    &[
        (IKI_CV, 1.2),
        (BURST_RATIO, 0.8),
        (PAUSE_RATIO, 0.6),
        (PASTE_RATIO, -4.0),
        (DELETION_RATIO, 2.5),
        (TYPING_RATE, -0.5),
    ],
);

const AI_ASSISTED: (f64, Terms) = (
    0.0,
    &[
        (IKI_CV, -1.5),
        (BURST_RATIO, 0.4),
        (PAUSE_RATIO, 1.5),
        (PASTE_RATIO, 1.0),
        (DELETION_RATIO, -2.0),
        (TYPING_RATE, 1.5),
    ],
);

const PASTED: (f64, Terms) = (
    -1.5,
    &[(PASTE_RATIO, 8.0), (BURST_RATIO, -0.5), (DELETION_RATIO, -1.0)],
);

/// Built-in deterministic scorer: linear logits over clamped v1 features
/// followed by a softmax.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    /// Creates the scorer.
    pub fn new() -> Self {
        Self
    }

    fn input(values: &[f64], index: usize) -> f64 {
        let raw = values[index];
        match index {
            IKI_CV => raw.clamp(0.0, 2.0),
            TYPING_RATE => (raw / TYPING_RATE_CEILING).clamp(0.0, 1.0),
            _ => raw.clamp(0.0, 1.0),
        }
    }

    fn logit(values: &[f64], (bias, terms): (f64, Terms)) -> f64 {
        terms
            .iter()
            .fold(bias, |acc, &(index, weight)| acc + weight * Self::input(values, index))
    }
}

impl AuthorshipScorer for HeuristicScorer {
    fn score(&self, features: &FeatureVector) -> Result<AuthorshipScore, FeatureError> {
        if features.version != self.schema_version() {
            return Err(FeatureError::scoring("unsupported feature schema version"));
        }
        if features.values.len() != FEATURE_COUNT {
            return Err(FeatureError::scoring("feature vector has the wrong length"));
        }
        if features.values.iter().any(|v| !v.is_finite()) {
            return Err(FeatureError::scoring("feature vector contains non-finite values"));
        }

        let logits = [
            Self::logit(&features.values, ORGANIC),
            Self::logit(&features.values, AI_ASSISTED),
            Self::logit(&features.values, PASTED),
        ];
        let [organic_human, ai_assisted, pasted] = softmax(logits);
        debug!(organic_human, ai_assisted, pasted, "authorship scored");
        AuthorshipScore::new(organic_human, ai_assisted, pasted)
    }
}

fn softmax(logits: [f64; 3]) -> [f64; 3] {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps = logits.map(|l| (l - max).exp());
    let sum: f64 = exps.iter().sum();
    exps.map(|e| e / sum)
}
