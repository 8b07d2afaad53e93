use humansign_core::EnvelopeConfig;
use humansign_features::FeatureConfig;
use serde::{Deserialize, Serialize};

use crate::intake::IntakePolicy;

/// Settings for a [`Verifier`](crate::Verifier) and its intake checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Envelope size and algorithm limits.
    pub envelope: EnvelopeConfig,
    /// Feature extraction thresholds.
    pub features: FeatureConfig,
    /// Upload checks applied before the pipeline runs.
    pub intake: IntakePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: VerifierConfig =
            serde_json::from_str(r#"{"features": {"min_events": 3}}"#).unwrap();
        assert_eq!(config.features.min_events, 3);
        assert_eq!(config.features.pause_threshold_ms, 2000);
        assert_eq!(config.envelope, EnvelopeConfig::default());
        assert_eq!(config.intake, IntakePolicy::default());
    }

    #[test]
    fn default_token_limit_admits_largest_accepted_upload() {
        let config = VerifierConfig::default();
        assert_eq!(
            config.envelope.max_token_bytes as u64,
            config.intake.max_file_size
        );
    }
}
