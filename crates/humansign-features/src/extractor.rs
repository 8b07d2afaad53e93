//! Behavioral feature extraction over a flattened session.

use humansign_core::{SessionEvent, SessionMetadata};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::FeatureError;
use crate::kinds::EventClass;

/// Version of [`FEATURE_NAMES`]. Bumped whenever names or order change.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Feature names in vector order.
pub const FEATURE_NAMES: [&str; 16] = [
    "event_count",
    "duration_ms",
    "keystroke_count",
    "iki_mean_ms",
    "iki_std_ms",
    "iki_median_ms",
    "iki_cv",
    "burst_ratio",
    "pause_ratio",
    "long_pause_count",
    "paste_count",
    "paste_ratio",
    "deletion_ratio",
    "typing_rate_per_min",
    "session_index",
    "rep",
];

/// Number of features in schema v1.
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Extraction thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Fewest events a session may have.
    pub min_events: usize,
    /// Inter-key intervals below this count as bursts.
    pub burst_threshold_ms: i64,
    /// Gaps at or above this count as long pauses.
    pub pause_threshold_ms: i64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            min_events: 10,
            burst_threshold_ms: 200,
            pause_threshold_ms: 2000,
        }
    }
}

/// Ordered, versioned feature values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    /// Schema version the values follow.
    pub version: u32,
    /// Values in [`FEATURE_NAMES`] order.
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Feature names matching `values`.
    pub fn names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }

    /// Looks up a value by feature name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .and_then(|i| self.values.get(i).copied())
    }

    /// `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}

/// Computes [`FeatureVector`]s from flattened sessions.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: FeatureConfig,
}

impl FeatureExtractor {
    /// Creates an extractor with the given thresholds.
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Active thresholds.
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Extracts schema v1 features. Same input always yields the same vector.
    pub fn extract(
        &self,
        metadata: &SessionMetadata,
        events: &[SessionEvent],
    ) -> Result<FeatureVector, FeatureError> {
        let required = self.config.min_events.max(1);
        if events.len() < required {
            return Err(FeatureError::InsufficientEvents {
                found: events.len(),
                required,
            });
        }

        let mut keystrokes = 0usize;
        let mut deletions = 0usize;
        let mut pastes = 0usize;
        let mut pause_markers = 0usize;
        let mut keystroke_times = Vec::new();
        for event in events {
            match EventClass::classify(&event.kind) {
                EventClass::Keystroke => {
                    keystrokes += 1;
                    keystroke_times.push(event.timestamp);
                }
                EventClass::Deletion => deletions += 1,
                EventClass::Paste => pastes += 1,
                EventClass::Pause => pause_markers += 1,
                EventClass::Other => {}
            }
        }

        let first = events[0].timestamp;
        let last = events[events.len() - 1].timestamp;
        let duration_ms = last.saturating_sub(first).max(0) as f64;

        let intervals: Vec<f64> = keystroke_times
            .windows(2)
            .map(|w| w[1].saturating_sub(w[0]) as f64)
            .collect();
        let iki = IntervalStats::of(&intervals);
        let burst_ratio = ratio(
            intervals
                .iter()
                .filter(|&&gap| gap < self.config.burst_threshold_ms as f64)
                .count(),
            intervals.len(),
        );

        let (long_gaps, long_gap_ms) = events
            .windows(2)
            .map(|w| w[1].timestamp.saturating_sub(w[0].timestamp))
            .filter(|&gap| gap >= self.config.pause_threshold_ms)
            .fold((0usize, 0f64), |(count, total), gap| (count + 1, total + gap as f64));
        let pause_ratio = if duration_ms > 0.0 {
            long_gap_ms / duration_ms
        } else {
            0.0
        };

        let typing_rate_per_min = if duration_ms > 0.0 {
            keystrokes as f64 / (duration_ms / 60_000.0)
        } else {
            0.0
        };

        let values = vec![
            events.len() as f64,
            duration_ms,
            keystrokes as f64,
            iki.mean,
            iki.std,
            iki.median,
            iki.cv,
            burst_ratio,
            pause_ratio,
            (long_gaps + pause_markers) as f64,
            pastes as f64,
            ratio(pastes, events.len()),
            ratio(deletions, keystrokes + deletions),
            typing_rate_per_min,
            metadata.session_index as f64,
            metadata.rep.unwrap_or(0) as f64,
        ];
        debug!(events = events.len(), keystrokes, pastes, "features extracted");

        Ok(FeatureVector {
            version: FEATURE_SCHEMA_VERSION,
            values,
        })
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Population statistics over inter-key intervals; all zero when empty.
#[derive(Debug, Default)]
struct IntervalStats {
    mean: f64,
    std: f64,
    median: f64,
    cv: f64,
}

impl IntervalStats {
    fn of(intervals: &[f64]) -> Self {
        if intervals.is_empty() {
            return Self::default();
        }
        let n = intervals.len() as f64;
        let mean = intervals.iter().sum::<f64>() / n;
        let variance = intervals.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        let mut sorted = intervals.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let cv = if mean > 0.0 { std / mean } else { 0.0 };
        Self {
            mean,
            std,
            median,
            cv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(rep: Option<i64>) -> SessionMetadata {
        SessionMetadata {
            subject: "s001".to_string(),
            session_index: 2,
            rep,
        }
    }

    fn ev(timestamp: i64, kind: &str) -> SessionEvent {
        SessionEvent {
            timestamp,
            kind: kind.to_string(),
        }
    }

    fn low_threshold() -> FeatureExtractor {
        FeatureExtractor::new(FeatureConfig {
            min_events: 1,
            ..FeatureConfig::default()
        })
    }

    #[test]
    fn rejects_sessions_below_minimum() {
        let events: Vec<_> = (0..9).map(|i| ev(i * 100, "keydown")).collect();
        assert_eq!(
            FeatureExtractor::default().extract(&meta(None), &events),
            Err(FeatureError::InsufficientEvents {
                found: 9,
                required: 10
            })
        );
    }

    #[test]
    fn zero_minimum_still_requires_one_event() {
        let extractor = FeatureExtractor::new(FeatureConfig {
            min_events: 0,
            ..FeatureConfig::default()
        });
        assert_eq!(
            extractor.extract(&meta(None), &[]),
            Err(FeatureError::InsufficientEvents {
                found: 0,
                required: 1
            })
        );
    }

    #[test]
    fn computes_interval_statistics() {
        // Intervals 100, 300, 200.
        let events = vec![
            ev(0, "keydown"),
            ev(100, "keydown"),
            ev(400, "keydown"),
            ev(600, "keydown"),
        ];
        let v = low_threshold().extract(&meta(Some(3)), &events).unwrap();
        assert_eq!(v.get("event_count"), Some(4.0));
        assert_eq!(v.get("duration_ms"), Some(600.0));
        assert_eq!(v.get("iki_mean_ms"), Some(200.0));
        assert_eq!(v.get("iki_median_ms"), Some(200.0));
        let std = v.get("iki_std_ms").unwrap();
        assert!((std - (20_000.0f64 / 3.0).sqrt()).abs() < 1e-9);
        assert!((v.get("iki_cv").unwrap() - std / 200.0).abs() < 1e-12);
        // Only the 100ms interval is a burst.
        assert!((v.get("burst_ratio").unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!((v.get("typing_rate_per_min").unwrap() - 400.0).abs() < 1e-9);
        assert_eq!(v.get("session_index"), Some(2.0));
        assert_eq!(v.get("rep"), Some(3.0));
    }

    #[test]
    fn counts_pastes_deletions_and_pauses() {
        let events = vec![
            ev(0, "keydown"),
            ev(100, "Backspace"),
            ev(3_100, "paste"),
            ev(3_200, "idle"),
            ev(3_300, "keydown"),
        ];
        let v = low_threshold().extract(&meta(None), &events).unwrap();
        assert_eq!(v.get("paste_count"), Some(1.0));
        assert_eq!(v.get("paste_ratio"), Some(0.2));
        assert!((v.get("deletion_ratio").unwrap() - 1.0 / 3.0).abs() < 1e-12);
        // One 3000ms gap plus one explicit idle marker.
        assert_eq!(v.get("long_pause_count"), Some(2.0));
        assert!((v.get("pause_ratio").unwrap() - 3_000.0 / 3_300.0).abs() < 1e-12);
        assert_eq!(v.get("rep"), Some(0.0));
    }

    #[test]
    fn single_event_session_has_zero_rates() {
        let v = low_threshold()
            .extract(&meta(None), &[ev(5, "keydown")])
            .unwrap();
        assert_eq!(v.get("duration_ms"), Some(0.0));
        assert_eq!(v.get("iki_mean_ms"), Some(0.0));
        assert_eq!(v.get("typing_rate_per_min"), Some(0.0));
        assert!(v.values.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn vector_follows_schema() {
        let v = low_threshold()
            .extract(&meta(None), &[ev(5, "keydown")])
            .unwrap();
        assert_eq!(v.version, FEATURE_SCHEMA_VERSION);
        assert_eq!(v.values.len(), FEATURE_COUNT);
        let names: Vec<_> = v.iter().map(|(name, _)| name).collect();
        assert_eq!(names, FEATURE_NAMES);
        assert_eq!(v.get("no_such_feature"), None);
    }
}
