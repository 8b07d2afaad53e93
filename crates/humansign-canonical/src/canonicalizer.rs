use canonical_json::to_string;
use serde_json::Value;

use std::fmt;

/// Default nesting limit for values accepted by the canonicalizer.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Provided JSON could not be canonicalized.
    #[error("invalid JSON structure: {0}")]
    InvalidStructure(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// Value nests deeper than the configured limit.
    #[error("nesting exceeds {max} levels at {path}")]
    TooDeep {
        /// Path where the limit was exceeded.
        path: String,
        /// Configured limit.
        max: usize,
    },
    /// Generic failure.
    #[error("other error: {0}")]
    Other(String),
}

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn depth(&self) -> usize {
        self.segments.len()
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits deterministic RFC 8785 bytes.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    max_depth: usize,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Canonicalizer {
    /// Creates a canonicalizer with the default nesting limit.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Creates a canonicalizer that rejects values nested deeper than `max_depth`.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Produces canonical bytes for `value`.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        self.validate(value, Path::root())?;

        let canonical =
            to_string(value).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
        Ok(canonical.into_bytes())
    }

    fn validate(&self, value: &Value, path: Path) -> Result<(), CanonicalizationError> {
        if path.depth() > self.max_depth {
            return Err(CanonicalizationError::TooDeep {
                path: path.to_string(),
                max: self.max_depth,
            });
        }
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.validate(child, path.push_field(key))?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    self.validate(item, path.push_index(idx))?;
                }
                Ok(())
            }
            Value::Number(num) => match num.as_f64() {
                Some(f) if !f.is_finite() => {
                    Err(CanonicalizationError::NonFiniteNumber(path.to_string()))
                }
                _ => Ok(()),
            },
            Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_keys_and_strips_whitespace() {
        let canonicalizer = Canonicalizer::new();
        let bytes = canonicalizer
            .canonicalize(&json!({"b": 1, "a": {"nested": [2, "x"]}}))
            .unwrap();
        assert_eq!(bytes, br#"{"a":{"nested":[2,"x"]},"b":1}"#.to_vec());
    }

    #[test]
    fn rejects_values_nested_past_limit() {
        let canonicalizer = Canonicalizer::with_max_depth(2);
        let err = canonicalizer
            .canonicalize(&json!({"a": {"b": {"c": 1}}}))
            .unwrap_err();
        assert!(matches!(err, CanonicalizationError::TooDeep { max: 2, .. }));
    }

    #[test]
    fn path_display_names_nested_positions() {
        let path = Path::root().push_field("events").push_index(3);
        assert_eq!(path.to_string(), "events.[3]");
        assert_eq!(Path::root().to_string(), "root");
    }
}
