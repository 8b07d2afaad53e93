use thiserror::Error;

/// Validation errors for canonical primitives.
///
/// Messages carry field names and lengths only, never the offending value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Value has the wrong length for its encoding.
    #[error("{field} has length {found}, expected {expected}")]
    InvalidLength {
        /// Field name that failed validation.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Observed length.
        found: usize,
    },
    /// Value contains characters outside its alphabet.
    #[error("{field} is not valid hex")]
    InvalidEncoding {
        /// Field name that failed validation.
        field: &'static str,
    },
}
