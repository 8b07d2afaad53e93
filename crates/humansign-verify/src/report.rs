use humansign_features::AuthorshipScore;
use serde::Serialize;

/// Overall outcome of a successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerificationStatus {
    /// Every stage passed.
    #[serde(rename = "VERIFIED")]
    Verified,
}

/// Integrity half of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    /// The envelope signature verified.
    pub signature_valid: bool,
    /// The document matched the sealed hash.
    pub hash_match: bool,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    /// Always [`VerificationStatus::Verified`]; failures are errors.
    pub status: VerificationStatus,
    /// Integrity flags.
    pub integrity: IntegrityReport,
    /// Authorship distribution.
    pub authorship: AuthorshipScore,
}

impl VerificationReport {
    pub(crate) fn verified(authorship: AuthorshipScore) -> Self {
        Self {
            status: VerificationStatus::Verified,
            integrity: IntegrityReport {
                signature_valid: true,
                hash_match: true,
            },
            authorship,
        }
    }
}
