//! Envelope sealing, the inverse of [`EnvelopeVerifier`](crate::envelope::EnvelopeVerifier).
//!
//! Production envelopes are sealed by the signing client; this exists for
//! fixtures and local tooling.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::fmt;

use crate::envelope::Envelope;
use crate::errors::CoreError;

/// Key material used to seal envelopes.
#[derive(Clone)]
pub enum SealingKey {
    /// Shared HMAC secret, signed with HS256.
    HmacSecret(Vec<u8>),
    /// PKCS#8 DER-encoded Ed25519 private key, signed with EdDSA.
    Ed25519Pkcs8(Vec<u8>),
}

impl fmt::Debug for SealingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SealingKey::HmacSecret(_) => f.write_str("SealingKey::HmacSecret(..)"),
            SealingKey::Ed25519Pkcs8(_) => f.write_str("SealingKey::Ed25519Pkcs8(..)"),
        }
    }
}

/// Signs `envelope` into a compact JWS token.
pub fn seal_envelope(envelope: &Envelope, key: &SealingKey) -> Result<String, CoreError> {
    let (alg, encoding_key) = match key {
        SealingKey::HmacSecret(secret) => {
            if secret.is_empty() {
                return Err(CoreError::InvalidKey("HMAC secret is empty".to_string()));
            }
            (Algorithm::HS256, EncodingKey::from_secret(secret))
        }
        SealingKey::Ed25519Pkcs8(der) => (Algorithm::EdDSA, EncodingKey::from_ed_der(der)),
    };
    encode(&Header::new(alg), envelope, &encoding_key)
        .map_err(|e| CoreError::Signing(e.to_string()))
}
