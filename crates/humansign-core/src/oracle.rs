//! Signature oracle: the only place the asymmetric (or HMAC) primitive is invoked.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Outcome of a rejected verification.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// Signature did not verify, or the token was rejected before verification.
    #[error("signature rejected: {0}")]
    Rejected(&'static str),
    /// Signature verified but the payload is not JSON.
    #[error("signed payload is not JSON")]
    UndecodablePayload,
}

/// `verify(token) -> payload` oracle.
///
/// Implementations must only return a payload whose signature verified.
pub trait SignatureOracle: Send + Sync {
    /// Verifies `token` and returns its trusted JSON payload.
    fn verify(&self, token: &str) -> Result<Value, OracleError>;
}

/// Key material used to verify envelopes.
#[derive(Clone)]
pub enum VerifyingKey {
    /// Shared HMAC secret (HS256/384/512).
    HmacSecret(Vec<u8>),
    /// Raw 32-byte Ed25519 public key.
    Ed25519PublicKey([u8; 32]),
    /// PEM-encoded Ed25519 public key.
    EdPem(Vec<u8>),
    /// PEM-encoded EC public key (ES256/ES384).
    EcPem(Vec<u8>),
    /// PEM-encoded RSA public key (RS*/PS*).
    RsaPem(Vec<u8>),
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            VerifyingKey::HmacSecret(_) => "HmacSecret",
            VerifyingKey::Ed25519PublicKey(_) => "Ed25519PublicKey",
            VerifyingKey::EdPem(_) => "EdPem",
            VerifyingKey::EcPem(_) => "EcPem",
            VerifyingKey::RsaPem(_) => "RsaPem",
        };
        write!(f, "VerifyingKey::{}(..)", kind)
    }
}

impl VerifyingKey {
    /// Algorithms this key type can verify.
    pub fn algorithms(&self) -> &'static [Algorithm] {
        match self {
            VerifyingKey::HmacSecret(_) => &[Algorithm::HS256, Algorithm::HS384, Algorithm::HS512],
            VerifyingKey::Ed25519PublicKey(_) | VerifyingKey::EdPem(_) => &[Algorithm::EdDSA],
            VerifyingKey::EcPem(_) => &[Algorithm::ES256, Algorithm::ES384],
            VerifyingKey::RsaPem(_) => &[
                Algorithm::RS256,
                Algorithm::RS384,
                Algorithm::RS512,
                Algorithm::PS256,
                Algorithm::PS384,
                Algorithm::PS512,
            ],
        }
    }

    fn decoding_key(&self) -> Result<DecodingKey, CoreError> {
        let key = match self {
            VerifyingKey::HmacSecret(secret) => {
                if secret.is_empty() {
                    return Err(CoreError::InvalidKey("HMAC secret is empty".to_string()));
                }
                DecodingKey::from_secret(secret)
            }
            VerifyingKey::Ed25519PublicKey(bytes) => DecodingKey::from_ed_der(bytes),
            VerifyingKey::EdPem(pem) => DecodingKey::from_ed_pem(pem)
                .map_err(|e| CoreError::InvalidKey(format!("Ed25519 PEM: {}", e)))?,
            VerifyingKey::EcPem(pem) => DecodingKey::from_ec_pem(pem)
                .map_err(|e| CoreError::InvalidKey(format!("EC PEM: {}", e)))?,
            VerifyingKey::RsaPem(pem) => DecodingKey::from_rsa_pem(pem)
                .map_err(|e| CoreError::InvalidKey(format!("RSA PEM: {}", e)))?,
        };
        Ok(key)
    }
}

/// Parses algorithm names such as `"ES256"` or `"EdDSA"`.
pub fn parse_algorithms(names: &[String]) -> Result<Vec<Algorithm>, CoreError> {
    names
        .iter()
        .map(|name| {
            Algorithm::from_str(name)
                .map_err(|_| CoreError::InvalidKey(format!("unknown algorithm {}", name)))
        })
        .collect()
}

/// JWS compact-token oracle backed by `jsonwebtoken`.
///
/// Envelopes carry no registered claims, so `exp`/`nbf`/`aud` checks are off.
#[derive(Clone)]
pub struct JwsOracle {
    key: DecodingKey,
    validation: Validation,
}

impl JwsOracle {
    /// Builds an oracle accepting the intersection of `allowed` and the key's algorithms.
    pub fn new(key: &VerifyingKey, allowed: &[String]) -> Result<Self, CoreError> {
        let allowed = parse_algorithms(allowed)?;
        let algorithms: Vec<Algorithm> = key
            .algorithms()
            .iter()
            .copied()
            .filter(|alg| allowed.contains(alg))
            .collect();
        let Some(first) = algorithms.first().copied() else {
            return Err(CoreError::InvalidKey(
                "no allowed algorithm matches the key type".to_string(),
            ));
        };

        let mut validation = Validation::new(first);
        validation.algorithms = algorithms;
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        Ok(Self {
            key: key.decoding_key()?,
            validation,
        })
    }

    /// Algorithms this oracle accepts.
    pub fn algorithms(&self) -> &[Algorithm] {
        &self.validation.algorithms
    }
}

impl SignatureOracle for JwsOracle {
    fn verify(&self, token: &str) -> Result<Value, OracleError> {
        decode::<Value>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => OracleError::Rejected("signature mismatch"),
                ErrorKind::InvalidAlgorithm => OracleError::Rejected("algorithm not accepted"),
                ErrorKind::Json(_) => OracleError::UndecodablePayload,
                _ => OracleError::Rejected("token could not be verified"),
            })
    }
}
