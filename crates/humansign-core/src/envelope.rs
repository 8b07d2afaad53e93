//! Signed envelope parsing and verification.

use humansign_canonical::HexDigest;
use jsonwebtoken::{decode_header, Algorithm};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::block::Chain;
use crate::errors::{CoreError, EnvelopeError};
use crate::oracle::{parse_algorithms, OracleError, SignatureOracle};
use crate::session::SessionMetadata;

/// Keys under which a JSON-wrapped `.humansign` file may carry its token.
const TOKEN_KEYS: [&str; 3] = ["jws", "token", "signature"];

/// Default token limit; matches the default `.humansign` intake size.
pub const DEFAULT_MAX_TOKEN_BYTES: usize = 10 * 1024 * 1024;

/// Envelope verification limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Largest token accepted, in bytes.
    pub max_token_bytes: usize,
    /// JWS `alg` values accepted in the token header.
    pub allowed_algorithms: Vec<String>,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            max_token_bytes: DEFAULT_MAX_TOKEN_BYTES,
            allowed_algorithms: vec![
                "ES256".to_string(),
                "EdDSA".to_string(),
                "RS256".to_string(),
                "HS256".to_string(),
            ],
        }
    }
}

/// Trusted envelope payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Subject (author) identifier.
    pub subject: String,
    /// Session number for the subject.
    #[serde(rename = "sessionIndex")]
    pub session_index: i64,
    /// Optional repetition index within the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rep: Option<i64>,
    /// Sealed document hash (64 hex characters).
    pub document_hash: String,
    /// Event chain; untrusted until verified.
    pub chain: Chain,
}

impl Envelope {
    /// Session identity carried by the envelope.
    pub fn metadata(&self) -> SessionMetadata {
        SessionMetadata {
            subject: self.subject.clone(),
            session_index: self.session_index,
            rep: self.rep,
        }
    }

    /// Builds an envelope from an already-verified JSON payload.
    ///
    /// Fields are checked in the order `document_hash`, `subject`,
    /// `sessionIndex`, `rep`, `chain`; the first failure is reported.
    pub fn from_payload(payload: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(mut map) = payload else {
            return Err(EnvelopeError::MalformedPayload { field: "payload" });
        };

        let document_hash = take_string(&mut map, "document_hash")?;
        HexDigest::parse("document_hash", &document_hash)
            .map_err(|_| EnvelopeError::MalformedPayload {
                field: "document_hash",
            })?;
        let subject = take_string(&mut map, "subject")?;
        let session_index = map
            .get("sessionIndex")
            .and_then(Value::as_i64)
            .ok_or(EnvelopeError::MalformedPayload {
                field: "sessionIndex",
            })?;
        let rep = match map.get("rep") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                value
                    .as_i64()
                    .ok_or(EnvelopeError::MalformedPayload { field: "rep" })?,
            ),
        };
        let chain = match map.remove("chain") {
            Some(value @ Value::Array(_)) => serde_json::from_value::<Chain>(value)
                .map_err(|_| EnvelopeError::MalformedPayload { field: "chain" })?,
            _ => return Err(EnvelopeError::MalformedPayload { field: "chain" }),
        };

        Ok(Self {
            subject,
            session_index,
            rep,
            document_hash,
            chain,
        })
    }
}

fn take_string(map: &mut Map<String, Value>, field: &'static str) -> Result<String, EnvelopeError> {
    match map.remove(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        _ => Err(EnvelopeError::MalformedPayload { field }),
    }
}

/// Extracts the compact token from raw `.humansign` file bytes.
///
/// Accepts the bare token or a JSON object carrying it under `jws`,
/// `token` or `signature`.
pub fn extract_token(raw: &[u8]) -> Result<String, EnvelopeError> {
    let text = std::str::from_utf8(raw).map_err(|_| EnvelopeError::MalformedEnvelope {
        reason: "humansign file is not UTF-8",
    })?;
    let text = text.trim_start_matches('\u{feff}').trim();
    if !text.starts_with('{') {
        return Ok(text.to_string());
    }

    let wrapper: Value = serde_json::from_str(text).map_err(|_| EnvelopeError::MalformedEnvelope {
        reason: "humansign file is not valid JSON",
    })?;
    TOKEN_KEYS
        .iter()
        .find_map(|key| wrapper.get(*key).and_then(Value::as_str))
        .map(|token| token.trim().to_string())
        .ok_or(EnvelopeError::MalformedEnvelope {
            reason: "humansign file carries no token",
        })
}

fn is_base64url(segment: &str) -> bool {
    segment
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Verifies compact signed envelopes.
///
/// Structural checks run before the oracle is invoked, so obviously
/// malformed input never reaches the signature primitive.
#[derive(Debug, Clone)]
pub struct EnvelopeVerifier<O> {
    max_token_bytes: usize,
    allowed: Vec<Algorithm>,
    oracle: O,
}

impl<O: SignatureOracle> EnvelopeVerifier<O> {
    /// Creates a verifier; fails if the configured algorithm names are unknown.
    pub fn new(config: &EnvelopeConfig, oracle: O) -> Result<Self, CoreError> {
        Ok(Self {
            max_token_bytes: config.max_token_bytes,
            allowed: parse_algorithms(&config.allowed_algorithms)?,
            oracle,
        })
    }

    /// Verifies `token` and returns the trusted envelope.
    pub fn verify(&self, token: &str) -> Result<Envelope, EnvelopeError> {
        self.check_structure(token).inspect_err(|err| {
            warn!(error = %err, "envelope rejected before signature check");
        })?;

        let payload = self.oracle.verify(token).map_err(|err| {
            warn!(error = %err, "envelope signature check failed");
            match err {
                OracleError::Rejected(_) => EnvelopeError::SignatureInvalid,
                OracleError::UndecodablePayload => {
                    EnvelopeError::MalformedPayload { field: "payload" }
                }
            }
        })?;
        debug!("envelope signature verified");

        Envelope::from_payload(payload).inspect_err(|err| {
            warn!(error = %err, "signed payload rejected");
        })
    }

    /// Structural sanity checks on an unverified token.
    pub fn check_structure(&self, token: &str) -> Result<(), EnvelopeError> {
        let malformed = |reason: &'static str| EnvelopeError::MalformedEnvelope { reason };

        if token.is_empty() {
            return Err(malformed("token is empty"));
        }
        if token.len() > self.max_token_bytes {
            return Err(malformed("token exceeds size limit"));
        }
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(malformed("token must have three segments"));
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(malformed("token segment is empty"));
        }
        if !segments.iter().all(|s| is_base64url(s)) {
            return Err(malformed("token segment is not base64url"));
        }

        let header = decode_header(token).map_err(|_| malformed("token header is invalid"))?;
        if !self.allowed.contains(&header.alg) {
            return Err(malformed("token algorithm is not allowed"));
        }
        Ok(())
    }
}
