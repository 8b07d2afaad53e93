//! Flag and environment handling for verifier settings.

use clap::{Args, ValueEnum};
use humansign_core::VerifyingKey;
use humansign_verify::IntakePolicy;
use std::fs;
use std::path::PathBuf;

/// Public key encodings accepted by `--public-key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyType {
    /// Ed25519 public key PEM (EdDSA).
    Ed25519,
    /// EC public key PEM (ES256/ES384).
    Ec,
    /// RSA public key PEM (RS*/PS*).
    Rsa,
}

/// Verifying key selection.
#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Shared HMAC secret
    #[arg(long, env = "HUMANSIGN_HMAC_SECRET")]
    pub hmac_secret: Option<String>,
    /// Path to a PEM public key (takes precedence over --hmac-secret)
    #[arg(long, env = "HUMANSIGN_PUBLIC_KEY")]
    pub public_key: Option<PathBuf>,
    /// Encoding of --public-key
    #[arg(long, env = "HUMANSIGN_KEY_TYPE", value_enum, default_value_t = KeyType::Ed25519)]
    pub key_type: KeyType,
}

impl KeyArgs {
    /// Loads the configured key.
    pub fn load(&self) -> Result<VerifyingKey, Box<dyn std::error::Error>> {
        if let Some(path) = &self.public_key {
            let pem = fs::read(path)
                .map_err(|e| format!("Failed to read public key {}: {}", path.display(), e))?;
            return Ok(match self.key_type {
                KeyType::Ed25519 => VerifyingKey::EdPem(pem),
                KeyType::Ec => VerifyingKey::EcPem(pem),
                KeyType::Rsa => VerifyingKey::RsaPem(pem),
            });
        }
        match &self.hmac_secret {
            Some(secret) => Ok(VerifyingKey::HmacSecret(secret.as_bytes().to_vec())),
            None => Err("no verifying key: pass --public-key or --hmac-secret".into()),
        }
    }
}

/// Upload limits, named after the service's environment settings.
#[derive(Args, Debug, Clone)]
pub struct IntakeArgs {
    /// Largest accepted file in bytes
    #[arg(long, env = "MAX_FILE_SIZE", default_value_t = 10 * 1024 * 1024)]
    pub max_file_size: u64,
    /// Accepted document MIME types, comma-separated
    #[arg(long, env = "ALLOWED_DOC_TYPES", value_delimiter = ',')]
    pub allowed_doc_types: Vec<String>,
    /// Required proof file suffix
    #[arg(long, env = "HUMANSIGN_EXTENSION", default_value = ".humansign")]
    pub humansign_extension: String,
    /// Largest accepted signed token in bytes (defaults to --max-file-size)
    #[arg(long, env = "MAX_TOKEN_BYTES")]
    pub max_token_bytes: Option<usize>,
}

impl IntakeArgs {
    /// Builds the intake policy; no types given keeps the defaults.
    pub fn policy(&self) -> IntakePolicy {
        let defaults = IntakePolicy::default();
        let allowed_doc_types = match self.allowed_doc_types.as_slice() {
            [] => defaults.allowed_doc_types,
            types => types
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        };
        IntakePolicy {
            max_file_size: self.max_file_size,
            allowed_doc_types,
            humansign_extension: self.humansign_extension.clone(),
        }
    }

    /// Token limit for the envelope stage; follows the file size limit
    /// unless set explicitly.
    pub fn token_limit(&self) -> usize {
        self.max_token_bytes
            .unwrap_or_else(|| usize::try_from(self.max_file_size).unwrap_or(usize::MAX))
    }
}
