//! Binding between the sealed document hash and the submitted bytes.

use humansign_canonical::HexDigest;
use std::io::Read;
use tracing::{debug, warn};

use crate::errors::IntegrityError;

/// Confirms a document's content hash matches the hash sealed in its envelope.
///
/// Digest: SHA-256 over the exact byte stream. The declared hash is compared
/// as decoded bytes, so hex case does not matter; anything that is not a
/// 64-character hex string can never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrityBinder;

impl IntegrityBinder {
    /// Creates a binder.
    pub fn new() -> Self {
        Self
    }

    /// Checks in-memory document bytes against `declared_hash`.
    pub fn bind(&self, document: &[u8], declared_hash: &str) -> Result<(), IntegrityError> {
        self.compare(HexDigest::of(document), declared_hash)
    }

    /// Streams `document` through the digest and checks it against `declared_hash`.
    pub fn bind_reader<R: Read>(&self, document: R, declared_hash: &str) -> Result<(), IntegrityError> {
        let computed = HexDigest::of_reader(document)?;
        self.compare(computed, declared_hash)
    }

    fn compare(&self, computed: HexDigest, declared_hash: &str) -> Result<(), IntegrityError> {
        match HexDigest::parse("document_hash", declared_hash) {
            Ok(declared) if declared == computed => {
                debug!("document hash matches sealed hash");
                Ok(())
            }
            _ => {
                warn!("document hash does not match sealed hash");
                Err(IntegrityError::HashMismatch)
            }
        }
    }
}
