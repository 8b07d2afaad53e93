use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::io::{self, Read};

use crate::validation::ValidationError;

/// Size of a SHA-256 digest in bytes.
pub const SHA256_LEN: usize = 32;

/// Genesis sentinel used as `prev_hash` of the first block: 64 `'0'` characters.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Read buffer used when hashing streams.
const STREAM_CHUNK: usize = 64 * 1024;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlg {
    /// SHA-256 (the only algorithm HumanSign seals with).
    #[default]
    #[serde(rename = "sha-256")]
    Sha256,
}

impl DigestAlg {
    /// Length of the hex encoding produced by this algorithm.
    pub fn hex_len(self) -> usize {
        match self {
            DigestAlg::Sha256 => SHA256_LEN * 2,
        }
    }
}

/// Raw SHA-256 digest, displayed and serialized as lowercase hex.
///
/// Parsing accepts either case; equality is on the raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexDigest([u8; SHA256_LEN]);

impl HexDigest {
    /// The all-zero digest, equal to [`GENESIS_HASH`] once encoded.
    pub const GENESIS: HexDigest = HexDigest([0u8; SHA256_LEN]);

    /// Wraps raw digest bytes.
    pub fn from_bytes(bytes: [u8; SHA256_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses a 64-character hex string (case-insensitive).
    pub fn parse(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        if value.len() != SHA256_LEN * 2 {
            return Err(ValidationError::InvalidLength {
                field,
                expected: SHA256_LEN * 2,
                found: value.len(),
            });
        }
        let mut bytes = [0u8; SHA256_LEN];
        hex::decode_to_slice(value, &mut bytes)
            .map_err(|_| ValidationError::InvalidEncoding { field })?;
        Ok(Self(bytes))
    }

    /// Digest of an in-memory byte slice.
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Digest of everything readable from `reader`, consumed in fixed-size chunks.
    pub fn of_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; STREAM_CHUNK];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buf[..n]);
        }
        Ok(Self(hasher.finalize().into()))
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; SHA256_LEN] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexDigest({})", self.to_hex())
    }
}

impl Serialize for HexDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HexDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        HexDigest::parse("digest", &s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // sha256("abc")
    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn digest_of_known_vector() {
        assert_eq!(HexDigest::of(b"abc").to_hex(), ABC);
    }

    #[test]
    fn reader_and_slice_digests_agree() {
        let data = vec![7u8; STREAM_CHUNK * 2 + 13];
        let streamed = HexDigest::of_reader(data.as_slice()).unwrap();
        assert_eq!(streamed, HexDigest::of(&data));
    }

    #[test]
    fn parse_is_case_insensitive() {
        let upper = ABC.to_uppercase();
        assert_eq!(
            HexDigest::parse("h", &upper).unwrap(),
            HexDigest::parse("h", ABC).unwrap()
        );
    }

    #[test]
    fn parse_rejects_wrong_length_and_alphabet() {
        assert!(matches!(
            HexDigest::parse("h", "abcd"),
            Err(ValidationError::InvalidLength { found: 4, .. })
        ));
        let bad = "z".repeat(64);
        assert!(matches!(
            HexDigest::parse("h", &bad),
            Err(ValidationError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn genesis_matches_sentinel() {
        assert_eq!(HexDigest::GENESIS.to_hex(), GENESIS_HASH);
        assert_eq!(DigestAlg::Sha256.hex_len(), GENESIS_HASH.len());
    }
}
