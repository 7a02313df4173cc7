//! Core types for the allowlist gate

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{GateError, Result};

/// 32-byte hash
pub type Hash32 = [u8; 32];

/// Canonical, fixed-width encoding of one allowlist identity.
///
/// Built by [`crate::canonicalize`]; `from_bytes` is for values that are
/// already 32 bytes wide (for example leaves read back from a bundle).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Leaf(Hash32);

impl Leaf {
    pub fn from_bytes(bytes: Hash32) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &Hash32 {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        encode_hash(&self.0)
    }
}

impl From<Leaf> for Hash32 {
    fn from(leaf: Leaf) -> Self {
        leaf.0
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Leaf {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Leaf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_hash(&s).map(Leaf).map_err(de::Error::custom)
    }
}

/// Inclusion proof: sibling hashes ordered from the leaf up to the root.
///
/// No left/right flags are carried; verification re-sorts every pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MerkleProof {
    pub siblings: Vec<Hash32>,
}

impl MerkleProof {
    pub fn new(siblings: Vec<Hash32>) -> Self {
        Self { siblings }
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    pub fn to_hex(&self) -> Vec<String> {
        self.siblings.iter().map(encode_hash).collect()
    }

    /// Decode siblings from hex. Any malformed sibling makes the whole proof
    /// invalid.
    pub fn from_hex<S: AsRef<str>>(siblings: &[S]) -> Result<Self> {
        let siblings = siblings
            .iter()
            .map(|s| decode_hash(s.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| GateError::InvalidMerkleProof)?;
        Ok(Self { siblings })
    }
}

// JSON form is a plain array of 0x-prefixed hex strings
impl Serialize for MerkleProof {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.siblings.iter().map(encode_hash))
    }
}

impl<'de> Deserialize<'de> for MerkleProof {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        let siblings = raw
            .iter()
            .map(|s| decode_hash(s))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(de::Error::custom)?;
        Ok(Self { siblings })
    }
}

/// Render a hash as `0x` followed by 64 lowercase hex characters.
pub fn encode_hash(hash: &Hash32) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Parse a 32-byte hash from hex, with or without the `0x` prefix.
pub fn decode_hash(s: &str) -> std::result::Result<Hash32, String> {
    let s = s.trim();
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.len() != 64 {
        return Err(format!("expected 64 hex chars, got {}", digits.len()));
    }
    let mut out = [0u8; 32];
    hex::decode_to_slice(digits, &mut out).map_err(|e| e.to_string())?;
    Ok(out)
}

/// Parse a published root. Unlike [`decode_hash`] the `0x` prefix is required.
pub fn parse_root(s: &str) -> Result<Hash32> {
    let s = s.trim();
    if !s.starts_with("0x") {
        return Err(GateError::InvalidRoot("missing 0x prefix".into()));
    }
    decode_hash(s).map_err(GateError::InvalidRoot)
}
