//! Pair hashing strategies and the sorted-pair combination rule

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha3::Digest;

use crate::{GateError, Hash32};

/// Hash strategy for tree nodes.
///
/// `hash_concat` hashes `left || right`. `combine` derives a parent from two
/// unordered siblings and defaults to the sorted-pair rule. Builder and
/// verifier both go through `combine`, so an override changes them together.
pub trait PairHasher: Send + Sync {
    fn hash_concat(&self, left: &Hash32, right: &Hash32) -> Hash32;

    /// Parent of two siblings: `H(min(a, b) || max(a, b))` under byte-wise order.
    fn combine(&self, a: &Hash32, b: &Hash32) -> Hash32 {
        if a <= b {
            self.hash_concat(a, b)
        } else {
            self.hash_concat(b, a)
        }
    }
}

/// Parent of two siblings under `hasher`'s combine rule.
pub fn combine_sorted<H: PairHasher + ?Sized>(hasher: &H, a: &Hash32, b: &Hash32) -> Hash32 {
    hasher.combine(a, b)
}

/// Keccak-256, as used by Ethereum tooling.
#[derive(Clone, Copy, Debug, Default)]
pub struct Keccak256Hasher;

impl PairHasher for Keccak256Hasher {
    fn hash_concat(&self, left: &Hash32, right: &Hash32) -> Hash32 {
        sha3::Keccak256::new()
            .chain_update(left)
            .chain_update(right)
            .finalize()
            .into()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Hasher;

impl PairHasher for Blake3Hasher {
    fn hash_concat(&self, left: &Hash32, right: &Hash32) -> Hash32 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl PairHasher for Sha256Hasher {
    fn hash_concat(&self, left: &Hash32, right: &Hash32) -> Hash32 {
        sha2::Sha256::new()
            .chain_update(left)
            .chain_update(right)
            .finalize()
            .into()
    }
}

/// Built-in hash selection, for configuration files and the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Keccak256,
    Blake3,
    Sha256,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Keccak256 => "keccak256",
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Sha256 => "sha256",
        }
    }
}

impl PairHasher for HashAlgorithm {
    fn hash_concat(&self, left: &Hash32, right: &Hash32) -> Hash32 {
        match self {
            HashAlgorithm::Keccak256 => Keccak256Hasher.hash_concat(left, right),
            HashAlgorithm::Blake3 => Blake3Hasher.hash_concat(left, right),
            HashAlgorithm::Sha256 => Sha256Hasher.hash_concat(left, right),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keccak256" | "keccak" => Ok(HashAlgorithm::Keccak256),
            "blake3" => Ok(HashAlgorithm::Blake3),
            "sha256" => Ok(HashAlgorithm::Sha256),
            other => Err(GateError::UnsupportedHash(other.to_string())),
        }
    }
}
