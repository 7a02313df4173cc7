//! Merkle Allowlist Gate
//!
//! Authorizes a one-time action for members of a fixed allowlist. Only the
//! Merkle root of the allowlist is held by the gate; callers present
//! sorted-pair inclusion proofs and each member may be admitted at most once.

mod types;
mod canonical;
mod hasher;
mod tree;
mod verify;
mod store;
mod registry;
mod gate;
mod bundle;

pub use types::{Hash32, Leaf, MerkleProof, encode_hash, decode_hash, parse_root};
pub use canonical::{canonicalize, canonicalize_str, parse_address, LEAF_WIDTH};
pub use hasher::{combine_sorted, PairHasher, HashAlgorithm, Keccak256Hasher, Blake3Hasher, Sha256Hasher};
pub use tree::{MerkleTree, MerkleNode, TreeOptions, DuplicatePolicy, OddNodePolicy};
pub use verify::{compute_root, verify_proof, check_proof};
pub use store::{ClaimStore, InMemoryClaimStore, FileBackedClaimStore};
pub use registry::ClaimRegistry;
pub use gate::{MintGate, Admission};
pub use bundle::{AllowlistBundle, BundleEntry, build_allowlist};

use thiserror::Error;

/// Failure reasons surfaced by the gate and its offline tooling.
///
/// The messages of the first four variants are matched literally by existing
/// callers and must not change.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("invalid address format")]
    InvalidAddressFormat,

    #[error("empty allowlist")]
    EmptyAllowlist,

    #[error("invalid merkle proof")]
    InvalidMerkleProof,

    #[error("already claimed")]
    AlreadyClaimed,

    #[error("duplicate leaf")]
    DuplicateLeaf,

    #[error("leaf not in tree")]
    LeafNotFound,

    #[error("invalid root: {0}")]
    InvalidRoot(String),

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedHash(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, GateError>;
