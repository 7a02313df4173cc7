use serde::{Deserialize, Serialize};

use crate::{
    canonicalize, encode_hash, parse_root, ClaimRegistry, ClaimStore, Hash32, HashAlgorithm,
    InMemoryClaimStore, Leaf, MerkleProof, Result,
};

/// Successful admission; the caller may proceed to the privileged action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    pub leaf: Leaf,
}

/// Admission entry point holding one fixed root.
///
/// Caller identities reach the gate already authenticated; the gate only
/// canonicalizes them.
pub struct MintGate<S: ClaimStore = InMemoryClaimStore> {
    root: Hash32,
    registry: ClaimRegistry<S>,
}

impl MintGate<InMemoryClaimStore> {
    /// Keccak-256 gate with an in-memory claim set.
    pub fn new(root: Hash32) -> Self {
        Self::with_store(root, HashAlgorithm::Keccak256, InMemoryClaimStore::new())
    }
}

impl<S: ClaimStore> MintGate<S> {
    pub fn with_store(root: Hash32, hash: HashAlgorithm, store: S) -> Self {
        Self { root, registry: ClaimRegistry::new(store, hash) }
    }

    /// Construct from a `0x`-prefixed 64-char hex root.
    pub fn from_hex_root(root: &str, hash: HashAlgorithm, store: S) -> Result<Self> {
        Ok(Self::with_store(parse_root(root)?, hash, store))
    }

    pub fn root(&self) -> Hash32 {
        self.root
    }

    pub fn root_hex(&self) -> String {
        encode_hash(&self.root)
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        *self.registry.hasher()
    }

    pub fn mint(&self, caller: &[u8], proof: &MerkleProof) -> Result<Admission> {
        let leaf = canonicalize(caller)?;
        self.registry.claim(leaf, proof, &self.root)?;
        Ok(Admission { leaf })
    }

    pub fn is_claimed(&self, caller: &[u8]) -> Result<bool> {
        self.registry.is_claimed(&canonicalize(caller)?)
    }

    pub fn claimed_count(&self) -> Result<usize> {
        self.registry.claimed_count()
    }
}
