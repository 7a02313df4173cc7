use tracing::{info, warn};

use crate::hasher::PairHasher;
use crate::verify::check_proof;
use crate::{ClaimStore, GateError, Hash32, HashAlgorithm, Leaf, MerkleProof, Result};

/// Gates proof verification against prior consumption.
///
/// Each leaf moves `Unclaimed -> Claimed` at most once. The claimed check runs
/// before the hashing walk so repeat attempts fail cheaply. Verification holds
/// no lock; the final transition is the store's insert-if-absent, so a caller
/// that loses a race on the same leaf gets `AlreadyClaimed`.
pub struct ClaimRegistry<S: ClaimStore, H: PairHasher = HashAlgorithm> {
    store: S,
    hasher: H,
}

impl<S: ClaimStore, H: PairHasher> ClaimRegistry<S, H> {
    pub fn new(store: S, hasher: H) -> Self {
        Self { store, hasher }
    }

    pub fn claim(&self, leaf: Leaf, proof: &MerkleProof, root: &Hash32) -> Result<()> {
        if self.store.is_claimed(&leaf)? {
            warn!(leaf = %leaf, "claim rejected: already claimed");
            return Err(GateError::AlreadyClaimed);
        }

        if let Err(e) = check_proof(&self.hasher, &leaf, proof, root) {
            warn!(leaf = %leaf, siblings = proof.len(), "claim rejected: invalid merkle proof");
            return Err(e);
        }

        if !self.store.try_claim(leaf)? {
            warn!(leaf = %leaf, "claim rejected: lost race to concurrent claim");
            return Err(GateError::AlreadyClaimed);
        }

        info!(leaf = %leaf, "claim recorded");
        Ok(())
    }

    pub fn is_claimed(&self, leaf: &Leaf) -> Result<bool> {
        self.store.is_claimed(leaf)
    }

    pub fn claimed_count(&self) -> Result<usize> {
        self.store.claimed_count()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}
