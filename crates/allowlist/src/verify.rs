//! Stateless proof verification

use crate::hasher::{combine_sorted, PairHasher};
use crate::{GateError, Hash32, Leaf, MerkleProof, Result};

/// Fold the proof over the leaf with the sorted-pair rule.
pub fn compute_root<H: PairHasher + ?Sized>(hasher: &H, leaf: &Leaf, proof: &MerkleProof) -> Hash32 {
    proof
        .siblings
        .iter()
        .fold(*leaf.as_bytes(), |current, sibling| combine_sorted(hasher, &current, sibling))
}

pub fn verify_proof<H: PairHasher + ?Sized>(
    hasher: &H,
    leaf: &Leaf,
    proof: &MerkleProof,
    root: &Hash32,
) -> bool {
    compute_root(hasher, leaf, proof) == *root
}

/// Like [`verify_proof`], failing with [`GateError::InvalidMerkleProof`].
pub fn check_proof<H: PairHasher + ?Sized>(
    hasher: &H,
    leaf: &Leaf,
    proof: &MerkleProof,
    root: &Hash32,
) -> Result<()> {
    if verify_proof(hasher, leaf, proof, root) {
        Ok(())
    } else {
        Err(GateError::InvalidMerkleProof)
    }
}
