//! Offline allowlist tooling: root plus per-member proofs

use serde::{Deserialize, Serialize};

use crate::{
    canonicalize, canonicalize_str, encode_hash, parse_root, GateError, Hash32, HashAlgorithm,
    Leaf, MerkleProof, MerkleTree, Result, TreeOptions,
};

/// One allowlist member as published to its holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntry {
    /// Identity as supplied, hex with `0x` prefix
    pub address: String,
    pub leaf: Leaf,
    pub proof: MerkleProof,
}

/// Everything the publisher of an allowlist hands out: the root for the gate
/// and a proof for every member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowlistBundle {
    pub root: String,
    pub hash: HashAlgorithm,
    pub options: TreeOptions,
    pub entries: Vec<BundleEntry>,
}

impl AllowlistBundle {
    pub fn root_hash(&self) -> Result<Hash32> {
        parse_root(&self.root)
    }

    /// Entry for `address`, matched on the canonical leaf.
    pub fn entry(&self, address: &str) -> Result<&BundleEntry> {
        let leaf = canonicalize_str(address)?;
        self.entries
            .iter()
            .find(|e| e.leaf == leaf)
            .ok_or(GateError::LeafNotFound)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GateError::Serialization(e.to_string()))
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| GateError::Serialization(e.to_string()))
    }
}

/// Build the tree over `identities` and collect each member's proof.
///
/// Entries follow input order. Identities that canonicalize to the same leaf
/// share one proof.
pub fn build_allowlist<I, A>(identities: I, hash: HashAlgorithm, options: TreeOptions) -> Result<AllowlistBundle>
where
    I: IntoIterator<Item = A>,
    A: AsRef<[u8]>,
{
    let raw: Vec<A> = identities.into_iter().collect();
    let leaves = raw
        .iter()
        .map(|id| canonicalize(id.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let tree = MerkleTree::build(&hash, leaves.iter().copied(), options)?;

    let entries = raw
        .iter()
        .zip(leaves)
        .map(|(id, leaf)| -> Result<BundleEntry> {
            Ok(BundleEntry {
                address: format!("0x{}", hex::encode(id.as_ref())),
                leaf,
                proof: tree.proof(&leaf)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AllowlistBundle {
        root: encode_hash(&tree.root()),
        hash,
        options,
        entries,
    })
}
