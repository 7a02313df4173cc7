use std::collections::{HashMap, HashSet};
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hasher::{combine_sorted, PairHasher};
use crate::{GateError, Hash32, Leaf, MerkleProof, Result};

/// What to do when the same leaf appears more than once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Build over the leaves exactly as given.
    Keep,
    /// Drop repeats, keeping the first occurrence.
    #[default]
    Dedup,
    /// Fail with [`GateError::DuplicateLeaf`].
    Reject,
}

/// What to do with the last node of a level that has an odd node count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OddNodePolicy {
    /// Move it to the next level unchanged.
    #[default]
    CarryUp,
    /// Pair it with a copy of itself.
    Duplicate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Sort leaves byte-wise before building so the root depends only on the set.
    pub sort_leaves: bool,
    pub duplicates: DuplicatePolicy,
    pub odd_node: OddNodePolicy,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            sort_leaves: true,
            duplicates: DuplicatePolicy::default(),
            odd_node: OddNodePolicy::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MerkleNode {
    Leaf {
        hash: Hash32,
        /// Position in [`MerkleTree::leaves`]
        index: usize,
    },
    Internal {
        hash: Hash32,
        /// Leaf positions covered by this subtree
        span: Range<usize>,
        left: Box<MerkleNode>,
        right: Box<MerkleNode>,
    },
}

impl MerkleNode {
    pub fn hash(&self) -> Hash32 {
        match self {
            MerkleNode::Leaf { hash, .. } | MerkleNode::Internal { hash, .. } => *hash,
        }
    }

    pub fn span(&self) -> Range<usize> {
        match self {
            MerkleNode::Leaf { index, .. } => *index..*index + 1,
            MerkleNode::Internal { span, .. } => span.clone(),
        }
    }

    fn join<H: PairHasher + ?Sized>(hasher: &H, left: MerkleNode, right: MerkleNode) -> Self {
        let hash = combine_sorted(hasher, &left.hash(), &right.hash());
        // a duplicated node covers the same span as its twin
        let span = left.span().start..left.span().end.max(right.span().end);
        MerkleNode::Internal {
            hash,
            span,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Binary hash tree over canonical leaves using sorted-pair combination.
///
/// Built once, offline, from an allowlist snapshot. Only [`MerkleTree::root`]
/// is published to the gate; proofs are handed to members.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    root: MerkleNode,
    leaves: Vec<Leaf>,
    /// First position of each distinct leaf
    positions: HashMap<Leaf, usize>,
    options: TreeOptions,
}

impl MerkleTree {
    pub fn build<H, I>(hasher: &H, leaves: I, options: TreeOptions) -> Result<Self>
    where
        H: PairHasher + ?Sized,
        I: IntoIterator<Item = Leaf>,
    {
        let mut leaves: Vec<Leaf> = leaves.into_iter().collect();
        if leaves.is_empty() {
            return Err(GateError::EmptyAllowlist);
        }

        if options.sort_leaves {
            leaves.sort();
        }

        let mut seen = HashSet::with_capacity(leaves.len());
        match options.duplicates {
            DuplicatePolicy::Keep => {}
            DuplicatePolicy::Dedup => leaves.retain(|leaf| seen.insert(*leaf)),
            DuplicatePolicy::Reject => {
                if !leaves.iter().all(|leaf| seen.insert(*leaf)) {
                    return Err(GateError::DuplicateLeaf);
                }
            }
        }

        let mut level: Vec<MerkleNode> = leaves
            .iter()
            .enumerate()
            .map(|(index, leaf)| MerkleNode::Leaf { hash: *leaf.as_bytes(), index })
            .collect();

        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            let mut nodes = level.into_iter();

            while let Some(left) = nodes.next() {
                match nodes.next() {
                    Some(right) => next.push(MerkleNode::join(hasher, left, right)),
                    None => match options.odd_node {
                        OddNodePolicy::CarryUp => next.push(left),
                        OddNodePolicy::Duplicate => {
                            let twin = left.clone();
                            next.push(MerkleNode::join(hasher, left, twin));
                        }
                    },
                }
            }

            level = next;
        }

        let root = level.pop().ok_or(GateError::EmptyAllowlist)?;

        let mut positions = HashMap::with_capacity(leaves.len());
        for (index, leaf) in leaves.iter().enumerate() {
            positions.entry(*leaf).or_insert(index);
        }

        debug!(
            leaves = leaves.len(),
            root = %crate::encode_hash(&root.hash()),
            "built merkle tree"
        );

        Ok(Self {
            root,
            leaves,
            positions,
            options,
        })
    }

    pub fn root(&self) -> Hash32 {
        self.root.hash()
    }

    pub fn root_node(&self) -> &MerkleNode {
        &self.root
    }

    /// Leaves in tree order (after sorting and duplicate handling).
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Tree position of the first occurrence of `leaf`.
    pub fn position(&self, leaf: &Leaf) -> Option<usize> {
        self.positions.get(leaf).copied()
    }

    pub fn contains(&self, leaf: &Leaf) -> bool {
        self.position(leaf).is_some()
    }

    /// Proof for the first occurrence of `leaf`.
    pub fn proof(&self, leaf: &Leaf) -> Result<MerkleProof> {
        let index = self.position(leaf).ok_or(GateError::LeafNotFound)?;
        self.proof_at(index)
    }

    /// Proof for the leaf at `index`, siblings ordered leaf to root.
    pub fn proof_at(&self, index: usize) -> Result<MerkleProof> {
        if index >= self.leaves.len() {
            return Err(GateError::LeafNotFound);
        }

        let mut siblings = Vec::new();
        let mut node = &self.root;

        // Carried-up nodes are never wrapped, so levels they skip add no sibling.
        while let MerkleNode::Internal { left, right, .. } = node {
            if left.span().contains(&index) {
                siblings.push(right.hash());
                node = left;
            } else {
                siblings.push(left.hash());
                node = right;
            }
        }

        siblings.reverse();
        Ok(MerkleProof::new(siblings))
    }
}
