//! Merkle sum tree: a binary Merkle tree whose nodes also carry the total
//! weight of the leaves below them.
//!
//! Hashes do not commit to the sums. A verifier checks a claimed leaf weight
//! by adding up the sibling sums shipped with the proof and comparing the
//! total with a root sum it trusts.

use log::debug;

use crate::{hash, Hash, Leaf, Node, Proof, Sum, SumProof, TreeError};

use super::{build, collect_siblings, find_path, replace_leaf, walk_down};

/// Merkle sum tree.
///
/// As with [`crate::MerkleTree`], leaves are located by content and the
/// left-most leaf wins when several hold the same data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleSumTree {
    root: Node<Sum>,
    len: usize,
}

impl MerkleSumTree {
    /// Builds a tree over `leaves`, the i-th leaf weighing `weights[i]`.
    ///
    /// Weights are unsigned: negative weights can't be represented, and a
    /// total that does not fit in a [`Sum`] (`u64`) fails with
    /// [`TreeError::SumOverflow`].
    pub fn new<I, T>(leaves: I, weights: &[Sum]) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let leaves: Vec<_> = leaves.into_iter().collect();
        if leaves.len() != weights.len() {
            return Err(TreeError::WeightCountMismatch {
                expected: leaves.len(),
                got: weights.len(),
            });
        }
        let len = leaves.len();
        let root = build(
            leaves
                .iter()
                .zip(weights)
                .map(|(data, weight)| Leaf::new(data.as_ref(), *weight))
                .collect(),
        )?;
        debug!(
            "built merkle sum tree over {} leaves, total {}",
            len,
            root.weight()
        );
        Ok(Self { root, len })
    }

    /// Root node of the tree.
    pub fn root(&self) -> &Node<Sum> {
        &self.root
    }

    pub fn root_hash(&self) -> Hash {
        self.root.hash()
    }

    /// Total weight of all the leaves.
    pub fn root_sum(&self) -> Sum {
        self.root.weight()
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a tree holds at least one leaf.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Generates an inclusion proof, with sibling sums, for the leaf holding
    /// `data`, or `None` if no leaf holds it.
    pub fn generate_proof(&self, data: &[u8]) -> Option<SumProof> {
        let path = find_path(&self.root, &hash(data))?;
        let (steps, sums) = collect_siblings(&self.root, &path).ok()?;
        Some(SumProof::new(Proof::new(steps), sums))
    }

    /// Replaces the leaf holding `old` with one holding `new` and weighing
    /// `weight`, then rehashes and re-sums its ancestors.
    ///
    /// Returns `Ok(false)` if no leaf holds `old`. Fails with
    /// [`TreeError::SumOverflow`] if the new total would not fit in a [`Sum`];
    /// the tree is left untouched in both cases.
    pub fn update(&mut self, old: &[u8], new: &[u8], weight: Sum) -> Result<bool, TreeError> {
        let Some(path) = find_path(&self.root, &hash(old)) else {
            debug!("no leaf to update");
            return Ok(false);
        };
        let old_weight = walk_down(&self.root, &path, |_, _, _| {})?.weight();
        // every partial sum on the path is bounded by the root sum
        (self.root_sum() - old_weight)
            .checked_add(weight)
            .ok_or(TreeError::SumOverflow)?;
        replace_leaf(&mut self.root, &path, Leaf::new(new, weight))?;
        debug!(
            "updated leaf at depth {}, new root {} total {}",
            path.len(),
            hex::encode(self.root_hash()),
            self.root_sum()
        );
        Ok(true)
    }
}
