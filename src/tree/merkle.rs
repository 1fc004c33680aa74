//! Binary Merkle tree over an ordered sequence of byte strings

use log::debug;

use crate::{hash, Hash, Leaf, Node, Proof, TreeError};

use super::{build, collect_siblings, find_path, replace_leaf};

/// Binary Merkle tree.
///
/// Leaves are located by content: proofs and updates address a leaf by the
/// data it holds. When several leaves hold the same data, the left-most one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    root: Node<()>,
    len: usize,
}

impl MerkleTree {
    /// Builds a tree over `leaves`, in order. Fails if `leaves` is empty.
    pub fn new<I, T>(leaves: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let leaves: Vec<_> = leaves
            .into_iter()
            .map(|data| Leaf::new(data.as_ref(), ()))
            .collect();
        let len = leaves.len();
        let root = build(leaves)?;
        debug!("built merkle tree over {} leaves", len);
        Ok(Self { root, len })
    }

    /// Root node of the tree.
    pub fn root(&self) -> &Node<()> {
        &self.root
    }

    pub fn root_hash(&self) -> Hash {
        self.root.hash()
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a tree holds at least one leaf.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Generates an inclusion proof for the leaf holding `data`, or `None` if
    /// no leaf holds it.
    pub fn generate_proof(&self, data: &[u8]) -> Option<Proof> {
        let path = find_path(&self.root, &hash(data))?;
        let (steps, _) = collect_siblings(&self.root, &path).ok()?;
        Some(Proof::new(steps))
    }

    /// Replaces the leaf holding `old` with one holding `new` and rehashes
    /// its ancestors. Returns `Ok(false)`, leaving the tree untouched, if no
    /// leaf holds `old`.
    pub fn update(&mut self, old: &[u8], new: &[u8]) -> Result<bool, TreeError> {
        let Some(path) = find_path(&self.root, &hash(old)) else {
            debug!("no leaf to update");
            return Ok(false);
        };
        replace_leaf(&mut self.root, &path, Leaf::new(new, ()))?;
        debug!(
            "updated leaf at depth {}, new root {}",
            path.len(),
            hex::encode(self.root_hash())
        );
        Ok(true)
    }
}
