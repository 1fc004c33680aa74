//! Fixed depth sparse Merkle tree addressed by a 256-bit leaf index.
//!
//! Conceptually the tree is complete with `2^256` leaves. Only the nodes on
//! paths that were written are stored; every other node hashes to
//! [`EMPTY_HASH`]. The same default hash is used at every height, so an empty
//! leaf and an empty subtree of any height are indistinguishable.

use log::{debug, trace};

use crate::{
    db::{Db, MemoryDb},
    hash, hash_pair, Hash, LeafIndex, NodeKey, SparseProof, EMPTY_HASH,
};

use super::TREE_DEPTH;

/// Sparse Merkle tree.
/// * `D` - store for the materialized nodes.
#[derive(Debug, Clone, Default)]
pub struct SparseMerkleTree<D: Db = MemoryDb> {
    db: D,
}

impl SparseMerkleTree<MemoryDb> {
    /// Creates an empty in-memory tree.
    pub fn new() -> Self {
        Self::with_db(MemoryDb::new())
    }
}

impl<D: Db> SparseMerkleTree<D> {
    /// Creates a tree on top of `db`, whose content is taken as is.
    pub fn with_db(db: D) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &D {
        &self.db
    }

    /// Root hash of the tree, [`EMPTY_HASH`] if nothing was ever written.
    pub fn root_hash(&self) -> Hash {
        self.db.get(&NodeKey::root()).unwrap_or(EMPTY_HASH)
    }

    /// Hash of the leaf written at `index`, if any.
    pub fn leaf(&self, index: &LeafIndex) -> Option<Hash> {
        self.db.get(&NodeKey::leaf(index))
    }

    /// Writes `data` at `index` and rehashes every node up to the root,
    /// materializing the nodes of the path that were still implicit.
    pub fn update(&mut self, index: &LeafIndex, data: &[u8]) {
        let mut key = NodeKey::leaf(index);
        let mut current = hash(data);
        self.db.insert(key, current);
        for height in 0..TREE_DEPTH {
            let sibling = self.db.get(&key.sibling()).unwrap_or(EMPTY_HASH);
            current = if key.is_left() {
                hash_pair(&current, &sibling)
            } else {
                hash_pair(&sibling, &current)
            };
            key = key.parent();
            trace!("height {}: {}", height + 1, hex::encode(current));
            self.db.insert(key, current);
        }
        debug!("wrote leaf {}, new root {}", index, hex::encode(current));
    }

    /// Generates a proof for `index`, ordered from the deepest level up.
    ///
    /// The walk from the root stops right after the first level whose child
    /// on the path to `index` was never materialized. Below that level the
    /// whole subtree is empty and the proof can only be checked as a
    /// non-existence proof. Proofs are at most [`TREE_DEPTH`] long: a
    /// non-existence proof only reaches that length when the leaf next to
    /// `index` was written. A tree that was never written yields an empty proof.
    pub fn generate_proof(&self, index: &LeafIndex) -> SparseProof {
        let mut siblings = Vec::with_capacity(TREE_DEPTH);
        if self.db.contains(&NodeKey::root()) {
            for height in (0..TREE_DEPTH).rev() {
                let next = NodeKey::new(height, index);
                siblings.push(self.db.get(&next.sibling()));
                if !self.db.contains(&next) {
                    trace!("path to {} leaves the tree at height {}", index, height);
                    break;
                }
            }
        }
        siblings.reverse();
        SparseProof::new(siblings)
    }
}
