//! Addressing for the sparse Merkle tree.
//!
//! A [`LeafIndex`] is a 256-bit unsigned integer. The leaf it addresses is
//! reached from the root by reading its bits from the most significant one
//! (depth 255) down to the least significant one (depth 0): a `0` bit goes
//! left, a `1` bit goes right.

use std::fmt::Display;

use bitvec::prelude::*;

use crate::tree::TREE_DEPTH;

/// Address of a leaf in a [`crate::SparseMerkleTree`], stored big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeafIndex([u8; TREE_DEPTH / 8]);

impl LeafIndex {
    /// Creates an index from its big-endian byte representation.
    pub const fn from_be_bytes(bytes: [u8; TREE_DEPTH / 8]) -> Self {
        Self(bytes)
    }

    pub fn to_be_bytes(&self) -> [u8; TREE_DEPTH / 8] {
        self.0
    }

    /// Bit of the index at `depth`, `0` being the least significant bit.
    ///
    /// # Panics
    /// If `depth >= TREE_DEPTH`.
    pub(crate) fn bit(&self, depth: usize) -> u8 {
        debug_assert!(depth < TREE_DEPTH, "depth {} out of range", depth);
        self.0.view_bits::<Msb0>()[TREE_DEPTH - 1 - depth] as u8
    }

    /// Copy of the index with the lowest `height` bits cleared.
    fn truncate(&self, height: usize) -> Self {
        let mut bytes = self.0;
        bytes.view_bits_mut::<Msb0>()[TREE_DEPTH - height..].fill(false);
        Self(bytes)
    }

    /// Copy of the index with the bit at `depth` flipped.
    fn flip(&self, depth: usize) -> Self {
        let mut bytes = self.0;
        let bits = bytes.view_bits_mut::<Msb0>();
        let position = TREE_DEPTH - 1 - depth;
        let bit = bits[position];
        bits.set(position, !bit);
        Self(bytes)
    }
}

impl From<u64> for LeafIndex {
    fn from(value: u64) -> Self {
        Self::from(value as u128)
    }
}

impl From<u128> for LeafIndex {
    fn from(value: u128) -> Self {
        let mut bytes = [0; TREE_DEPTH / 8];
        bytes[TREE_DEPTH / 16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl From<[u8; TREE_DEPTH / 8]> for LeafIndex {
    fn from(bytes: [u8; TREE_DEPTH / 8]) -> Self {
        Self(bytes)
    }
}

impl Display for LeafIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Storage key of a sparse tree node.
///
/// `height` is `0` for leaves and [`TREE_DEPTH`] for the root. `prefix` is the
/// index of any leaf below the node with its lowest `height` bits cleared, so
/// every node of the conceptual tree has exactly one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    height: usize,
    prefix: LeafIndex,
}

impl NodeKey {
    /// Key of the node at `height` on the path to `index`.
    ///
    /// # Panics
    /// If `height > TREE_DEPTH`.
    pub(crate) fn new(height: usize, index: &LeafIndex) -> Self {
        Self {
            height,
            prefix: index.truncate(height),
        }
    }

    pub fn root() -> Self {
        Self::new(TREE_DEPTH, &LeafIndex::default())
    }

    pub fn leaf(index: &LeafIndex) -> Self {
        Self::new(0, index)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn prefix(&self) -> &LeafIndex {
        &self.prefix
    }

    /// Whether this node is the left child of its parent. Must not be called on the root.
    pub(crate) fn is_left(&self) -> bool {
        self.prefix.bit(self.height) == 0
    }

    /// Key of the other child of this node's parent. Must not be called on the root.
    pub(crate) fn sibling(&self) -> Self {
        debug_assert!(self.height < TREE_DEPTH, "the root has no sibling");
        Self {
            height: self.height,
            prefix: self.prefix.flip(self.height),
        }
    }

    /// Key of this node's parent. Must not be called on the root.
    pub(crate) fn parent(&self) -> Self {
        debug_assert!(self.height < TREE_DEPTH, "the root has no parent");
        Self::new(self.height + 1, &self.prefix)
    }
}
