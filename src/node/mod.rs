mod branch;
mod leaf;

use hex_literal::hex;
use sha2::{Digest, Sha256};
use std::fmt::{Debug, Display};

pub use branch::Branch;
pub use leaf::Leaf;

use crate::TreeError;

/// Size of a digest in bytes.
pub const HASH_SIZE: usize = 32;

/// A raw SHA-256 digest.
pub type Hash = [u8; HASH_SIZE];

/// Weight carried by the leaves of a [`crate::MerkleSumTree`]. Weights are never negative.
pub type Sum = u64;

/// Hash standing in for every subtree that was never written: `SHA256("")`.
pub const EMPTY_HASH: Hash =
    hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");

/// Hashes raw leaf data.
pub fn hash(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Hashes the concatenation of two child hashes, `left` first.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Payload aggregated from the leaves up to the root alongside the hash.
///
/// A plain Merkle tree carries `()`, a sum tree carries a [`Sum`].
pub trait Weight: Copy + Debug + PartialEq + Eq {
    /// Combines the weights of two siblings into their parent's weight.
    /// Returns `None` on overflow.
    fn combine(self, other: Self) -> Option<Self>;
}

impl Weight for () {
    fn combine(self, _other: Self) -> Option<Self> {
        Some(())
    }
}

impl Weight for Sum {
    fn combine(self, other: Self) -> Option<Self> {
        self.checked_add(other)
    }
}

/// All possible nodes of a [`crate::MerkleTree`] or [`crate::MerkleSumTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<W: Weight> {
    /// A leaf holding the hash of its data and its weight
    Leaf(Leaf<W>),
    /// A branch with exactly two children
    Branch(Branch<W>),
}

impl<W: Weight> Node<W> {
    /// Creates a [`Node::Leaf`] from raw `data` and a `weight`.
    pub fn new_leaf(data: &[u8], weight: W) -> Self {
        Self::Leaf(Leaf::new(data, weight))
    }

    /// Creates a [`Node::Branch`] from 2 [`Node`]
    pub fn new_branch(left: Node<W>, right: Node<W>) -> Result<Self, TreeError> {
        Ok(Self::Branch(Branch::new(left, right)?))
    }

    /// Returns the hash of the node. NO HASHING IS DONE HERE.
    pub fn hash(&self) -> Hash {
        match self {
            Self::Leaf(leaf) => leaf.hash(),
            Self::Branch(branch) => branch.hash(),
        }
    }

    /// Returns the weight of the node. NO OPERATION IS DONE HERE.
    pub fn weight(&self) -> W {
        match self {
            Self::Leaf(leaf) => leaf.weight(),
            Self::Branch(branch) => branch.weight(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }
}

impl<W: Weight> Display for Node<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf(leaf) => write!(f, "{}", leaf),
            Self::Branch(branch) => write!(f, "{}", branch),
        }
    }
}
