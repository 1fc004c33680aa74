use std::fmt::Display;

use super::{hash, Hash, Weight};

/// A Leaf is a node that has no children. They are the last row of the tree.
/// The raw data is not kept, only its hash and the leaf's weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf<W: Weight> {
    node_hash: Hash,
    weight: W,
}

impl<W: Weight> Leaf<W> {
    /// Creates a new [`Leaf`]. This function performs a hash.
    pub fn new(data: &[u8], weight: W) -> Self {
        Self {
            node_hash: hash(data),
            weight,
        }
    }

    /// Returns the hash of the node. NO HASHING IS DONE HERE.
    pub fn hash(&self) -> Hash {
        self.node_hash
    }

    /// Returns the weight of the node.
    pub fn weight(&self) -> W {
        self.weight
    }

    /// Whether this leaf's hash equals `data_hash`.
    pub fn holds(&self, data_hash: &Hash) -> bool {
        &self.node_hash == data_hash
    }
}

impl<W: Weight> Display for Leaf<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Leaf {{ weight: {:?}, hash: {} }}",
            self.weight(),
            hex::encode(self.hash().as_slice())
        )
    }
}
