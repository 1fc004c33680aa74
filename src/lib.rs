//! Authenticated data structures over SHA-256
//!
//! This crate provides three Merkle trees sharing one hash primitive:
//! - [`MerkleTree`]: a binary hash tree built over an ordered list of values
//! - [`MerkleSumTree`]: a binary hash tree whose leaves carry a weight, summed up to the root
//! - [`SparseMerkleTree`]: a fixed depth tree of `2^256` leaves addressed by index,
//!   only storing the nodes that were written
//!
//! Every tree supports building, leaf updates with rehashing up to the root and
//! inclusion proofs. Sparse tree proofs also double as non-existence proofs.
//! Proof verification is a pure function of the proof, the claimed value and a
//! root, and never fails loudly: an invalid proof verifies to `false`.

mod db;
mod error;
mod index;
mod node;
mod proof;
mod tree;

pub use db::{Db, MemoryDb, ThreadSafe};
pub use error::TreeError;
pub use index::{LeafIndex, NodeKey};
pub use node::{hash, hash_pair, Branch, Hash, Leaf, Node, Sum, Weight, EMPTY_HASH, HASH_SIZE};
pub use proof::{
    verify_proof, verify_sparse_non_existence, verify_sparse_proof, verify_sum_proof,
    CompressedSparseProof, Proof, ProofStep, Side, SparseProof, SumProof,
};
pub use tree::{MerkleSumTree, MerkleTree, SparseMerkleTree, TREE_DEPTH};

#[cfg(test)]
mod tests;
