//! Node storage for the sparse Merkle tree

mod memory;

pub use memory::MemoryDb;

use crate::{Hash, NodeKey};

/// Thread safety marker trait
#[cfg(feature = "multi-thread")]
pub trait ThreadSafe: Send + Sync {}
#[cfg(feature = "multi-thread")]
impl<T: Send + Sync> ThreadSafe for T {}

#[cfg(not(feature = "multi-thread"))]
pub trait ThreadSafe {}
#[cfg(not(feature = "multi-thread"))]
impl<T> ThreadSafe for T {}

/// Store for the materialized nodes of a [`crate::SparseMerkleTree`].
///
/// Only nodes on a path that was written are ever stored. A key that is
/// absent from the store stands for a never-written subtree, whose hash is
/// [`crate::EMPTY_HASH`].
pub trait Db: ThreadSafe {
    /// Get the hash of a materialized node
    fn get(&self, key: &NodeKey) -> Option<Hash>;

    /// Insert or overwrite the hash of a node
    fn insert(&mut self, key: NodeKey, hash: Hash);

    /// Number of materialized nodes
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the node at `key` has been materialized
    fn contains(&self, key: &NodeKey) -> bool {
        self.get(key).is_some()
    }
}
