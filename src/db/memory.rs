use std::collections::HashMap;

use crate::{db::Db, Hash, NodeKey};

/// A simple in-memory node store
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    nodes: HashMap<NodeKey, Hash>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &HashMap<NodeKey, Hash> {
        &self.nodes
    }
}

impl Db for MemoryDb {
    fn get(&self, key: &NodeKey) -> Option<Hash> {
        self.nodes.get(key).copied()
    }

    fn insert(&mut self, key: NodeKey, hash: Hash) {
        self.nodes.insert(key, hash);
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod test {
    use super::MemoryDb;
    use crate::{db::Db, hash, LeafIndex, NodeKey};

    #[test]
    fn test_insert_and_get() {
        let mut db = MemoryDb::new();
        assert!(db.is_empty());
        let key = NodeKey::leaf(&LeafIndex::from(3u64));
        assert_eq!(db.get(&key), None);
        assert!(!db.contains(&key));

        db.insert(key, hash(b"a"));
        assert_eq!(db.get(&key), Some(hash(b"a")));
        assert!(db.contains(&key));
        assert!(!db.contains(&key.sibling()));

        db.insert(key, hash(b"b"));
        assert_eq!(db.get(&key), Some(hash(b"b")));
        assert_eq!(db.len(), 1);
        assert_eq!(db.nodes().len(), 1);
    }
}
