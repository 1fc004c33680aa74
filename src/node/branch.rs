use std::fmt::Display;

use super::{hash_pair, Hash, Node, Weight};
use crate::{Side, TreeError};

/// A branch is a node that has exactly 2 children, each owned exclusively.
/// It holds the hash of its children's hashes and the combined weight of
/// all its descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch<W: Weight> {
    left: Box<Node<W>>,
    right: Box<Node<W>>,
    weight: W,
    node_hash: Hash,
}

impl<W: Weight> Branch<W> {
    /// Creates a new [`Branch`]. This function performs a hash and a weight combination.
    pub fn new(left: Node<W>, right: Node<W>) -> Result<Self, TreeError> {
        let weight = left
            .weight()
            .combine(right.weight())
            .ok_or(TreeError::SumOverflow)?;
        let node_hash = hash_pair(&left.hash(), &right.hash());
        Ok(Self {
            left: Box::new(left),
            right: Box::new(right),
            weight,
            node_hash,
        })
    }

    /// Returns the hash of the node. NO HASHING IS DONE HERE.
    pub fn hash(&self) -> Hash {
        self.node_hash
    }

    pub fn weight(&self) -> W {
        self.weight
    }

    /// Returns the left and right children of this branch.
    pub fn children(&self) -> (&Node<W>, &Node<W>) {
        (&self.left, &self.right)
    }

    /// Returns the left children of this branch.
    pub fn left(&self) -> &Node<W> {
        &self.left
    }

    /// Returns the right children of this branch.
    pub fn right(&self) -> &Node<W> {
        &self.right
    }

    /// Returns the child on `side` and its sibling.
    pub fn child(&self, side: Side) -> (&Node<W>, &Node<W>) {
        match side {
            Side::Left => (&self.left, &self.right),
            Side::Right => (&self.right, &self.left),
        }
    }

    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Node<W> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Recomputes hash and weight from the current children.
    pub(crate) fn refresh(&mut self) -> Result<(), TreeError> {
        self.weight = self
            .left
            .weight()
            .combine(self.right.weight())
            .ok_or(TreeError::SumOverflow)?;
        self.node_hash = hash_pair(&self.left.hash(), &self.right.hash());
        Ok(())
    }
}

impl<W: Weight> Display for Branch<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Branch {{ weight: {:?}, hash: {} }}",
            self.weight(),
            hex::encode(self.hash().as_slice())
        )
    }
}
