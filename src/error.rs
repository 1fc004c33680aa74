//! Error types for tree construction, mutation and proof decoding

use thiserror::Error;

/// Error type for tree operations
///
/// Proof verification never produces one of these: a proof that does not
/// check out simply verifies to `false`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TreeError {
    /// A tree can't be built over zero leaves
    #[error("Cannot build a tree without leaves")]
    NoLeaves,
    /// Leaves and weights were not supplied pairwise
    #[error("Expected {expected} weights, got {got}")]
    WeightCountMismatch { expected: usize, got: usize },
    /// Sum overflow
    #[error("Sum overflow")]
    SumOverflow,
    /// Node is not a branch node
    #[error("Node is not a branch node")]
    ExpectedBranch,
    /// Node is not a leaf node
    #[error("Node is not a leaf node")]
    ExpectedLeaf,
    /// Proof bytes could not be decoded
    #[error("Invalid proof encoding: {0}")]
    InvalidEncoding(&'static str),
}
