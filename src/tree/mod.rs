mod merkle;
mod sparse;
mod sum;

pub use merkle::MerkleTree;
pub use sparse::SparseMerkleTree;
pub use sum::MerkleSumTree;

use crate::{Hash, Leaf, Node, ProofStep, Side, TreeError, Weight};

/// Depth of a [`SparseMerkleTree`]: one level per bit of a [`crate::LeafIndex`].
pub const TREE_DEPTH: usize = 256;

/// Builds a tree bottom-up by pairing adjacent nodes level after level.
///
/// When a level holds an odd number of nodes, the last one is carried to the
/// next level as is. It is neither duplicated nor hashed with itself.
pub(crate) fn build<W: Weight>(leaves: Vec<Leaf<W>>) -> Result<Node<W>, TreeError> {
    let mut level: Vec<Node<W>> = leaves.into_iter().map(Node::Leaf).collect();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut nodes = level.into_iter();
        while let Some(left) = nodes.next() {
            match nodes.next() {
                Some(right) => next.push(Node::new_branch(left, right)?),
                None => next.push(left),
            }
        }
        level = next;
    }
    level.pop().ok_or(TreeError::NoLeaves)
}

/// Finds the first leaf (left-most in depth-first order) whose hash is
/// `leaf_hash` and returns the path to it from `node`.
pub(crate) fn find_path<W: Weight>(node: &Node<W>, leaf_hash: &Hash) -> Option<Vec<Side>> {
    let mut path = find_path_reversed(node, leaf_hash)?;
    path.reverse();
    Some(path)
}

fn find_path_reversed<W: Weight>(node: &Node<W>, leaf_hash: &Hash) -> Option<Vec<Side>> {
    match node {
        Node::Leaf(leaf) => leaf.holds(leaf_hash).then(Vec::new),
        Node::Branch(branch) => [Side::Left, Side::Right].into_iter().find_map(|side| {
            let (child, _) = branch.child(side);
            let mut path = find_path_reversed(child, leaf_hash)?;
            path.push(side);
            Some(path)
        }),
    }
}

/// Walk down the tree from `root` following `path`.
/// * `for_each` - Closure that is executed at each step of the traversal of the tree.
///     * `side: Side` - side of the child taken at this step
///     * `next: &Node<W>` - child taken at this step
///     * `sibling: &Node<W>` - the other child
///
/// Returns the node reached at the end of the path.
pub(crate) fn walk_down<'a, W: Weight>(
    root: &'a Node<W>,
    path: &[Side],
    mut for_each: impl FnMut(Side, &Node<W>, &Node<W>),
) -> Result<&'a Node<W>, TreeError> {
    let mut current = root;
    for side in path {
        let Node::Branch(branch) = current else {
            return Err(TreeError::ExpectedBranch);
        };
        let (next, sibling) = branch.child(*side);
        for_each(*side, next, sibling);
        current = next;
    }
    Ok(current)
}

/// Collects the proof steps and sibling weights for the leaf at `path`,
/// ordered from the leaf up to the root.
pub(crate) fn collect_siblings<W: Weight>(
    root: &Node<W>,
    path: &[Side],
) -> Result<(Vec<ProofStep>, Vec<W>), TreeError> {
    let mut steps = Vec::with_capacity(path.len());
    let mut weights = Vec::with_capacity(path.len());
    walk_down(root, path, |side, _next, sibling| {
        steps.push(ProofStep::new(side.opposite(), sibling.hash()));
        weights.push(sibling.weight());
    })?;
    steps.reverse();
    weights.reverse();
    Ok((steps, weights))
}

/// Replaces the leaf at the end of `path` and refreshes every branch on the
/// way back up to `node`.
pub(crate) fn replace_leaf<W: Weight>(
    node: &mut Node<W>,
    path: &[Side],
    leaf: Leaf<W>,
) -> Result<(), TreeError> {
    match path.split_first() {
        None => {
            if !node.is_leaf() {
                return Err(TreeError::ExpectedLeaf);
            }
            *node = Node::Leaf(leaf);
            Ok(())
        }
        Some((side, rest)) => {
            let Node::Branch(branch) = node else {
                return Err(TreeError::ExpectedBranch);
            };
            replace_leaf(branch.child_mut(*side), rest, leaf)?;
            branch.refresh()
        }
    }
}

#[cfg(test)]
mod test {
    use super::{build, collect_siblings, find_path, replace_leaf, walk_down};
    use crate::{hash, hash_pair, Leaf, Node, Side, Sum, TreeError};

    fn leaves(data: &[&[u8]]) -> Vec<Leaf<Sum>> {
        data.iter()
            .zip(1..)
            .map(|(data, weight)| Leaf::new(data, weight))
            .collect()
    }

    #[test]
    fn test_build_no_leaves() {
        assert_eq!(build::<()>(Vec::new()).unwrap_err(), TreeError::NoLeaves);
    }

    #[test]
    fn test_build_carries_odd_node() {
        // ((a, b), c): c is carried up, not paired with itself
        let root = build(leaves(&[b"a", b"b", b"c"])).unwrap();
        let Node::Branch(branch) = &root else {
            panic!("root should be a branch");
        };
        assert!(branch.right().is_leaf());
        assert_eq!(branch.right().hash(), hash(b"c"));
        assert_eq!(
            root.hash(),
            hash_pair(&hash_pair(&hash(b"a"), &hash(b"b")), &hash(b"c"))
        );
        assert_eq!(root.weight(), 6);
    }

    #[test]
    fn test_find_path() {
        let root = build(leaves(&[b"a", b"b", b"c", b"d", b"e"])).unwrap();
        assert_eq!(
            find_path(&root, &hash(b"a")),
            Some(vec![Side::Left, Side::Left, Side::Left])
        );
        assert_eq!(
            find_path(&root, &hash(b"d")),
            Some(vec![Side::Left, Side::Right, Side::Right])
        );
        assert_eq!(find_path(&root, &hash(b"e")), Some(vec![Side::Right]));
        assert_eq!(find_path(&root, &hash(b"z")), None);
    }

    #[test]
    fn test_find_path_first_match() {
        let root = build(leaves(&[b"a", b"b", b"a"])).unwrap();
        assert_eq!(
            find_path(&root, &hash(b"a")),
            Some(vec![Side::Left, Side::Left])
        );
    }

    #[test]
    fn test_walk_down_wrong_path() {
        let root = build(leaves(&[b"a", b"b"])).unwrap();
        let reached = walk_down(&root, &[Side::Right], |_, _, _| {}).unwrap();
        assert_eq!(reached.hash(), hash(b"b"));
        assert_eq!(
            walk_down(&root, &[Side::Right, Side::Left], |_, _, _| {}).unwrap_err(),
            TreeError::ExpectedBranch
        );
    }

    #[test]
    fn test_collect_siblings() {
        let root = build(leaves(&[b"a", b"b", b"c", b"d"])).unwrap();
        let (steps, weights) = collect_siblings(&root, &[Side::Right, Side::Left]).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].side, Side::Right);
        assert_eq!(steps[0].hash, hash(b"d"));
        assert_eq!(steps[1].side, Side::Left);
        assert_eq!(steps[1].hash, hash_pair(&hash(b"a"), &hash(b"b")));
        assert_eq!(weights, vec![4, 3]);
    }

    #[test]
    fn test_replace_leaf() {
        let mut root = build(leaves(&[b"a", b"b", b"c"])).unwrap();
        replace_leaf(&mut root, &[Side::Right], Leaf::new(b"z", 10)).unwrap();
        assert_eq!(
            root.hash(),
            hash_pair(&hash_pair(&hash(b"a"), &hash(b"b")), &hash(b"z"))
        );
        assert_eq!(root.weight(), 13);
        assert_eq!(
            replace_leaf(&mut root, &[], Leaf::new(b"z", 1)).unwrap_err(),
            TreeError::ExpectedLeaf
        );
    }
}
