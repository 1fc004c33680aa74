//! Proofs are used to check that a value belongs to a tree knowing only its root.
//!
//! - [`Proof`]: sibling hashes tagged with their side, for [`crate::MerkleTree`].
//! - [`SumProof`]: a [`Proof`] plus the sibling sums, for [`crate::MerkleSumTree`].
//! - [`SparseProof`]: untagged sibling hashes for [`crate::SparseMerkleTree`], the
//!   side being read from the leaf index. A sparse proof is at most
//!   [`TREE_DEPTH`] long. Non-existence proofs are shorter, unless the index
//!   only parts ways with the written leaves at the leaf level.
//!
//! A sparse proof can be compressed into a bitvector of absent siblings plus
//! the present ones, and that compressed form encoded to bytes.

use bitvec::order::Lsb0;
use bitvec::vec::BitVec;

use crate::{
    hash, hash_pair, Hash, LeafIndex, Sum, TreeError, EMPTY_HASH, HASH_SIZE, TREE_DEPTH,
};

/// Position of a node relative to its sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Wire tag of a proof step whose sibling sits on this side.
    pub fn tag(self) -> u8 {
        match self {
            Self::Right => 0,
            Self::Left => 1,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = TreeError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Right),
            1 => Ok(Self::Left),
            _ => Err(TreeError::InvalidEncoding("unknown side tag")),
        }
    }
}

/// One level of a [`Proof`]: the sibling's hash and the side it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofStep {
    pub side: Side,
    pub hash: Hash,
}

impl ProofStep {
    pub const ENCODED_LEN: usize = 1 + HASH_SIZE;

    pub fn new(side: Side, hash: Hash) -> Self {
        Self { side, hash }
    }

    /// Hashes `current` together with the sibling, in tree order.
    pub fn apply(&self, current: &Hash) -> Hash {
        match self.side {
            Side::Right => hash_pair(current, &self.hash),
            Side::Left => hash_pair(&self.hash, current),
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut bytes = [0; Self::ENCODED_LEN];
        bytes[0] = self.side.tag();
        bytes[1..].copy_from_slice(&self.hash);
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, TreeError> {
        let (tag, hash) = bytes
            .split_first()
            .ok_or(TreeError::InvalidEncoding("truncated proof step"))?;
        let hash = hash
            .try_into()
            .map_err(|_| TreeError::InvalidEncoding("truncated proof step"))?;
        Ok(Self::new(Side::try_from(*tag)?, hash))
    }
}

/// An inclusion proof for a [`crate::MerkleTree`] leaf, ordered from the leaf up to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proof {
    steps: Vec<ProofStep>,
}

impl Proof {
    pub fn new(steps: Vec<ProofStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Root hash implied by this proof for a leaf holding `data`.
    pub fn root(&self, data: &[u8]) -> Hash {
        self.steps
            .iter()
            .fold(hash(data), |current, step| step.apply(&current))
    }

    /// Checks that `data` is a leaf of the tree whose root hash is `root_hash`.
    pub fn verify(&self, data: &[u8], root_hash: &Hash) -> bool {
        &self.root(data) == root_hash
    }

    /// Encodes the proof as a sequence of `side tag || sibling hash`.
    pub fn encode(&self) -> Vec<u8> {
        self.steps.iter().flat_map(|step| step.to_bytes()).collect()
    }

    pub fn decode(data: &[u8]) -> Result<Self, TreeError> {
        if data.len() % ProofStep::ENCODED_LEN != 0 {
            return Err(TreeError::InvalidEncoding("trailing bytes"));
        }
        data.chunks_exact(ProofStep::ENCODED_LEN)
            .map(ProofStep::from_bytes)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

/// Verifies a [`Proof`] for `data` against `root_hash`.
pub fn verify_proof(data: &[u8], proof: &Proof, root_hash: &Hash) -> bool {
    proof.verify(data, root_hash)
}

/// An inclusion proof for a [`crate::MerkleSumTree`] leaf: the hash path plus,
/// for every step, the sum of the sibling subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SumProof {
    proof: Proof,
    sums: Vec<Sum>,
}

impl SumProof {
    const ENCODED_STEP_LEN: usize = ProofStep::ENCODED_LEN + 8;

    pub fn new(proof: Proof, sums: Vec<Sum>) -> Self {
        Self { proof, sums }
    }

    pub fn proof(&self) -> &Proof {
        &self.proof
    }

    /// Sibling sums, in the same order as the proof steps.
    pub fn sums(&self) -> &[Sum] {
        &self.sums
    }

    pub fn len(&self) -> usize {
        self.proof.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proof.is_empty()
    }

    /// Checks that a leaf holding `data` with weight `weight` belongs to the
    /// tree with root `root_hash` and total `root_sum`.
    pub fn verify(&self, data: &[u8], weight: Sum, root_hash: &Hash, root_sum: Sum) -> bool {
        verify_sum_proof(data, weight, &self.proof, &self.sums, root_hash, root_sum)
    }

    /// Encodes every step as `side tag || sibling hash || sibling sum (u64 BE)`.
    pub fn encode(&self) -> Vec<u8> {
        self.proof
            .steps()
            .iter()
            .zip(&self.sums)
            .flat_map(|(step, sum)| {
                step.to_bytes()
                    .into_iter()
                    .chain(sum.to_be_bytes())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn decode(data: &[u8]) -> Result<Self, TreeError> {
        if data.len() % Self::ENCODED_STEP_LEN != 0 {
            return Err(TreeError::InvalidEncoding("trailing bytes"));
        }
        let mut steps = Vec::with_capacity(data.len() / Self::ENCODED_STEP_LEN);
        let mut sums = Vec::with_capacity(data.len() / Self::ENCODED_STEP_LEN);
        for chunk in data.chunks_exact(Self::ENCODED_STEP_LEN) {
            let (step, sum) = chunk.split_at(ProofStep::ENCODED_LEN);
            steps.push(ProofStep::from_bytes(step)?);
            sums.push(Sum::from_be_bytes(sum.try_into().map_err(|_| {
                TreeError::InvalidEncoding("truncated sum")
            })?));
        }
        Ok(Self::new(Proof::new(steps), sums))
    }
}

/// Verifies a sum tree inclusion proof.
///
/// Both the recomputed root hash must equal `root_hash` and
/// `weight + Σ sibling_sums` must equal `root_sum`.
pub fn verify_sum_proof(
    data: &[u8],
    weight: Sum,
    proof: &Proof,
    sibling_sums: &[Sum],
    root_hash: &Hash,
    root_sum: Sum,
) -> bool {
    if sibling_sums.len() != proof.len() {
        return false;
    }
    let computed_sum = sibling_sums
        .iter()
        .try_fold(weight, |total, sum| total.checked_add(*sum));
    proof.verify(data, root_hash) && computed_sum == Some(root_sum)
}

/// A proof for a [`crate::SparseMerkleTree`] index, ordered from the deepest
/// level up to the root. `None` entries are siblings that were never written
/// and stand for [`EMPTY_HASH`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseProof {
    siblings: Vec<Option<Hash>>,
}

impl SparseProof {
    pub fn new(siblings: Vec<Option<Hash>>) -> Self {
        Self { siblings }
    }

    pub fn siblings(&self) -> &[Option<Hash>] {
        &self.siblings
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Whether the proof reaches all the way down to a leaf.
    pub fn is_full(&self) -> bool {
        self.siblings.len() == TREE_DEPTH
    }

    /// Checks that `data` was written at `index` in the tree with root `root_hash`.
    pub fn verify(&self, data: &[u8], index: &LeafIndex, root_hash: &Hash) -> bool {
        self.is_full() && &walk_up(hash(data), index, 0, &self.siblings) == root_hash
    }

    /// Checks that nothing was ever written at `index` in the tree with root
    /// `root_hash`.
    ///
    /// The folding starts from [`EMPTY_HASH`] at depth `TREE_DEPTH - len`: the
    /// proof length is what tells where the written paths and `index` part ways.
    pub fn verify_non_existence(&self, index: &LeafIndex, root_hash: &Hash) -> bool {
        let Some(start_depth) = TREE_DEPTH.checked_sub(self.siblings.len()) else {
            return false;
        };
        &walk_up(EMPTY_HASH, index, start_depth, &self.siblings) == root_hash
    }

    /// Compresses the proof by dropping the absent siblings.
    pub fn compress(&self) -> CompressedSparseProof {
        let mut absent = BitVec::with_capacity(self.siblings.len());
        let mut hashes = Vec::new();
        for sibling in &self.siblings {
            match sibling {
                Some(hash) => {
                    absent.push(false);
                    hashes.push(*hash);
                }
                None => absent.push(true),
            }
        }
        CompressedSparseProof::new(hashes, absent)
    }
}

/// Hashes `current`, sitting at `start_depth` on the path to `index`, up to the
/// root using `siblings`.
fn walk_up(
    mut current: Hash,
    index: &LeafIndex,
    start_depth: usize,
    siblings: &[Option<Hash>],
) -> Hash {
    for (depth, sibling) in (start_depth..).zip(siblings) {
        let sibling = sibling.unwrap_or(EMPTY_HASH);
        current = if index.bit(depth) == 0 {
            hash_pair(&current, &sibling)
        } else {
            hash_pair(&sibling, &current)
        };
    }
    current
}

/// Verifies that `data` was written at `index`. Only full-depth proofs are accepted.
pub fn verify_sparse_proof(
    data: &[u8],
    index: &LeafIndex,
    proof: &SparseProof,
    root_hash: &Hash,
) -> bool {
    proof.verify(data, index, root_hash)
}

/// Verifies that nothing was ever written at `index`.
pub fn verify_sparse_non_existence(
    index: &LeafIndex,
    proof: &SparseProof,
    root_hash: &Hash,
) -> bool {
    proof.verify_non_existence(index, root_hash)
}

/// A compressed sparse proof. Absent siblings are only recorded in a bitvector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedSparseProof {
    hashes: Vec<Hash>,
    absent: BitVec<u8, Lsb0>,
}

impl CompressedSparseProof {
    pub fn new(hashes: Vec<Hash>, absent: BitVec<u8, Lsb0>) -> Self {
        Self { hashes, absent }
    }

    /// Decompresses the proof into a proof.
    pub fn decompress(&self) -> Result<SparseProof, TreeError> {
        if self.absent.len() > TREE_DEPTH {
            return Err(TreeError::InvalidEncoding("proof deeper than the tree"));
        }
        if self.hashes.len() != self.absent.count_zeros() {
            return Err(TreeError::InvalidEncoding(
                "sibling count does not match the absent bitmap",
            ));
        }
        let mut hashes = self.hashes.iter();
        let siblings = self
            .absent
            .iter()
            .map(|absent| if *absent { None } else { hashes.next().copied() })
            .collect();
        Ok(SparseProof::new(siblings))
    }

    /// Encodes the proof as `entry count (u16 BE) || absent bitmap || hashes`.
    ///
    /// The padding bits of the bitmap are zero. Fails if the proof holds more
    /// than [`TREE_DEPTH`] entries.
    pub fn encode(&self) -> Result<Vec<u8>, TreeError> {
        if self.absent.len() > TREE_DEPTH {
            return Err(TreeError::InvalidEncoding("proof deeper than the tree"));
        }
        let mut encoded = Vec::with_capacity(
            2 + self.absent.len().div_ceil(8) + self.hashes.len() * HASH_SIZE,
        );
        encoded.extend_from_slice(&(self.absent.len() as u16).to_be_bytes());
        let mut bitmap = self.absent.clone();
        bitmap.set_uninitialized(false);
        encoded.extend_from_slice(bitmap.as_raw_slice());
        for hash in &self.hashes {
            encoded.extend_from_slice(hash);
        }
        Ok(encoded)
    }

    /// Decodes a proof from a byte vector.
    pub fn decode(data: &[u8]) -> Result<Self, TreeError> {
        let (len, rest) = data
            .split_first_chunk::<2>()
            .ok_or(TreeError::InvalidEncoding("missing entry count"))?;
        let len = u16::from_be_bytes(*len) as usize;
        if len > TREE_DEPTH {
            return Err(TreeError::InvalidEncoding("proof deeper than the tree"));
        }
        let bitmap_len = len.div_ceil(8);
        if rest.len() < bitmap_len {
            return Err(TreeError::InvalidEncoding("truncated absent bitmap"));
        }
        let (bitmap, rest) = rest.split_at(bitmap_len);
        let mut absent = BitVec::<u8, Lsb0>::from_slice(bitmap);
        if absent[len..].any() {
            return Err(TreeError::InvalidEncoding("padding bits set in absent bitmap"));
        }
        absent.truncate(len);
        if rest.len() != absent.count_zeros() * HASH_SIZE {
            return Err(TreeError::InvalidEncoding(
                "sibling count does not match the absent bitmap",
            ));
        }
        let hashes = rest
            .chunks_exact(HASH_SIZE)
            .map(|chunk| {
                chunk
                    .try_into()
                    .map_err(|_| TreeError::InvalidEncoding("truncated sibling hash"))
            })
            .collect::<Result<Vec<Hash>, _>>()?;
        Ok(Self::new(hashes, absent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MerkleSumTree, MerkleTree, SparseMerkleTree};

    fn sparse_tree() -> SparseMerkleTree {
        let mut tree = SparseMerkleTree::new();
        for (index, data) in [b"a", b"b", b"c", b"d"].iter().enumerate() {
            tree.update(&LeafIndex::from(index as u64), *data);
        }
        tree
    }

    #[test]
    fn test_side_tags() {
        assert_eq!(Side::Right.tag(), 0);
        assert_eq!(Side::Left.tag(), 1);
        assert_eq!(Side::try_from(0).unwrap(), Side::Right);
        assert_eq!(Side::try_from(1).unwrap(), Side::Left);
        assert_eq!(
            Side::try_from(2).unwrap_err(),
            TreeError::InvalidEncoding("unknown side tag")
        );
        assert_eq!(Side::Left.opposite(), Side::Right);
    }

    #[test]
    fn test_proof_step_apply() {
        let current = hash(b"a");
        let sibling = hash(b"b");
        assert_eq!(
            ProofStep::new(Side::Right, sibling).apply(&current),
            hash_pair(&current, &sibling)
        );
        assert_eq!(
            ProofStep::new(Side::Left, sibling).apply(&current),
            hash_pair(&sibling, &current)
        );
    }

    #[test]
    fn test_proof_encode_decode() {
        let tree = MerkleTree::new([b"a", b"b", b"c", b"d"]).unwrap();
        let proof = tree.generate_proof(b"c").unwrap();
        let encoded = proof.encode();
        assert_eq!(encoded.len(), 2 * ProofStep::ENCODED_LEN);
        // "c" is a left child, then its parent is a right child
        assert_eq!(encoded[0], 0);
        assert_eq!(encoded[ProofStep::ENCODED_LEN], 1);
        assert_eq!(Proof::decode(&encoded).unwrap(), proof);
    }

    #[test]
    fn test_proof_decode_malformed() {
        assert_eq!(Proof::decode(&[]).unwrap(), Proof::default());
        assert_eq!(
            Proof::decode(&[0; ProofStep::ENCODED_LEN + 1]).unwrap_err(),
            TreeError::InvalidEncoding("trailing bytes")
        );
        let mut bytes = [0; ProofStep::ENCODED_LEN];
        bytes[0] = 7;
        assert_eq!(
            Proof::decode(&bytes).unwrap_err(),
            TreeError::InvalidEncoding("unknown side tag")
        );
    }

    #[test]
    fn test_sum_proof_encode_decode() {
        let tree = MerkleSumTree::new([b"a", b"b", b"c", b"d"], &[1, 2, 3, 4]).unwrap();
        let proof = tree.generate_proof(b"a").unwrap();
        let encoded = proof.encode();
        assert_eq!(encoded.len(), 2 * (ProofStep::ENCODED_LEN + 8));
        let decoded = SumProof::decode(&encoded).unwrap();
        assert_eq!(decoded, proof);
        assert_eq!(decoded.sums(), &[2, 7]);
        assert!(decoded.verify(b"a", 1, &tree.root_hash(), tree.root_sum()));
        assert!(SumProof::decode(&encoded[1..]).is_err());
    }

    #[test]
    fn test_verify_sum_proof_mismatched_sums() {
        let tree = MerkleSumTree::new([b"a", b"b", b"c", b"d"], &[1, 2, 3, 4]).unwrap();
        let proof = tree.generate_proof(b"a").unwrap();
        assert!(!verify_sum_proof(
            b"a",
            1,
            proof.proof(),
            &proof.sums()[..1],
            &tree.root_hash(),
            tree.root_sum()
        ));
        assert!(!verify_sum_proof(
            b"a",
            u64::MAX,
            proof.proof(),
            proof.sums(),
            &tree.root_hash(),
            tree.root_sum()
        ));
    }

    #[test]
    fn test_sparse_proof_compress() {
        let tree = sparse_tree();
        let proof = tree.generate_proof(&LeafIndex::from(1u64));
        let compressed = proof.compress();
        // only the two lowest levels have written siblings
        assert_eq!(compressed.hashes.len(), 2);
        assert_eq!(compressed.absent.len(), TREE_DEPTH);
        assert_eq!(compressed.decompress().unwrap(), proof);
    }

    #[test]
    fn test_compressed_sparse_proof_encode_decode() {
        let tree = sparse_tree();
        for index in [1u64, 3, 12312] {
            let proof = tree.generate_proof(&LeafIndex::from(index));
            let encoded = proof.compress().encode().unwrap();
            let decoded = CompressedSparseProof::decode(&encoded).unwrap();
            assert_eq!(decoded.decompress().unwrap(), proof);
        }

        let encoded = tree
            .generate_proof(&LeafIndex::from(3u64))
            .compress()
            .encode()
            .unwrap();
        assert_eq!(u16::from_be_bytes([encoded[0], encoded[1]]), 256);
        assert_eq!(encoded.len(), 2 + 32 + 2 * HASH_SIZE);
    }

    #[test]
    fn test_compressed_sparse_proof_decode_malformed() {
        assert!(CompressedSparseProof::decode(&[]).is_err());
        assert!(CompressedSparseProof::decode(&[0x01]).is_err());
        // 257 entries is deeper than the tree
        assert!(CompressedSparseProof::decode(&[0x01, 0x01]).is_err());
        // one present entry announced, no hash supplied
        assert!(CompressedSparseProof::decode(&[0x00, 0x01, 0x00]).is_err());
        // one absent entry, then a stray hash
        let mut bytes = vec![0x00, 0x01, 0x01];
        bytes.extend_from_slice(&[0; HASH_SIZE]);
        assert!(CompressedSparseProof::decode(&bytes).is_err());
        assert_eq!(
            CompressedSparseProof::decode(&[0x00, 0x01, 0x01])
                .unwrap()
                .decompress()
                .unwrap(),
            SparseProof::new(vec![None])
        );

        let mut absent = BitVec::<u8, Lsb0>::new();
        absent.push(false);
        assert!(CompressedSparseProof::new(Vec::new(), absent)
            .decompress()
            .is_err());
    }

    #[test]
    fn test_compressed_sparse_proof_too_deep() {
        // the entry count would not survive the u16 prefix
        let absent = BitVec::<u8, Lsb0>::repeat(true, 65537);
        assert_eq!(
            CompressedSparseProof::new(Vec::new(), absent).encode(),
            Err(TreeError::InvalidEncoding("proof deeper than the tree"))
        );
        let absent = BitVec::<u8, Lsb0>::repeat(true, TREE_DEPTH + 1);
        assert!(CompressedSparseProof::new(Vec::new(), absent)
            .encode()
            .is_err());

        let compressed = SparseProof::new(vec![None; TREE_DEPTH]).compress();
        let decoded = CompressedSparseProof::decode(&compressed.encode().unwrap()).unwrap();
        assert_eq!(decoded, compressed);
    }

    #[test]
    fn test_compressed_sparse_proof_padding_bits() {
        assert!(CompressedSparseProof::decode(&[0x00, 0x01, 0x01]).is_ok());
        assert_eq!(
            CompressedSparseProof::decode(&[0x00, 0x01, 0xFF]).unwrap_err(),
            TreeError::InvalidEncoding("padding bits set in absent bitmap")
        );
        assert!(CompressedSparseProof::decode(&[0x00, 0x09, 0xFF, 0x01]).is_ok());
        assert!(CompressedSparseProof::decode(&[0x00, 0x09, 0xFF, 0x03]).is_err());

        // encoding a proof whose length is not a multiple of 8 leaves the padding clear
        let proof = SparseProof::new(vec![None, None, None]);
        let encoded = proof.compress().encode().unwrap();
        assert_eq!(encoded, vec![0x00, 0x03, 0x07]);
        assert_eq!(
            CompressedSparseProof::decode(&encoded)
                .unwrap()
                .decompress()
                .unwrap(),
            proof
        );
    }

    #[test]
    fn test_sparse_verify_wrong_length() {
        let tree = sparse_tree();
        let proof = tree.generate_proof(&LeafIndex::from(1u64));
        let truncated = SparseProof::new(proof.siblings()[1..].to_vec());
        assert!(!truncated.verify(b"b", &LeafIndex::from(1u64), &tree.root_hash()));
        let too_long = SparseProof::new(vec![None; TREE_DEPTH + 1]);
        assert!(!too_long.verify(b"b", &LeafIndex::from(1u64), &tree.root_hash()));
        assert!(!too_long.verify_non_existence(&LeafIndex::from(1u64), &tree.root_hash()));
    }
}
