use criterion::{black_box, criterion_group, criterion_main, Criterion};
use merkle_suite::{
    verify_proof, verify_sparse_non_existence, verify_sparse_proof, LeafIndex, MerkleTree,
    SparseMerkleTree,
};

pub fn generate_random_index() -> LeafIndex {
    let mut index = [0u8; 32];
    for byte in index.iter_mut() {
        *byte = rand::random();
    }
    LeafIndex::from(index)
}

pub fn generate_random_leaf() -> Vec<u8> {
    let mut value = Vec::with_capacity(32);
    for _ in 0..32 {
        value.push(rand::random());
    }
    value
}

fn setup_sparse_tree(num_leaves: usize) -> (SparseMerkleTree, Vec<(LeafIndex, Vec<u8>)>) {
    let mut tree = SparseMerkleTree::new();
    let mut written = Vec::with_capacity(num_leaves);
    for _ in 0..num_leaves {
        let index = generate_random_index();
        let leaf = generate_random_leaf();
        tree.update(&index, &leaf);
        written.push((index, leaf));
    }
    (tree, written)
}

fn bench_proof_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Proof Generation");

    let leaves: Vec<_> = (0..100).map(|_| generate_random_leaf()).collect();
    let tree = MerkleTree::new(&leaves).unwrap();
    group.bench_function("Merkle Tree", |b| {
        b.iter(|| {
            for leaf in &leaves {
                black_box(tree.generate_proof(leaf)).unwrap();
            }
        })
    });

    let (sparse_tree, written) = setup_sparse_tree(100);
    group.bench_function("Sparse Merkle Tree", |b| {
        b.iter(|| {
            for (index, _) in &written {
                black_box(sparse_tree.generate_proof(index));
            }
        })
    });

    group.finish();
}

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("Proof Verification");

    let leaves: Vec<_> = (0..100).map(|_| generate_random_leaf()).collect();
    let tree = MerkleTree::new(&leaves).unwrap();
    let root_hash = tree.root_hash();
    let proofs: Vec<_> = leaves
        .iter()
        .map(|leaf| (leaf, tree.generate_proof(leaf).unwrap()))
        .collect();
    group.bench_function("Merkle Tree", |b| {
        b.iter(|| {
            for (leaf, proof) in &proofs {
                assert!(verify_proof(leaf, proof, &root_hash));
            }
        })
    });

    let (sparse_tree, written) = setup_sparse_tree(100);
    let root_hash = sparse_tree.root_hash();
    let proofs: Vec<_> = written
        .iter()
        .map(|(index, leaf)| (index, leaf, sparse_tree.generate_proof(index)))
        .collect();
    group.bench_function("Sparse Merkle Tree", |b| {
        b.iter(|| {
            for (index, leaf, proof) in &proofs {
                assert!(verify_sparse_proof(leaf, index, proof, &root_hash));
            }
        })
    });

    let absent: Vec<_> = (0..100)
        .map(|_| {
            let index = generate_random_index();
            let proof = sparse_tree.generate_proof(&index);
            (index, proof)
        })
        .collect();
    group.bench_function("Sparse Merkle Tree Non-Existence", |b| {
        b.iter(|| {
            for (index, proof) in &absent {
                assert!(verify_sparse_non_existence(index, proof, &root_hash));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_proof_generation, bench_proof_verification);
criterion_main!(benches);
