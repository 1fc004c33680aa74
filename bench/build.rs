use criterion::{criterion_group, criterion_main, Criterion};
use merkle_suite::{LeafIndex, MerkleSumTree, MerkleTree, SparseMerkleTree};

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

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tree Construction");

    let leaves: Vec<_> = (0..1000).map(|_| generate_random_leaf()).collect();
    let weights: Vec<_> = (0..1000).map(|_| rand::random::<u32>() as u64).collect();

    group.bench_function("Merkle Tree", |b| {
        b.iter(|| MerkleTree::new(&leaves).unwrap())
    });

    group.bench_function("Merkle Sum Tree", |b| {
        b.iter(|| MerkleSumTree::new(&leaves, &weights).unwrap())
    });

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tree Update");

    // 100 random writes, each rehashing a full path of the sparse tree
    group.bench_function("Sparse Merkle Tree", |b| {
        b.iter(|| {
            let mut tree = SparseMerkleTree::new();
            for _ in 0..100 {
                tree.update(&generate_random_index(), &generate_random_leaf());
            }
        })
    });

    let leaves: Vec<_> = (0..1000).map(|_| generate_random_leaf()).collect();
    let mut tree = MerkleTree::new(&leaves).unwrap();
    group.bench_function("Merkle Tree", |b| {
        b.iter(|| {
            // swap the last leaf back and forth
            tree.update(&leaves[999], b"updated").unwrap();
            tree.update(b"updated", &leaves[999]).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_update);
criterion_main!(benches);
