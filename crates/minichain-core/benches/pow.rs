use criterion::{criterion_group, criterion_main, Criterion};
use minichain_core::{block_digest, Hash};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

fn bench_pow(c: &mut Criterion) {
    c.bench_function("block_digest_with_prev", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        let prev = Hash::from(rng.gen::<[u8; 32]>());
        let amount = rng.gen_range(-500..500);
        let mut nonce = 0u64;
        b.iter(|| {
            nonce = nonce.wrapping_add(1);
            black_box(block_digest(1, amount, Some(&prev), nonce))
        });
    });

    c.bench_function("digest_and_validity_test", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        let amount = rng.gen_range(-500..500);
        let mut nonce = 0u64;
        b.iter(|| {
            nonce = nonce.wrapping_add(1);
            black_box(block_digest(0, amount, None, nonce).is_valid())
        });
    });
}

criterion_group!(benches, bench_pow);
criterion_main!(benches);
