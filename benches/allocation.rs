use criterion::{black_box, criterion_group, criterion_main, Criterion};

use electoral_sim::{
    dhondt_allocation, droop_quota_allocation, hare_quota_allocation, sainte_lague_allocation,
};

fn bench_allocation(c: &mut Criterion) {
    // A realistic multi-party vote distribution with a long tail.
    let votes: Vec<u64> = vec![
        12_400_000, 9_800_000, 4_100_000, 3_600_000, 2_900_000, 1_700_000, 900_000, 400_000,
    ];
    let n_seats = 543;

    c.bench_function("dhondt_543_seats", |b| {
        b.iter(|| dhondt_allocation(black_box(&votes), black_box(n_seats)))
    });
    c.bench_function("sainte_lague_543_seats", |b| {
        b.iter(|| sainte_lague_allocation(black_box(&votes), black_box(n_seats)))
    });
    c.bench_function("hare_543_seats", |b| {
        b.iter(|| hare_quota_allocation(black_box(&votes), black_box(n_seats)))
    });
    c.bench_function("droop_543_seats", |b| {
        b.iter(|| droop_quota_allocation(black_box(&votes), black_box(n_seats)))
    });
}

criterion_group!(benches, bench_allocation);
criterion_main!(benches);
