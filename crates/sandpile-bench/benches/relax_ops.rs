//! Criterion benchmarks for full relaxation of seeded grids.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use sandpile_engine::{FillPolicy, Sandpile};
use sandpile_test_utils::seeded_cells;

fn bench_relax_uniform_64(c: &mut Criterion) {
    let cells = seeded_cells(64, 64, 10, 42);

    c.bench_function("relax_uniform_64x64", |b| {
        b.iter(|| {
            let mut pile = Sandpile::new(64, 64, FillPolicy::Seeded(cells.clone())).unwrap();
            while !pile.stable() {
                black_box(pile.relax());
            }
        });
    });
}

fn bench_relax_point_source(c: &mut Criterion) {
    let mut cells = vec![0u32; 65 * 65];
    cells[32 * 65 + 32] = 4096;

    c.bench_function("relax_point_source_4096", |b| {
        b.iter(|| {
            let mut pile = Sandpile::new(65, 65, FillPolicy::Seeded(cells.clone())).unwrap();
            black_box(pile.relax());
        });
    });
}

criterion_group!(benches, bench_relax_uniform_64, bench_relax_point_source);
criterion_main!(benches);
