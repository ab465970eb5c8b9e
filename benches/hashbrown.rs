use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fxhash::FxBuildHasher;
use hashbrown::HashMap;

const SIZES: [u64; 5] = [8, 64, 512, 4096, 32768];

fn map_of(numel: u64) -> HashMap<u64, u64, FxBuildHasher> {
    let mut map = HashMap::with_hasher(FxBuildHasher::default());

    for i in 0..numel {
        map.insert(i, i);
    }

    map
}

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("hashbrown/fxhash: insertion");

    for &numel in SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(numel), &numel, |b, &numel| {
            let mut map = map_of(numel);

            b.iter(|| map.insert(criterion::black_box(numel + 1), numel + 1))
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("hashbrown/fxhash: lookup");

    for &numel in SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(numel), &numel, |b, &numel| {
            let map = map_of(numel);
            let mut key = 0;

            b.iter(|| {
                key = (key + 1) % numel;
                map.get(&criterion::black_box(key)).copied()
            })
        });
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("hashbrown/fxhash: remove and reinsert");

    for &numel in SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(numel), &numel, |b, &numel| {
            let mut map = map_of(numel);
            let mut key = 0;

            b.iter(|| {
                key = (key + 1) % numel;
                map.remove(&criterion::black_box(key));
                map.insert(key, key)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insertion, bench_lookup, bench_churn);
criterion_main!(benches);
