use primcoll::{BitsList, PrimitiveMap};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const SIZES: [u64; 5] = [8, 64, 512, 4096, 32768];

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("primcoll: insertion");

    for &numel in SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(numel), &numel, |b, &numel| {
            let mut map = PrimitiveMap::new();

            for i in 0..numel {
                map.insert(i, i);
            }

            b.iter(|| map.insert(criterion::black_box(numel + 1), numel + 1))
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("primcoll: token lookup");

    for &numel in SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(numel), &numel, |b, &numel| {
            let map: PrimitiveMap<u64, u64> = (0..numel).map(|i| (i, i)).collect();
            let mut key = 0;

            b.iter(|| {
                key = (key + 1) % numel;
                map.value(map.token(criterion::black_box(key))).copied()
            })
        });
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("primcoll: remove and reinsert");

    for &numel in SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(numel), &numel, |b, &numel| {
            let mut map: PrimitiveMap<u64, u64> = (0..numel).map(|i| (i, i)).collect();
            let mut key = 0;

            b.iter(|| {
                key = (key + 1) % numel;
                map.remove(criterion::black_box(key));
                map.put(key, key)
            })
        });
    }

    group.finish();
}

fn bench_bits_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("primcoll: 7-bit list");

    for &numel in SIZES.iter() {
        group.bench_with_input(BenchmarkId::new("append", numel), &numel, |b, &numel| {
            b.iter(|| {
                let mut list = BitsList::new(7);

                for i in 0..numel {
                    list.add(criterion::black_box(i));
                }

                list
            })
        });

        group.bench_with_input(BenchmarkId::new("insert front", numel), &numel, |b, &numel| {
            let mut list = BitsList::from_values(7, 0..numel);

            b.iter(|| {
                list.insert(0, criterion::black_box(5));
                list.remove_at(0)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insertion,
    bench_lookup,
    bench_churn,
    bench_bits_list,
);
criterion_main!(benches);
