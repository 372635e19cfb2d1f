use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rangeset::RangeSet;

const SPREAD: u64 = 1 << 40;

fn random_set(rng: &mut StdRng, ranges: usize) -> RangeSet {
    let mut set = RangeSet::new();
    for _ in 0..ranges {
        let first = rng.random_range(0..SPREAD);
        let last = first + rng.random_range(1..1024);
        set.insert(first, last);
    }
    set
}

fn inserts(rng: &mut StdRng, n: usize) -> RangeSet {
    let mut set = RangeSet::new();
    for _ in 0..n {
        let first = rng.random_range(0..SPREAD);
        set.insert(first, first + 64);
    }
    set
}

pub fn criterion_benchmark(c: &mut Criterion) {
    for &n in &[100, 1000, 10000] {
        let name = format!("insert-{}", n);
        c.bench_function(&name, |bench| {
            let mut rng = StdRng::seed_from_u64(79837224973);
            bench.iter(|| inserts(&mut rng, black_box(n)))
        });
    }

    let mut rng = StdRng::seed_from_u64(79837224973);
    let a = random_set(&mut rng, 1000);
    let b = random_set(&mut rng, 1000);
    c.bench_function("intersection-1000", |bench| {
        bench.iter(|| black_box(&a).intersection(black_box(&b)))
    });
    c.bench_function("union-1000", |bench| {
        bench.iter(|| black_box(&a).union(black_box(&b)))
    });
    c.bench_function("symmetric-difference-1000", |bench| {
        bench.iter(|| black_box(&a).symmetric_difference(black_box(&b)))
    });
}

criterion_group!(benches, criterion_benchmark);

criterion_main!(benches);
