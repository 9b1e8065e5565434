// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_extent::Extent;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A jagged profile of `runs` runs, roughly one in eight unconstrained.
fn gen_profile(rng: &mut Rng, runs: usize) -> Extent {
    let mut e = Extent::new();
    for _ in 0..runs {
        let length = 1.0 + rng.next_f64() * 20.0;
        let size = if rng.next_u64() % 8 == 0 {
            f64::NAN
        } else {
            rng.next_f64() * 100.0
        };
        e.append_ls(length, size).unwrap();
    }
    e
}

fn bench_separation(c: &mut Criterion) {
    let mut group = c.benchmark_group("extent_separation");
    for &runs in &[4_usize, 64, 1024] {
        let mut rng = Rng::new(0x5eed_0001 ^ runs as u64);
        let a = gen_profile(&mut rng, runs);
        let b = gen_profile(&mut rng, runs);
        group.throughput(Throughput::Elements((a.num_bounds() + b.num_bounds()) as u64));
        group.bench_function(format!("allowed_{runs}"), |bencher| {
            bencher.iter(|| black_box(a.separation(&b, 7.5, true, 1.0).unwrap()));
        });
        group.bench_function(format!("prevented_scaled_{runs}"), |bencher| {
            bencher.iter(|| black_box(a.separation(&b, -12.0, false, 0.5).unwrap()));
        });
    }
    group.finish();
}

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("extent_combine");
    for &runs in &[4_usize, 64, 1024] {
        let mut rng = Rng::new(0x5eed_0002 ^ runs as u64);
        let a = gen_profile(&mut rng, runs);
        let b = gen_profile(&mut rng, runs);
        group.throughput(Throughput::Elements((a.num_bounds() + b.num_bounds()) as u64));
        group.bench_function(format!("combined_{runs}"), |bencher| {
            bencher.iter(|| black_box(a.combined_extent(&b, 30.0, -4.0, 1.0).unwrap()));
        });
        group.bench_function(format!("combine_in_place_{runs}"), |bencher| {
            bencher.iter_batched(
                || a.clone(),
                |mut target| {
                    target.combine_extent(&b, -30.0, 4.0, 2.0).unwrap();
                    black_box(target)
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("simplify_{runs}"), |bencher| {
            bencher.iter_batched(
                || a.clone(),
                |mut target| {
                    target.simplify();
                    black_box(target)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_separation, bench_combine);
criterion_main!(benches);
