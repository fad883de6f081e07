use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};
use numbrette::{trace, Mask};
use bitvec::vec::BitVec;

fn mask_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Mask {
    let mut bits = BitVec::new();
    for y in 0..height {
        for x in 0..width {
            bits.push(f(x, y));
        }
    }
    Mask::new(bits, width, height).unwrap()
}

/// Concentric square rings: many nested shell/hole pairs.
fn rings(size: u32) -> Mask {
    mask_from_fn(size, size, |x, y| {
        let border = x.min(y).min(size - 1 - x).min(size - 1 - y);
        (border / 4) % 2 == 0
    })
}

/// Scattered blobs: many small independent components.
fn blobs(size: u32) -> Mask {
    mask_from_fn(size, size, |x, y| (x / 7 + y / 5) % 3 == 0)
}

fn bench(c: &mut Criterion, group: &str, masks: &[(u32, Mask)]) {
    let mut group = c.benchmark_group(group);
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(3));

    for (size, mask) in masks {
        group.bench_with_input(BenchmarkId::from_parameter(size), mask, |b, mask| {
            b.iter(|| trace::trace(mask));
        });
    }
}

fn trace_rings(c: &mut Criterion) {
    let masks = [256, 512, 1024].map(|size| (size, rings(size)));
    bench(c, "trace_rings", &masks);
}

fn trace_blobs(c: &mut Criterion) {
    let masks = [256, 512, 1024].map(|size| (size, blobs(size)));
    bench(c, "trace_blobs", &masks);
}

criterion_group!(benches, trace_rings, trace_blobs);
criterion_main!(benches);
