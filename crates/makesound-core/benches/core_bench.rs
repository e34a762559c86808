//! Criterion benchmarks for makesound-core primitives
//!
//! Run with: cargo bench -p makesound-core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use makesound_core::{DelayLine, LinearSmoothedParam};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn bench_delay_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("DelayLine");

    for &block_size in BLOCK_SIZES {
        let mut delay = DelayLine::from_time(SAMPLE_RATE, 1.0).unwrap();
        delay.retune((0.5 * SAMPLE_RATE) as usize).unwrap();

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, &size| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for i in 0..size {
                        sum += delay.process(black_box(i as f32 * 1e-3));
                    }
                    black_box(sum)
                })
            },
        );
    }

    group.finish();
}

fn bench_linear_ramp(c: &mut Criterion) {
    let mut group = c.benchmark_group("LinearSmoothedParam");

    for &block_size in BLOCK_SIZES {
        let mut param = LinearSmoothedParam::with_config(0.0, SAMPLE_RATE, 1.0);

        group.bench_with_input(
            BenchmarkId::new("advance", block_size),
            &block_size,
            |b, &size| {
                b.iter(|| {
                    param.set_target(black_box(0.8));
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        sum += param.advance();
                    }
                    black_box(sum)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_delay_line, bench_linear_ramp);
criterion_main!(benches);
