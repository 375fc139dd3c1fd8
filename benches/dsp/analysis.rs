//! Benchmarks for analyser frames.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sound_kit::dsp::analysis::Analysis;

pub fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/analysis");

    for fft_size in [256usize, 2048] {
        let mut analysis = Analysis::new(fft_size);
        for i in 0..fft_size {
            analysis.push((i as f32 * 0.1).sin());
        }
        let mut bytes = vec![0u8; analysis.bin_count()];

        group.bench_with_input(BenchmarkId::new("time", fft_size), &fft_size, |b, _| {
            b.iter(|| analysis.time_bytes(black_box(&mut bytes)))
        });
        group.bench_with_input(
            BenchmarkId::new("frequency", fft_size),
            &fft_size,
            |b, _| b.iter(|| analysis.frequency_bytes(black_box(&mut bytes))),
        );
    }

    group.finish();
}
