//! Benchmarks for partitioned convolution.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sound_kit::dsp::convolution::{PartitionedConvolver, PARTITION_SIZE};

use crate::BLOCK_SIZES;

pub fn bench_convolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/convolution");
    let sample_rate = 48_000.0f32;

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| {
                if i < 10 {
                    1.0 - (i as f32 / 10.0)
                } else {
                    (i as f32 * 0.05).sin() * 0.1
                }
            })
            .collect();

        // Decaying noise-like tails of a small and a large room
        for (name, seconds) in [("small_room", 0.3f32), ("large_room", 2.0f32)] {
            let frames = (seconds * sample_rate) as usize;
            let impulse: Vec<f32> = (0..frames)
                .map(|i| {
                    let t = i as f32 / sample_rate;
                    (i as f32 * 12.9898).sin().fract() * (-6.0 * t / seconds).exp()
                })
                .collect();
            let mut convolver = PartitionedConvolver::new(&impulse, PARTITION_SIZE);
            let mut buffer = input.clone();

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    convolver.process(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
