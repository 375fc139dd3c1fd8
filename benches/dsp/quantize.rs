//! Benchmarks for the bitcrusher.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sound_kit::dsp::quantize::{bitcrush, step_for_bits};

use crate::BLOCK_SIZES;

pub fn bench_quantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/quantize");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut buffer = vec![0.0f32; size];

        for (name, bits, period) in [("16bit_hold10", 16, 10), ("4bit_every", 4, 1)] {
            let step = step_for_bits(bits);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    let mut held = 0.0;
                    for (i, (out, &n)) in buffer.iter_mut().zip(&input).enumerate() {
                        held = bitcrush(i, black_box(n), held, step, period);
                        *out = held;
                    }
                })
            });
        }
    }

    group.finish();
}
