//! Benchmarks for DSP primitives and voice chains.
//!
//! Run with: cargo bench
//!
//! Everything on the render path has to finish well inside the block
//! deadline. At 48kHz:
//!   - 64 samples  = 1.33ms
//!   - 128 samples = 2.67ms
//!   - 256 samples = 5.33ms
//!   - 512 samples = 10.67ms
//!
//! Benchmark groups:
//!   - dsp/*        Low-level primitives (oscillator, filter, bitcrush, ...)
//!   - scenarios/*  Complete voices and the offline granular renderer

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    dsp::bench_oscillator,
    dsp::bench_filter,
    dsp::bench_quantize,
    dsp::bench_convolution,
    dsp::bench_analysis,
    scenarios::bench_voices,
    scenarios::bench_granular,
);
criterion_main!(benches);
