//! Benchmarks for low-level DSP primitives.

mod analysis;
mod convolution;
mod filter;
mod oscillator;
mod quantize;

pub use analysis::bench_analysis;
pub use convolution::bench_convolution;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
pub use quantize::bench_quantize;
