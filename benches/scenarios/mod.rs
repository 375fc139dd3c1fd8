//! Real-world scenario benchmarks.
//!
//! Complete voices as a caller would wire them, plus the offline granular
//! render.

mod granular;
mod voices;

pub use granular::bench_granular;
pub use voices::bench_voices;
