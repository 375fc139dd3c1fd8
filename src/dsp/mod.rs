//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free on their per-sample paths, making
//! them safe to embed directly inside realtime nodes. They stay focused on
//! the signal-processing math so graph nodes can layer on parameter
//! automation and routing.

/// Byte-valued time and frequency analysis frames.
pub mod analysis;
/// Timestamped set/ramp/cancel parameter timelines.
pub mod automation;
/// Uniformly partitioned FFT convolution.
pub mod convolution;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Frequency modulation math.
pub mod modulate;
/// Phase-accumulator oscillator waveforms.
pub mod oscillator;
/// Equal-power stereo panning.
pub mod pan;
/// Bit-depth and sample-rate reduction.
pub mod quantize;
/// Seeded pseudo-random scalars.
pub mod random;

pub use automation::Automation;
pub use random::{clamp, SimpleRandom};
