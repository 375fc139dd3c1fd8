//! Composable building blocks for realtime audio graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what a live voice
//! needs: a shared clock, automatable parameters and block-based rendering.
//! Nodes that can be steered come in two halves, an audio-side node and a
//! control-side handle, connected by lock-free queues.

/// Shared monotonic audio clock.
pub mod clock;
/// Sample rate, channel layout and parameter factory.
pub mod context;
/// Partitioned FFT convolution reverb.
pub mod convolver;
/// Fluent combinators (`.through()`, `.boxed()`).
pub mod extensions;
/// Band-pass stages with automatable settings.
pub mod filter;
/// Automatable gain.
pub mod gain;
/// Live capture source.
pub mod input;
/// Analyser tap and normalized snapshots.
pub mod inspector;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-band oscillators with start/stop and FM input.
pub mod oscillator;
/// Control/audio parameter pairs.
pub mod param;
/// Per-sample formula effects (bitcrusher).
pub mod processor;
/// Serial chaining of two nodes (source → effect).
pub mod through;
/// ADSR ramps over a parameter.
pub mod trigger;

pub use node::{GraphNode, RenderCtx};
