//! Ready-to-play voices.
//!
//! Each voice is built once against an [`AudioContext`](crate::AudioContext)
//! and then steered through its control handle. Building returns two halves:
//! a control object that stays with the caller and a node that goes to the
//! audio thread.
//!
//! # Example
//!
//! ```ignore
//! use sound_kit::{voices::fm::FmVoice, AudioContext, ContextConfig};
//!
//! let ctx = AudioContext::new(ContextConfig::default())?;
//! let (mut fm, node) = FmVoice::new(&ctx);
//! fm.voice(220.0, 3.5, 300.0);
//! fm.start(ctx.current_time());
//! // hand `node` to the output stream
//! ```

/// Two-operator frequency modulation.
pub mod fm;
/// Sawtooth through a three-stage bandpass cascade.
pub mod formant;
/// Seeded granular clouds rendered offline.
pub mod granular;

pub use fm::{FmHandles, FmNode, FmVoice, Operator};
pub use formant::{FormantNode, FormantParams, FormantVoice};
pub use granular::{Cloud, CloudConfig, Grain, GrainSource, Granular};
