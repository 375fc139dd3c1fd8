//! Formant voice.
//!
//! A sawtooth source through three bandpass filters in series. Each filter
//! picks out one resonance (a formant) of the harmonic-rich source, which
//! is roughly how a vocal tract shapes the buzz of the vocal folds.
//!
//! ```text
//! [saw 220 Hz] ─► [BP f1] ─► [BP f2] ─► [BP f3] ─► out
//! ```
//!
//! # Vowels
//!
//! Approximate first and second formants:
//!
//! | vowel | f1 (Hz) | f2 (Hz) |
//! |-------|---------|---------|
//! | "ah"  | 700     | 1200    |
//! | "ee"  | 300     | 2300    |
//! | "oo"  | 300     | 800     |
//!
//! Repeated `voice()` calls retune the three existing stages; the source
//! keeps running, so moving between vowels is seamless.

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::{
    context::AudioContext,
    extensions::NodeExt,
    filter::{FilterHandle, FilterStage},
    oscillator::{OscHandle, OscNode},
    through::Through,
};

pub const SOURCE_FREQUENCY: f32 = 220.0;
/// Stage centre frequency before the first `voice()` call.
const INITIAL_FREQUENCY: f32 = 350.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormantParams {
    pub frequencies: [f32; 3],
    pub q: [f32; 3],
    /// Per-stage gain in dB. Recorded on each stage; band-pass stages
    /// do not apply it.
    pub gains: [f32; 3],
}

impl Default for FormantParams {
    fn default() -> Self {
        Self {
            frequencies: [0.0; 3],
            q: [1.0; 3],
            gains: [0.0; 3],
        }
    }
}

pub type FormantNode = Through<Through<Through<OscNode, FilterStage>, FilterStage>, FilterStage>;

/// Control side of the formant voice.
pub struct FormantVoice {
    source: OscHandle,
    stages: [FilterHandle; 3],
}

impl FormantVoice {
    pub fn new(ctx: &AudioContext) -> (Self, FormantNode) {
        let (source, source_handle) = OscNode::sawtooth(ctx, SOURCE_FREQUENCY);
        let (f1, h1) = FilterStage::bandpass(ctx, INITIAL_FREQUENCY);
        let (f2, h2) = FilterStage::bandpass(ctx, INITIAL_FREQUENCY);
        let (f3, h3) = FilterStage::bandpass(ctx, INITIAL_FREQUENCY);

        let node = source.through(f1).through(f2).through(f3);
        let voice = Self {
            source: source_handle,
            stages: [h1, h2, h3],
        };

        (voice, node)
    }

    /// Retune all three stages now. Returns the source for start/stop.
    pub fn voice(&mut self, params: &FormantParams) -> &mut OscHandle {
        let now = self.source.frequency.now();

        for (i, stage) in self.stages.iter_mut().enumerate() {
            stage.frequency.set_value_at_time(params.frequencies[i], now);
            stage.q.set_value_at_time(params.q[i], now);
            stage.gain.set_value_at_time(params.gains[i], now);
        }

        debug!(
            "formant voice at {now:.3}s: {:?} Hz, q {:?}, {:?} dB",
            params.frequencies, params.q, params.gains
        );
        &mut self.source
    }

    pub fn source(&mut self) -> &mut OscHandle {
        &mut self.source
    }

    pub fn stages(&self) -> &[FilterHandle; 3] {
        &self.stages
    }
}
