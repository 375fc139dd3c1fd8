//! FM voice.
//!
//! Two sine oscillators: a modulator whose output, scaled by `depth`, is
//! added to the carrier's frequency. The carrier is what you hear.
//!
//! ```text
//! [modulator f*ratio] ─► (× depth) ─┐
//!                                   ▼
//!                [carrier f] ─► (× gain) ─► out
//! ```
//!
//! # Parameters
//!
//! - `frequency`: carrier pitch in Hz.
//! - `ratio`: modulator pitch as a multiple of the carrier. Whole numbers
//!   give harmonic spectra (brass at 1), others clang (bells at 3.5).
//! - `depth`: peak frequency deviation in Hz. More depth, more sidebands.
//!
//! The voice is built once. Every `voice()` call retunes the same two
//! oscillators at the current clock time, so a caller can glide between
//! settings without rebuilding anything.

use log::debug;

use crate::{
    graph::{
        context::AudioContext,
        gain::GainNode,
        node::{GraphNode, RenderCtx},
        oscillator::{OscHandle, OscNode},
        param::ParamHandle,
    },
    MAX_BLOCK_SIZE,
};

/// An oscillator and the gain after it.
pub struct Operator {
    pub oscillator: OscHandle,
    pub gain: ParamHandle,
}

pub struct FmHandles {
    pub carrier: Operator,
    pub modulator: Operator,
}

/// Control side of the FM voice.
pub struct FmVoice {
    handles: FmHandles,
}

/// Audio side of the FM voice.
pub struct FmNode {
    carrier: OscNode,
    carrier_gain: GainNode,
    modulator: OscNode,
    modulator_gain: GainNode,
    fm_buffer: Vec<f32>,
}

impl FmVoice {
    pub const FREQUENCY: f32 = 440.0;
    pub const RATIO: f32 = 1.0;
    pub const DEPTH: f32 = 80.0;

    pub fn new(ctx: &AudioContext) -> (Self, FmNode) {
        let (carrier, carrier_osc) = OscNode::sine(ctx, Self::FREQUENCY);
        let (carrier_gain, carrier_gain_handle) = GainNode::new(ctx, 1.0);
        let (modulator, modulator_osc) = OscNode::sine(ctx, Self::FREQUENCY * Self::RATIO);
        let (modulator_gain, modulator_gain_handle) = GainNode::new(ctx, Self::DEPTH);

        let voice = Self {
            handles: FmHandles {
                carrier: Operator {
                    oscillator: carrier_osc,
                    gain: carrier_gain_handle,
                },
                modulator: Operator {
                    oscillator: modulator_osc,
                    gain: modulator_gain_handle,
                },
            },
        };
        let node = FmNode {
            carrier,
            carrier_gain,
            modulator,
            modulator_gain,
            fm_buffer: vec![0.0; MAX_BLOCK_SIZE],
        };

        (voice, node)
    }

    /// Retune both operators now.
    pub fn voice(&mut self, frequency: f32, ratio: f32, depth: f32) -> &mut FmHandles {
        let FmHandles { carrier, modulator } = &mut self.handles;
        let now = carrier.oscillator.frequency.now();

        carrier.oscillator.frequency.set_value_at_time(frequency, now);
        modulator
            .oscillator
            .frequency
            .set_value_at_time(frequency * ratio, now);
        modulator.gain.set_value_at_time(depth, now);

        debug!("fm voice at {now:.3}s: {frequency} Hz, ratio {ratio}, depth {depth}");
        &mut self.handles
    }

    pub fn voice_default(&mut self) -> &mut FmHandles {
        self.voice(Self::FREQUENCY, Self::RATIO, Self::DEPTH)
    }

    pub fn handles(&mut self) -> &mut FmHandles {
        &mut self.handles
    }

    /// Start both oscillators at `when`.
    pub fn start(&mut self, when: f64) -> &mut Self {
        self.handles.carrier.oscillator.start(when);
        self.handles.modulator.oscillator.start(when);
        self
    }

    /// Stop both oscillators at `when`.
    pub fn stop(&mut self, when: f64) -> &mut Self {
        self.handles.carrier.oscillator.stop(when);
        self.handles.modulator.oscillator.stop(when);
        self
    }
}

impl GraphNode for FmNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frames = out.len().min(MAX_BLOCK_SIZE);
        let fm = &mut self.fm_buffer[..frames];

        self.modulator.render_block(fm, ctx);
        self.modulator_gain.render_block(fm, ctx);

        self.carrier.render_modulated(&mut out[..frames], fm, ctx);
        self.carrier_gain.render_block(&mut out[..frames], ctx);
    }
}
