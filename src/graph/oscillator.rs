use crate::{
    dsp::{
        modulate::apply_modulation,
        oscillator::{OscillatorBlock, OscillatorWaveform},
    },
    graph::{
        context::AudioContext,
        node::{GraphNode, RenderCtx},
        param::{AudioParam, ParamHandle},
    },
    MAX_BLOCK_SIZE,
};

/*
Audio Oscillator
================

The raw sound source of every voice. An oscillator produces a repeating
waveform at a frequency that can be automated while it plays.

Waveforms:

  Sine      a single partial. FM carriers and modulators.
  Sawtooth  every harmonic at 1/n. Bright and buzzy; the formant source.

Lifecycle:
----------
An oscillator is created stopped. `start(when)` opens its gate at a clock
time and `stop(when)` closes it again; both are automation events on an
internal gate parameter, so they land sample-accurately. The phase only
advances while the gate is open, so a freshly started oscillator begins at
phase 0.

Frequency modulation:
---------------------
`render_modulated` adds a per-sample signal to the automated frequency:

    f(t) = frequency(t) + fm(t)

Feeding a second oscillator scaled by a gain into `fm` is classic FM; the
gain is the peak frequency deviation in Hz.

    [modulator] ─► (× depth) ─► fm ─┐
                                     ▼
                       [carrier frequency] ─► out
*/

/// Control side of an oscillator.
pub struct OscHandle {
    pub frequency: ParamHandle,
    gate: ParamHandle,
}

impl OscHandle {
    /// Begin producing sound at clock time `when`.
    pub fn start(&mut self, when: f64) -> &mut Self {
        self.gate.set_value_at_time(1.0, when);
        self
    }

    /// Fall silent at clock time `when`.
    pub fn stop(&mut self, when: f64) -> &mut Self {
        self.gate.set_value_at_time(0.0, when);
        self
    }

    /// True if the gate was open at the end of the last rendered block.
    pub fn is_playing(&self) -> bool {
        self.gate.value() > 0.0
    }
}

pub struct OscNode {
    osc: OscillatorBlock,
    frequency: AudioParam,
    gate: AudioParam,
    frequency_buffer: Vec<f32>,
    gate_buffer: Vec<f32>,
}

impl OscNode {
    pub fn new(
        ctx: &AudioContext,
        waveform: OscillatorWaveform,
        frequency: f32,
    ) -> (Self, OscHandle) {
        let (frequency_handle, frequency_param) = ctx.param(frequency);
        let (gate_handle, gate_param) = ctx.param(0.0);

        let node = Self {
            osc: OscillatorBlock::new(waveform),
            frequency: frequency_param,
            gate: gate_param,
            frequency_buffer: vec![0.0; MAX_BLOCK_SIZE],
            gate_buffer: vec![0.0; MAX_BLOCK_SIZE],
        };
        let handle = OscHandle {
            frequency: frequency_handle,
            gate: gate_handle,
        };

        (node, handle)
    }

    pub fn sine(ctx: &AudioContext, frequency: f32) -> (Self, OscHandle) {
        Self::new(ctx, OscillatorWaveform::Sine, frequency)
    }

    pub fn sawtooth(ctx: &AudioContext, frequency: f32) -> (Self, OscHandle) {
        Self::new(ctx, OscillatorWaveform::Saw, frequency)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.osc.waveform()
    }

    /// Render with `fm` (Hz, one value per sample) added to the frequency.
    pub fn render_modulated(&mut self, out: &mut [f32], fm: &[f32], ctx: &RenderCtx) {
        debug_assert!(fm.len() >= out.len());

        let frames = out.len().min(MAX_BLOCK_SIZE);
        let frequency = &mut self.frequency_buffer[..frames];
        let gate = &mut self.gate_buffer[..frames];
        self.frequency.render(frequency, ctx);
        self.gate.render(gate, ctx);

        for (i, sample) in out[..frames].iter_mut().enumerate() {
            *sample = if gate[i] > 0.0 {
                let f = apply_modulation(frequency[i], fm[i], 1.0);
                self.osc.next_sample(f, ctx.sample_rate)
            } else {
                0.0
            };
        }
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frames = out.len().min(MAX_BLOCK_SIZE);
        let frequency = &mut self.frequency_buffer[..frames];
        let gate = &mut self.gate_buffer[..frames];
        self.frequency.render(frequency, ctx);
        self.gate.render(gate, ctx);

        for (i, sample) in out[..frames].iter_mut().enumerate() {
            *sample = if gate[i] > 0.0 {
                self.osc.next_sample(frequency[i], ctx.sample_rate)
            } else {
                0.0
            };
        }
    }
}
