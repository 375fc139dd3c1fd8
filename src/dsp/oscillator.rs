use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillator
============================

  phase      Position inside one cycle, kept in [0, 1).
  increment  frequency / sample_rate, added to phase every sample.

Each sample we read the waveform at the current phase, then advance:

    out    = shape(phase)
    phase += frequency / sample_rate
    phase -= floor(phase)

Taking the frequency per sample (instead of once per block) is what lets a
modulator push the carrier around at audio rate for FM. Negative
frequencies are fine: the phase just runs backwards.

Shapes are the naive (non band-limited) versions. They alias at high
pitches, which is acceptable for a formant source that is heavily filtered
and for the sine used in FM.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Saw,
}

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    /// Produce one sample at `frequency` and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let out = self.shape(self.phase);

        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();

        out
    }

    /// Fill `out` at a fixed frequency.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    #[inline]
    fn shape(&self, phase: f32) -> f32 {
        match self.waveform {
            OscillatorWaveform::Sine => (TAU * phase).sin(),
            OscillatorWaveform::Saw => 2.0 * phase - 1.0,
        }
    }
}
