#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use log::debug;

use crate::{
    dsp::quantize::{bitcrush, step_for_bits},
    error::{Error, Result},
    graph::{
        context::AudioContext,
        node::{GraphNode, RenderCtx},
    },
};

/*
Per-Sample Processor
====================

Runs a formula over every sample of the signal passing through it:

    out = formula(t, i, n, a)

  t  running time in seconds, advanced by 1 / sample_rate per sample
  i  index of the sample within the current block
  n  incoming sample
  a  accumulator: the formula's previous output

Feeding the previous output back as `a` is what lets a formula hold a value
across samples (sample-and-hold, decimation). The accumulator starts at 0
and, like `t`, carries over from block to block for the life of the
processor.

The formula runs on the audio thread. It must not allocate or block, and a
panic inside it is not caught: tear the processor down and build a new one.
*/

/// A per-sample transfer function.
pub trait Formula: Send {
    fn apply(&mut self, t: f64, i: usize, n: f32, a: f32) -> f32;
}

impl<F> Formula for F
where
    F: FnMut(f64, usize, f32, f32) -> f32 + Send,
{
    fn apply(&mut self, t: f64, i: usize, n: f32, a: f32) -> f32 {
        self(t, i, n, a)
    }
}

/// Built-in formulas.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantizerConfig {
    /// Snap to `2^-bits` every `period` samples, hold in between.
    Bitcrush { bits: u32, period: usize },
}

impl Default for QuantizerConfig {
    fn default() -> Self {
        Self::Bitcrush {
            bits: 16,
            period: 10,
        }
    }
}

impl QuantizerConfig {
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Bitcrush { bits, period } => {
                if !(1..=24).contains(&bits) {
                    return Err(Error::InvalidConfig(format!(
                        "bitcrush bits must be within 1..=24, got {bits}"
                    )));
                }
                if period == 0 {
                    return Err(Error::InvalidConfig(
                        "bitcrush period must be at least 1".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Bit-depth reduction plus decimation.
#[derive(Debug, Clone, Copy)]
pub struct Bitcrush {
    step: f32,
    period: usize,
}

impl Bitcrush {
    pub fn new(bits: u32, period: usize) -> Result<Self> {
        QuantizerConfig::Bitcrush { bits, period }.validate()?;
        Ok(Self {
            step: step_for_bits(bits),
            period,
        })
    }
}

impl Formula for Bitcrush {
    fn apply(&mut self, _t: f64, i: usize, n: f32, a: f32) -> f32 {
        bitcrush(i, n, a, self.step, self.period)
    }
}

pub struct Processor {
    formula: Box<dyn Formula>,
    time: f64,
    accumulator: f32,
}

impl Processor {
    /// Wrap a caller-supplied formula.
    pub fn new<F: Formula + 'static>(ctx: &AudioContext, formula: F) -> Self {
        debug!("processor installed at {} Hz", ctx.sample_rate());
        Self {
            formula: Box::new(formula),
            time: ctx.current_time(),
            accumulator: 0.0,
        }
    }

    /// Build one of the built-in formulas.
    pub fn from_config(ctx: &AudioContext, config: QuantizerConfig) -> Result<Self> {
        config.validate()?;
        let formula = match config {
            QuantizerConfig::Bitcrush { bits, period } => Bitcrush::new(bits, period)?,
        };
        Ok(Self::new(ctx, formula))
    }

    /// Clear the accumulator and restart the time counter at `time`.
    pub fn reset(&mut self, time: f64) {
        self.time = time;
        self.accumulator = 0.0;
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}

impl GraphNode for Processor {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let period = ctx.sample_period();

        for (i, sample) in out.iter_mut().enumerate() {
            let value = self.formula.apply(self.time, i, *sample, self.accumulator);
            self.accumulator = value;
            *sample = value;
            self.time += period;
        }
    }
}
