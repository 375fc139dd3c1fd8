#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    graph::{
        clock::AudioClock,
        node::{GraphNode, RenderCtx},
        param::{param, AudioParam, ParamHandle},
    },
    MAX_BLOCK_SIZE,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextConfig {
    pub sample_rate: f32,
    pub channel_count: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            channel_count: 2,
        }
    }
}

/// The target every voice is built against: sample rate, output channel
/// count and the shared audio clock.
///
/// Cloning is cheap and every clone shares the same clock.
#[derive(Debug, Clone)]
pub struct AudioContext {
    config: ContextConfig,
    clock: AudioClock,
}

impl AudioContext {
    pub fn new(config: ContextConfig) -> Result<Self> {
        if !config.sample_rate.is_finite() || config.sample_rate <= 0.0 {
            return Err(Error::InvalidSource(format!(
                "sample rate must be positive, got {}",
                config.sample_rate
            )));
        }
        if config.channel_count == 0 {
            return Err(Error::InvalidSource(
                "context needs at least one output channel".into(),
            ));
        }

        Ok(Self {
            config,
            clock: AudioClock::new(config.sample_rate),
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.config.channel_count
    }

    pub fn clock(&self) -> &AudioClock {
        &self.clock
    }

    pub fn current_time(&self) -> f64 {
        self.clock.now()
    }

    /// Create an automatable parameter bound to this context's clock.
    pub fn param(&self, initial: f32) -> (ParamHandle, AudioParam) {
        param(initial, &self.clock)
    }

    /// Render context for a block starting now.
    pub fn render_ctx(&self) -> RenderCtx {
        RenderCtx::new(self.config.sample_rate, self.clock.now())
    }

    /// Render `out` through `node` in blocks of at most `MAX_BLOCK_SIZE`,
    /// advancing the clock after each block.
    pub fn render_block<N: GraphNode + ?Sized>(&self, node: &mut N, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let ctx = self.render_ctx();
            node.render_block(chunk, &ctx);
            self.clock.advance(chunk.len());
        }
    }
}
