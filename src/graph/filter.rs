use crate::{
    dsp::filter::SVFilter,
    graph::{
        context::AudioContext,
        node::{GraphNode, RenderCtx},
        param::{AudioParam, ParamHandle},
    },
};

/*
Filter Stage
============

A state-variable band-pass with its three controls exposed as automatable
parameters:

  frequency   centre frequency, Hz
  q           resonance; the bandwidth is frequency / q
  gain        dB, tracked and readable but not applied to a band-pass

Coefficients are recomputed once per control block of CONTROL_BLOCK frames,
so a ramp on `frequency` glides in small steps rather than per sample.

A formant cascade is three bandpass stages in series:

    source ─► [BP f1/q1] ─► [BP f2/q2] ─► [BP f3/q3] ─► out
*/

/// Frames rendered between coefficient updates.
const CONTROL_BLOCK: usize = 128;

/// Control side of a filter stage.
pub struct FilterHandle {
    pub frequency: ParamHandle,
    pub q: ParamHandle,
    pub gain: ParamHandle,
}

pub struct FilterStage {
    filter: SVFilter,
    frequency: AudioParam,
    q: AudioParam,
    gain: AudioParam,
}

impl FilterStage {
    fn new(ctx: &AudioContext, filter: SVFilter) -> (Self, FilterHandle) {
        let (frequency_handle, frequency) = ctx.param(filter.cutoff_hz);
        let (q_handle, q) = ctx.param(filter.q);
        let (gain_handle, gain) = ctx.param(filter.gain_db);

        let stage = Self {
            filter,
            frequency,
            q,
            gain,
        };
        let handle = FilterHandle {
            frequency: frequency_handle,
            q: q_handle,
            gain: gain_handle,
        };

        (stage, handle)
    }

    pub fn bandpass(ctx: &AudioContext, frequency: f32) -> (Self, FilterHandle) {
        Self::new(ctx, SVFilter::bandpass(frequency))
    }

    /// Coefficients used for the most recent control block.
    pub fn settings(&self) -> (f32, f32, f32) {
        (self.filter.cutoff_hz, self.filter.q, self.filter.gain_db)
    }
}

impl GraphNode for FilterStage {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let mut offset = 0;
        for chunk in out.chunks_mut(CONTROL_BLOCK) {
            let chunk_ctx = RenderCtx::new(ctx.sample_rate, ctx.time_at(offset));
            let frames = chunk.len();

            self.filter
                .set_cutoff(self.frequency.block_value(&chunk_ctx, frames));
            self.filter.set_q(self.q.block_value(&chunk_ctx, frames));
            self.filter
                .set_gain_db(self.gain.block_value(&chunk_ctx, frames));
            self.filter.render(chunk, &chunk_ctx);

            offset += frames;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dsp::oscillator::OscillatorBlock, graph::context::ContextConfig};

    fn context() -> AudioContext {
        AudioContext::new(ContextConfig {
            sample_rate: 48_000.0,
            channel_count: 1,
        })
        .expect("valid context")
    }

    fn rms(buffer: &[f32]) -> f32 {
        (buffer.iter().map(|s| s * s).sum::<f32>() / buffer.len() as f32).sqrt()
    }

    #[test]
    fn picks_up_scheduled_settings() {
        let ctx = context();
        let (mut stage, mut handle) = FilterStage::bandpass(&ctx, 1_000.0);
        handle.frequency.set_value(500.0);
        handle.q.set_value(5.0);
        handle.gain.set_value(-6.0);

        let mut buffer = vec![0.0; 256];
        ctx.render_block(&mut stage, &mut buffer);

        assert_eq!(stage.settings(), (500.0, 5.0, -6.0));
        assert_eq!(handle.frequency.value(), 500.0);
    }

    #[test]
    fn gain_does_not_change_the_band() {
        let ctx = context();
        let mut input = vec![0.0; 4_800];
        OscillatorBlock::sine().render(&mut input, 1_000.0, 48_000.0);

        let mut levels = Vec::new();
        for gain_db in [0.0, -6.0, -12.0] {
            let (mut stage, mut handle) = FilterStage::bandpass(&ctx, 1_000.0);
            handle.gain.set_value(gain_db);

            let mut buffer = input.clone();
            stage.render_block(&mut buffer, &ctx.render_ctx());
            assert_eq!(stage.settings().2, gain_db);
            levels.push(rms(&buffer[2_400..]));
        }

        assert!(levels.iter().all(|&l| (l - levels[0]).abs() < 1e-6), "{levels:?}");
    }
}
