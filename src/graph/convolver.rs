use log::debug;

use crate::{
    dsp::convolution::{normalization_scale, PartitionedConvolver, PARTITION_SIZE},
    error::Result,
    graph::{
        context::AudioContext,
        node::{GraphNode, RenderCtx},
    },
    io::buffer::AudioBuffer,
};

/// Convolution reverb built from an impulse response.
///
/// The response is resampled to the context rate, normalized for loudness
/// and convolved from its first channel. Output lags input by one partition.
pub struct ConvolverNode {
    convolver: PartitionedConvolver,
}

impl ConvolverNode {
    pub fn new(ctx: &AudioContext, impulse: &AudioBuffer) -> Result<Self> {
        let impulse = impulse.resampled(ctx.sample_rate())?;
        let scale = normalization_scale(impulse.channels(), impulse.sample_rate());

        let taps: Vec<f32> = impulse
            .channel(0)
            .unwrap_or_default()
            .iter()
            .map(|s| s * scale)
            .collect();

        debug!(
            "convolver: {} taps, normalization {scale:.4}",
            taps.len()
        );
        Ok(Self {
            convolver: PartitionedConvolver::new(&taps, PARTITION_SIZE),
        })
    }

    pub fn latency(&self) -> usize {
        self.convolver.latency()
    }

    pub fn reset(&mut self) {
        self.convolver.reset();
    }
}

impl GraphNode for ConvolverNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.convolver.process(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::context::ContextConfig;

    #[test]
    fn delayed_and_normalized_delta() {
        let ctx = AudioContext::new(ContextConfig {
            sample_rate: 44_100.0,
            channel_count: 1,
        })
        .expect("valid context");
        let mut impulse = vec![0.0; 64];
        impulse[0] = 1.0;
        let impulse = AudioBuffer::from_mono(44_100.0, impulse).expect("valid buffer");
        let mut node = ConvolverNode::new(&ctx, &impulse).expect("valid impulse");

        let mut block = vec![0.0; 512];
        block[0] = 1.0;
        ctx.render_block(&mut node, &mut block);

        // rms of a single unit tap in 64 samples is 1/8.
        let expected = 0.001_25 * 8.0;
        let peak = block[node.latency()];
        assert!((peak - expected).abs() < 1e-4, "peak was {peak}");
        assert!(block[..node.latency()].iter().all(|s| s.abs() < 1e-6));
    }
}
