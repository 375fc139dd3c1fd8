use crate::{
    graph::{
        context::AudioContext,
        node::{GraphNode, RenderCtx},
        param::{AudioParam, ParamHandle},
    },
    MAX_BLOCK_SIZE,
};

/// Multiplies its input by an automatable gain.
///
/// Controlled through the returned `ParamHandle`, which is also what an
/// envelope `Trigger` drives.
pub struct GainNode {
    gain: AudioParam,
    buffer: Vec<f32>,
}

impl GainNode {
    pub fn new(ctx: &AudioContext, initial: f32) -> (Self, ParamHandle) {
        let (handle, gain) = ctx.param(initial);
        let node = Self {
            gain,
            buffer: vec![0.0; MAX_BLOCK_SIZE],
        };

        (node, handle)
    }

    pub fn param(&self) -> &AudioParam {
        &self.gain
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frames = out.len().min(MAX_BLOCK_SIZE);
        let gain = &mut self.buffer[..frames];
        self.gain.render(gain, ctx);

        for (o, g) in out.iter_mut().zip(gain.iter()) {
            *o *= *g;
        }
    }
}
