use sound_kit::{
    graph::{GraphNode, RenderCtx},
    AudioBuffer,
};

/// Loops the first channel of a buffer, already at the context rate.
pub struct ClipPlayer {
    samples: Vec<f32>,
    position: usize,
}

impl ClipPlayer {
    pub fn new(clip: &AudioBuffer, sample_rate: f32) -> sound_kit::Result<Self> {
        let clip = clip.resampled(sample_rate)?;
        let samples = clip.into_channels().swap_remove(0);
        Ok(Self {
            samples,
            position: 0,
        })
    }
}

impl GraphNode for ClipPlayer {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.samples[self.position];
            self.position = (self.position + 1) % self.samples.len();
        }
    }
}
