use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};
use sound_kit::{graph::GraphNode, AudioContext, ContextConfig, MAX_BLOCK_SIZE};

/// Default output device plus a context running at its rate.
pub struct Output {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
    ctx: AudioContext,
}

impl Output {
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let ctx = AudioContext::new(ContextConfig {
            sample_rate: config.sample_rate().0 as f32,
            channel_count: config.channels() as usize,
        })?;
        info!(
            "output at {} Hz, {} channels",
            ctx.sample_rate(),
            ctx.channel_count()
        );

        Ok(Self {
            device,
            config,
            ctx,
        })
    }

    pub fn context(&self) -> &AudioContext {
        &self.ctx
    }

    /// Start pulling `node`. Audio stops when the stream is dropped.
    pub fn play(&self, mut node: Box<dyn GraphNode>) -> Result<cpal::Stream> {
        let ctx = self.ctx.clone();
        let channels = ctx.channel_count();
        let mut block = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = self.device.build_output_stream(
            &self.config.clone().into(),
            move |data: &mut [f32], _| {
                for frames in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    let mono = &mut block[..frames.len() / channels];
                    ctx.render_block(node.as_mut(), mono);

                    // mono to all channels
                    for (frame, &sample) in frames.chunks_mut(channels).zip(mono.iter()) {
                        frame.fill(sample);
                    }
                }
            },
            |err| error!("output stream: {err}"),
            None,
        )?;
        stream.play()?;
        Ok(stream)
    }
}
