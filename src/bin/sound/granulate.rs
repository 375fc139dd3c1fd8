use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use hound::{SampleFormat, WavSpec, WavWriter};
use log::info;
use sound_kit::{
    io::load_buffer,
    voices::granular::{CloudConfig, Granular},
    AudioBuffer, AudioContext, ContextConfig,
};

use crate::GranulateArgs;

pub fn run(args: GranulateArgs) -> Result<()> {
    let source = load_buffer(&args.input)
        .wrap_err_with(|| format!("failed to load {}", args.input.display()))?;

    let ctx = AudioContext::new(ContextConfig {
        sample_rate: source.sample_rate(),
        channel_count: args.channels,
    })
    .wrap_err("failed to set up the render context")?;

    let config = CloudConfig {
        delay: args.delay,
        duration: args.duration,
        seed: (!args.no_seed).then_some(args.seed),
        spread: args.spread,
        transpose: args.transpose,
        ..Default::default()
    };

    info!(
        "granulating {} ({:.2}s) at {:.2} with {} grains",
        args.input.display(),
        source.duration(),
        args.position,
        args.count
    );

    let cloud = Granular::new(&ctx).source(Arc::new(source)).cloud(config);
    let rendered = cloud
        .spawn(args.position, args.count, args.volume)
        .wait()
        .wrap_err("cloud render failed")?;

    write_wav(&rendered, &args.output)
        .wrap_err_with(|| format!("failed to write {}", args.output.display()))?;
    info!("wrote {}", args.output.display());
    Ok(())
}

fn write_wav(buffer: &AudioBuffer, path: &std::path::Path) -> Result<()> {
    let spec = WavSpec {
        channels: buffer.channel_count() as u16,
        sample_rate: buffer.sample_rate() as u32,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for frame in 0..buffer.len() {
        for channel in buffer.channels() {
            writer.write_sample(channel[frame])?;
        }
    }
    writer.finalize()?;
    Ok(())
}
