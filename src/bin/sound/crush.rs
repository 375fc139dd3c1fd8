use std::{
    thread,
    time::{Duration, Instant},
};

use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info, warn};
use sound_kit::{
    fx,
    graph::{
        extensions::NodeExt,
        gain::GainNode,
        input::{InputMonitor, InputNode},
        inspector::{Inspector, InspectorConfig},
        processor::{Processor, QuantizerConfig},
        GraphNode, RenderCtx,
    },
    io::load_buffer,
    AudioContext,
};

use crate::{clip::ClipPlayer, output::Output, CrushArgs};

/// Stands in for the reverb when no impulse is given.
struct Dry;

impl GraphNode for Dry {
    fn render_block(&mut self, _out: &mut [f32], _ctx: &RenderCtx) {}
}

pub fn run(args: CrushArgs) -> Result<()> {
    let output = Output::open()?;
    let ctx = output.context();

    // Live input when there's a device, otherwise the clip.
    let mut capture = None;
    let source = match (open_input(ctx), &args.clip) {
        (Ok((stream, monitor, node)), _) => {
            capture = Some((stream, monitor));
            node.boxed()
        }
        (Err(err), Some(path)) => {
            warn!("no live input ({err}), looping {}", path.display());
            let clip = load_buffer(path)
                .wrap_err_with(|| format!("failed to load clip {}", path.display()))?;
            ClipPlayer::new(&clip, ctx.sample_rate())?.boxed()
        }
        (Err(err), None) => {
            bail!("no live input ({err}) and no --clip to fall back on")
        }
    };

    let crusher = Processor::from_config(
        ctx,
        QuantizerConfig::Bitcrush {
            bits: args.bits,
            period: args.period,
        },
    )?;
    let room = match &args.impulse {
        Some(path) => load_reverb(ctx, path)?,
        None => Dry.boxed(),
    };
    let (level, _level_handle) = GainNode::new(ctx, 0.5);
    let (tap, mut inspector) = Inspector::new(ctx, InspectorConfig::default())?;

    let chain = source.through(crusher).through(room).through(level).through(tap);
    let _stream = output.play(chain.boxed())?;
    info!("crushing to {} bits for {:.1}s", args.bits, args.seconds);

    let deadline = Instant::now() + Duration::from_secs_f64(args.seconds.max(0.0));
    while Instant::now() < deadline {
        thread::sleep(Duration::from_millis(250));
        let peak = inspector.snapshot().fold(0.0f32, |peak, v| peak.max(v.abs()));
        info!("{:>6.2}s  peak {peak:.3}", ctx.current_time());
        if let Some((_, monitor)) = &capture {
            monitor.report();
        }
    }
    Ok(())
}

fn load_reverb(ctx: &AudioContext, path: &std::path::Path) -> Result<Box<dyn GraphNode>> {
    let reverb = fx::spawn_reverb(ctx, path)
        .wait()
        .wrap_err_with(|| format!("failed to load impulse {}", path.display()))?;
    info!("reverb latency {} samples", reverb.latency());
    Ok(reverb.boxed())
}

fn open_input(ctx: &AudioContext) -> Result<(cpal::Stream, InputMonitor, InputNode)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| eyre!("no default input device"))?;
    let config = device
        .default_input_config()
        .wrap_err("failed to fetch default input config")?;
    let channels = config.channels() as usize;
    info!("input at {} Hz, {} channels", config.sample_rate().0, channels);
    if config.sample_rate().0 as f32 != ctx.sample_rate() {
        warn!(
            "input runs at {} Hz but output at {} Hz; pitch will be off",
            config.sample_rate().0,
            ctx.sample_rate()
        );
    }

    let (node, mut handle) = InputNode::new();
    let monitor = handle.monitor();

    let stream = device.build_input_stream(
        &config.into(),
        move |data: &[f32], _| {
            handle.push_interleaved(data, channels);
        },
        |err| error!("input stream: {err}"),
        None,
    )?;
    stream.play()?;
    Ok((stream, monitor, node))
}
