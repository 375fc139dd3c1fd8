use std::{thread, time::Duration};

use color_eyre::eyre::Result;
use log::info;
use sound_kit::{
    graph::{extensions::NodeExt, gain::GainNode, trigger::Trigger},
    voices::fm::FmVoice,
};

use crate::{output::Output, FmArgs};

pub fn run(args: FmArgs) -> Result<()> {
    let output = Output::open()?;
    let ctx = output.context();

    let (mut voice, node) = FmVoice::new(ctx);
    let (amp, amp_handle) = GainNode::new(ctx, 0.0);
    let mut envelope = Trigger::new(amp_handle);

    let _stream = output.play(node.through(amp).boxed())?;

    voice.voice(args.frequency, args.ratio, args.depth);
    voice.start(ctx.current_time());
    envelope.on_default();
    info!(
        "fm {} Hz, ratio {}, depth {} for {:.1}s",
        args.frequency, args.ratio, args.depth, args.seconds
    );

    let hold = (args.seconds - Trigger::RELEASE).max(Trigger::ATTACK + Trigger::DECAY);
    thread::sleep(Duration::from_secs_f64(hold));
    envelope.off_default();

    while envelope.is_pending() {
        thread::sleep(Duration::from_millis(20));
    }
    voice.stop(ctx.current_time());
    info!("released at {:.2}s", ctx.current_time());
    Ok(())
}
