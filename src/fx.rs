//! Ready-made effects.
//!
//! ```ignore
//! let crusher = fx::processor(&ctx, Bitcrush::new(8, 4)?);
//! let room = fx::reverb(&ctx, "assets/hall.wav")
//!     .or_else(|_| fx::reverb(&ctx, "assets/fallback.wav"))?;
//! let chain = input.through(crusher).through(room);
//! ```

use std::path::Path;

use log::debug;

use crate::{
    error::{Error, Result},
    graph::{
        context::AudioContext,
        convolver::ConvolverNode,
        processor::{Formula, Processor},
    },
    io::loader::load_buffer,
    render::deferred::Deferred,
};

/// Install a per-sample formula.
pub fn processor<F: Formula + 'static>(ctx: &AudioContext, formula: F) -> Processor {
    Processor::new(ctx, formula)
}

/// Convolution reverb from an impulse response on disk.
///
/// A missing or undecodable file is a `DecodeFailure`; there is no retry.
pub fn reverb(ctx: &AudioContext, path: impl AsRef<Path>) -> Result<ConvolverNode> {
    let path = path.as_ref();
    let impulse = load_buffer(path)?;
    debug!(
        "reverb impulse {}: {:.2}s, {} channels",
        path.display(),
        impulse.duration(),
        impulse.channel_count()
    );
    ConvolverNode::new(ctx, &impulse)
}

/// `reverb` on the worker pool.
pub fn spawn_reverb(ctx: &AudioContext, path: impl AsRef<Path>) -> Deferred<ConvolverNode> {
    let ctx = ctx.clone();
    let path = path.as_ref().to_path_buf();
    Deferred::spawn_with(Error::DecodeFailure, move || reverb(&ctx, path))
}
