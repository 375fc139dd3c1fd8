use log::debug;
use rayon::prelude::*;

use crate::{
    dsp::{
        automation::Automation,
        pan::{pan_mono, pan_stereo},
    },
    error::{Error, Result},
    io::buffer::AudioBuffer,
    render::{OfflineRenderer, RenderJob},
    voices::granular::Grain,
};

/*
Software Cloud Renderer
=======================

Every grain is an independent little playback voice:

    source ─► (read from start, rate 2^(detune/1200)) ─► pan ─► envelope ─► mix

Grains never share state, so each one is rendered on the rayon pool into
its own stereo scratch buffer. The buffers are then summed into the output
in grain order, which keeps the result bit-identical from run to run.

Envelope (per grain, on the render timeline):

    volume ┤      ╱╲
           │    ╱    ╲
         0 ┼──●        ╲──────
              onset  +a   +a+r

Output channels:
  1     (left + right) / 2
  2     left, right
  3+    left, right, the rest silent
*/

#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwareRenderer;

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// One grain rendered to stereo, starting at `start` frames.
struct GrainFrames {
    start: usize,
    frames: Vec<[f32; 2]>,
}

impl OfflineRenderer for SoftwareRenderer {
    fn render(&self, job: &RenderJob) -> Result<AudioBuffer> {
        if job.frames == 0 || job.channel_count == 0 {
            return Err(Error::RenderFailure(format!(
                "cannot render {} frames into {} channels",
                job.frames, job.channel_count
            )));
        }
        if !job.sample_rate.is_finite() || job.sample_rate <= 0.0 {
            return Err(Error::RenderFailure(format!(
                "cannot render at {} Hz",
                job.sample_rate
            )));
        }

        let rendered: Vec<GrainFrames> = job
            .grains
            .par_iter()
            .filter_map(|grain| render_grain(grain, job))
            .collect();

        let mut channels = vec![vec![0.0_f32; job.frames]; job.channel_count];
        for grain in &rendered {
            mix_grain(&mut channels, grain);
        }

        if channels.iter().flatten().any(|s| !s.is_finite()) {
            return Err(Error::RenderFailure(
                "cloud mix produced non-finite samples".into(),
            ));
        }

        debug!(
            "rendered {} grains ({} audible) into {} frames x {} channels",
            job.grains.len(),
            rendered.len(),
            job.frames,
            job.channel_count
        );
        AudioBuffer::new(job.sample_rate, channels)
            .map_err(|e| Error::RenderFailure(e.to_string()))
    }
}

fn render_grain(grain: &Grain, job: &RenderJob) -> Option<GrainFrames> {
    let sample_rate = job.sample_rate as f64;
    let source = job.source.as_ref();
    let source_rate = source.sample_rate() as f64;

    if !grain.onset.is_finite() || grain.onset < 0.0 || grain.duration <= 0.0 {
        return None;
    }
    let start = (grain.onset * sample_rate).ceil() as usize;
    if start >= job.frames {
        return None;
    }

    let source_start = grain.start * source_rate;
    if source_start >= source.len() as f64 {
        return None;
    }

    let rate = 2.0_f64.powf(grain.detune as f64 / 1200.0);
    let source_end = ((grain.start + grain.duration) * source_rate).min(source.len() as f64);

    let mut envelope = Automation::new(0.0);
    envelope.set_value_at_time(0.0, grain.onset);
    envelope.linear_ramp_to_value_at_time(grain.volume, grain.onset + grain.attack, grain.onset);
    envelope.linear_ramp_to_value_at_time(
        0.0,
        grain.onset + grain.attack + grain.release,
        grain.onset,
    );

    let stereo = source.channel_count() > 1;
    let mut frames = Vec::new();
    for frame in start..job.frames {
        let time = frame as f64 / sample_rate;
        let position = source_start + (time - grain.onset) * rate * source_rate;
        if position >= source_end {
            break;
        }

        let gain = envelope.value_at(time);
        let (left, right) = if stereo {
            pan_stereo(source.read(0, position), source.read(1, position), grain.pan)
        } else {
            pan_mono(source.read(0, position), grain.pan)
        };
        frames.push([left * gain, right * gain]);
    }

    Some(GrainFrames { start, frames })
}

fn mix_grain(channels: &mut [Vec<f32>], grain: &GrainFrames) {
    match channels {
        [mono] => {
            for (out, [l, r]) in mono[grain.start..].iter_mut().zip(&grain.frames) {
                *out += (l + r) * 0.5;
            }
        }
        [left, right, ..] => {
            let outs = left[grain.start..].iter_mut().zip(&mut right[grain.start..]);
            for ((l_out, r_out), [l, r]) in outs.zip(&grain.frames) {
                *l_out += l;
                *r_out += r;
            }
        }
        [] => {}
    }
}
