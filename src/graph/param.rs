use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use log::warn;
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    dsp::automation::Automation,
    graph::{clock::AudioClock, node::RenderCtx},
};

/*
Automatable Parameters
======================

A parameter is split in two halves that live on different threads:

  ParamHandle   control side. Schedules set / ramp / cancel events stamped
                on the shared audio clock. Never blocks.

  AudioParam    audio side. Owned by a node. Drains pending messages at the
                start of each block, then evaluates its timeline per sample
                (or once per block for coefficient-style parameters).

    control thread                        audio thread
    ──────────────                        ────────────
    handle.linear_ramp(..) ──► [ rtrb ] ──► param.render(..)
    handle.value()        ◄── AtomicU32 ◄── last rendered value

Messages are applied in the order they were sent, so a cancel followed by
new events always replaces whatever was scheduled before it. The control
side sees the value as of the last rendered block, like reading `.value` on
a Web Audio parameter.
*/

const PARAM_QUEUE_SIZE: usize = 256;

#[derive(Debug, Clone, Copy)]
pub enum ParamMessage {
    SetValueAtTime { value: f32, time: f64 },
    LinearRampToValueAtTime { value: f32, time: f64, issued: f64 },
    CancelScheduledValues { from: f64, issued: f64 },
}

/// Control-side handle to one automatable parameter.
pub struct ParamHandle {
    tx: Producer<ParamMessage>,
    current: Arc<AtomicU32>,
    clock: AudioClock,
}

/// Audio-side half of a parameter, owned by the node that reads it.
pub struct AudioParam {
    automation: Automation,
    rx: Consumer<ParamMessage>,
    current: Arc<AtomicU32>,
}

/// Create a connected handle/parameter pair starting at `initial`.
pub fn param(initial: f32, clock: &AudioClock) -> (ParamHandle, AudioParam) {
    let (tx, rx) = RingBuffer::<ParamMessage>::new(PARAM_QUEUE_SIZE);
    let current = Arc::new(AtomicU32::new(initial.to_bits()));

    let handle = ParamHandle {
        tx,
        current: current.clone(),
        clock: clock.clone(),
    };
    let param = AudioParam {
        automation: Automation::new(initial),
        rx,
        current,
    };

    (handle, param)
}

impl ParamHandle {
    /// Current audio clock time.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Value as of the most recently rendered block.
    pub fn value(&self) -> f32 {
        f32::from_bits(self.current.load(Ordering::Acquire))
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        self.send(ParamMessage::SetValueAtTime { value, time });
        self
    }

    /// Jump to `value` at the current clock time.
    pub fn set_value(&mut self, value: f32) -> &mut Self {
        let now = self.now();
        self.set_value_at_time(value, now)
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        let issued = self.now();
        self.send(ParamMessage::LinearRampToValueAtTime {
            value,
            time,
            issued,
        });
        self
    }

    /// Drop every event at or after `from`.
    pub fn cancel_scheduled_values(&mut self, from: f64) -> &mut Self {
        let issued = self.now();
        self.send(ParamMessage::CancelScheduledValues { from, issued });
        self
    }

    fn send(&mut self, message: ParamMessage) {
        if let Err(err) = self.tx.push(message) {
            warn!("automation queue full, dropping {err:?}");
        }
    }
}

impl AudioParam {
    /// Apply every message sent so far.
    ///
    /// Events that do not fit in the timeline are dropped; the audio thread
    /// cannot allocate or log.
    pub fn sync(&mut self) {
        while let Ok(message) = self.rx.pop() {
            match message {
                ParamMessage::SetValueAtTime { value, time } => {
                    self.automation.set_value_at_time(value, time);
                }
                ParamMessage::LinearRampToValueAtTime {
                    value,
                    time,
                    issued,
                } => {
                    self.automation
                        .linear_ramp_to_value_at_time(value, time, issued);
                }
                ParamMessage::CancelScheduledValues { from, issued } => {
                    self.automation.cancel_scheduled_values(from, issued);
                }
            }
        }
    }

    pub fn value_at(&self, time: f64) -> f32 {
        self.automation.value_at(time)
    }

    /// Fill `out` with per-sample values for this block.
    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.sync();

        for (i, value) in out.iter_mut().enumerate() {
            *value = self.automation.value_at(ctx.time_at(i));
        }

        let end = ctx.time_at(out.len());
        self.finish_block(end);
    }

    /// One value for the whole block, taken at its first sample.
    pub fn block_value(&mut self, ctx: &RenderCtx, frames: usize) -> f32 {
        self.sync();
        let value = self.automation.value_at(ctx.time);
        self.finish_block(ctx.time_at(frames));
        value
    }

    pub fn automation(&self) -> &Automation {
        &self.automation
    }

    fn finish_block(&mut self, end: f64) {
        let value = self.automation.value_at(end);
        self.automation.prune(end);
        self.current.store(value.to_bits(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    #[test]
    fn starts_at_initial_value() {
        let clock = AudioClock::new(SAMPLE_RATE);
        let (handle, audio) = param(0.7, &clock);

        assert_eq!(handle.value(), 0.7);
        assert_eq!(audio.value_at(0.0), 0.7);
    }

    #[test]
    fn set_value_reaches_audio_side() {
        let clock = AudioClock::new(SAMPLE_RATE);
        let (mut handle, mut audio) = param(0.0, &clock);

        handle.set_value(440.0);
        let mut out = vec![0.0; 8];
        audio.render(&mut out, &RenderCtx::new(SAMPLE_RATE, 0.0));

        assert!(out.iter().all(|&v| v == 440.0));
        assert_eq!(handle.value(), 440.0);
    }

    #[test]
    fn ramp_renders_per_sample() {
        let clock = AudioClock::new(SAMPLE_RATE);
        let (mut handle, mut audio) = param(0.0, &clock);

        handle.linear_ramp_to_value_at_time(1.0, 0.01);
        let mut out = vec![0.0; 20];
        audio.render(&mut out, &RenderCtx::new(SAMPLE_RATE, 0.0));

        assert_eq!(out[0], 0.0);
        assert!((out[5] - 0.5).abs() < 1e-5);
        assert_eq!(out[15], 1.0);
    }

    #[test]
    fn cancel_supersedes_previous_schedule() {
        let clock = AudioClock::new(SAMPLE_RATE);
        let (mut handle, mut audio) = param(0.0, &clock);

        handle.linear_ramp_to_value_at_time(1.0, 1.0);
        handle
            .cancel_scheduled_values(0.0)
            .linear_ramp_to_value_at_time(0.25, 0.5);
        audio.sync();

        assert_eq!(audio.automation().pending_ramps(0.0), 1);
        assert_eq!(audio.value_at(2.0), 0.25);
    }

    #[test]
    fn block_value_prunes_elapsed_events() {
        let clock = AudioClock::new(SAMPLE_RATE);
        let (mut handle, mut audio) = param(0.0, &clock);

        handle.set_value_at_time(1.0, 0.0).set_value_at_time(2.0, 0.05);
        let ctx = RenderCtx::new(SAMPLE_RATE, 0.1);
        assert_eq!(audio.block_value(&ctx, 64), 2.0);
        assert!(audio.automation().events().len() <= 1);
    }
}
