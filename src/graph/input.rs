use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use log::warn;
use rtrb::{Consumer, Producer, RingBuffer};

use crate::graph::node::{GraphNode, RenderCtx};

/// Samples of headroom between a capture callback and the render path.
const INPUT_QUEUE_SIZE: usize = 16_384;

/// Capture side of a live input, e.g. a device input callback.
pub struct InputHandle {
    tx: Producer<f32>,
    dropped: Arc<AtomicU64>,
}

/// Reads the underrun count without touching either queue end.
#[derive(Clone)]
pub struct InputMonitor {
    dropped: Arc<AtomicU64>,
}

/// Source node playing whatever the capture side has pushed.
pub struct InputNode {
    rx: Consumer<f32>,
    dropped: Arc<AtomicU64>,
}

impl InputNode {
    pub fn new() -> (Self, InputHandle) {
        let (tx, rx) = RingBuffer::<f32>::new(INPUT_QUEUE_SIZE);
        let dropped = Arc::new(AtomicU64::new(0));

        let node = Self {
            rx,
            dropped: dropped.clone(),
        };
        let handle = InputHandle { tx, dropped };

        (node, handle)
    }

    /// Samples the render path has had to fill with silence.
    pub fn underruns(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl InputHandle {
    /// Queue captured mono samples. Returns how many were accepted.
    pub fn push(&mut self, samples: &[f32]) -> usize {
        let mut accepted = 0;
        for &sample in samples {
            if self.tx.push(sample).is_err() {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Queue interleaved frames, keeping only the first channel.
    pub fn push_interleaved(&mut self, data: &[f32], channels: usize) -> usize {
        let channels = channels.max(1);
        let mut accepted = 0;
        for frame in data.chunks(channels) {
            if self.tx.push(frame[0]).is_err() {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Watch underruns after the handle has moved into a capture callback.
    pub fn monitor(&self) -> InputMonitor {
        InputMonitor {
            dropped: self.dropped.clone(),
        }
    }
}

impl InputMonitor {
    /// Log and clear the underrun count. Call from a control thread.
    pub fn report(&self) -> u64 {
        let missed = self.dropped.swap(0, Ordering::Relaxed);
        if missed > 0 {
            warn!("live input underran by {missed} samples");
        }
        missed
    }
}

impl GraphNode for InputNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let mut missing = 0;
        for sample in out.iter_mut() {
            *sample = match self.rx.pop() {
                Ok(value) => value,
                Err(_) => {
                    missing += 1;
                    0.0
                }
            };
        }
        if missing > 0 {
            self.dropped.fetch_add(missing, Ordering::Relaxed);
        }
    }
}
