use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use log::{debug, warn};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    dsp::analysis::{is_valid_fft_size, Analysis},
    error::{Error, Result},
    graph::{
        context::AudioContext,
        node::{GraphNode, RenderCtx},
    },
    MAX_BLOCK_SIZE,
};

/*
Signal Inspector
================

An analyser tap on the audio path and a reader on the control side:

    audio thread                              control thread
    ────────────                              ──────────────
    ... ─► AnalyserNode ─► ...                Inspector::snapshot()
                │                                   ▲
                └──── samples ──► [ rtrb ] ─────────┘

The tap copies samples and leaves the block untouched. The inspector keeps
the most recent `fft_size` samples and, on every snapshot, turns them into
`fft_size / 2` bytes and then into floats:

  Time       (byte / 128 - 1) * scale      in [-scale, scale]
  Frequency  (byte / 256) * scale          in [0, scale]

Snapshots can be taken as often as needed; each one re-reads whatever has
arrived since the last.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Domain {
    #[default]
    Time,
    Frequency,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InspectorConfig {
    pub domain: Domain,
    pub scale: f32,
    pub fft_size: usize,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            domain: Domain::Time,
            scale: 1.0,
            fft_size: 256,
        }
    }
}

/// Pass-through tap feeding an `Inspector`.
pub struct AnalyserNode {
    tx: Producer<f32>,
    dropped: Arc<AtomicU64>,
}

impl GraphNode for AnalyserNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let mut dropped = 0;
        for &sample in out.iter() {
            if self.tx.push(sample).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            self.dropped.fetch_add(dropped, Ordering::Relaxed);
        }
    }
}

pub struct Inspector {
    rx: Consumer<f32>,
    dropped: Arc<AtomicU64>,
    analysis: Analysis,
    bytes: Vec<u8>,
    domain: Domain,
    scale: f32,
}

impl Inspector {
    pub fn new(ctx: &AudioContext, config: InspectorConfig) -> Result<(AnalyserNode, Self)> {
        if !is_valid_fft_size(config.fft_size) {
            return Err(Error::InvalidConfig(format!(
                "fft size must be a power of two within 32..=32768, got {}",
                config.fft_size
            )));
        }
        if !config.scale.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "inspector scale must be finite, got {}",
                config.scale
            )));
        }

        // Room for a few blocks on top of a full window.
        let capacity = config.fft_size + 4 * MAX_BLOCK_SIZE;
        let (tx, rx) = RingBuffer::<f32>::new(capacity);
        let dropped = Arc::new(AtomicU64::new(0));

        let node = AnalyserNode {
            tx,
            dropped: dropped.clone(),
        };
        let analysis = Analysis::new(config.fft_size);
        let inspector = Self {
            rx,
            dropped,
            bytes: vec![0; analysis.bin_count()],
            analysis,
            domain: config.domain,
            scale: config.scale,
        };

        debug!(
            "inspector at {} Hz: {:?}, fft size {}",
            ctx.sample_rate(),
            config.domain,
            config.fft_size
        );
        Ok((node, inspector))
    }

    pub fn fft_size(&self) -> usize {
        self.analysis.fft_size()
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Normalized view of the latest analysis frame, `fft_size / 2` long.
    pub fn snapshot(&mut self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.drain();

        match self.domain {
            Domain::Time => self.analysis.time_bytes(&mut self.bytes),
            Domain::Frequency => self.analysis.frequency_bytes(&mut self.bytes),
        }

        let domain = self.domain;
        let scale = self.scale;
        self.bytes
            .iter()
            .map(move |&byte| normalize(byte, domain, scale))
    }

    fn drain(&mut self) {
        let available = self.rx.slots();
        if let Ok(chunk) = self.rx.read_chunk(available) {
            for sample in chunk {
                self.analysis.push(sample);
            }
        }

        let dropped = self.dropped.swap(0, Ordering::Relaxed);
        if dropped > 0 {
            warn!("inspector fell behind, {dropped} samples dropped");
        }
    }
}

#[inline]
fn normalize(byte: u8, domain: Domain, scale: f32) -> f32 {
    let v = byte as f32;
    match domain {
        Domain::Time => (v / 128.0 - 1.0) * scale,
        Domain::Frequency => (v / 256.0) * scale,
    }
}
