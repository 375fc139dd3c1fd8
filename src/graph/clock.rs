use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Shared monotonic audio clock.
///
/// Counts frames rendered by the audio path. Control code reads it to stamp
/// automation events; only the render driver advances it.
#[derive(Debug, Clone)]
pub struct AudioClock {
    frames: Arc<AtomicU64>,
    sample_rate: f32,
}

impl AudioClock {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate,
        }
    }

    /// Current clock time in seconds.
    pub fn now(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::AcqRel);
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
