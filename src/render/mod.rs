//! Offline (faster than realtime) rendering.
//!
//! A granular cloud is not streamed through the live graph. It is described
//! as a [`RenderJob`], handed to an [`OfflineRenderer`] and comes back as a
//! finished [`AudioBuffer`], optionally through a [`Deferred`] so the caller
//! can keep working while the pool renders.

use std::sync::Arc;

use crate::{error::Result, io::buffer::AudioBuffer, voices::granular::Grain};

/// Deferred results delivered by the worker pool.
pub mod deferred;
/// The built-in software renderer.
pub mod software;

pub use deferred::Deferred;
pub use software::SoftwareRenderer;

/// Everything needed to render one cloud.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub channel_count: usize,
    pub frames: usize,
    pub sample_rate: f32,
    pub source: Arc<AudioBuffer>,
    pub grains: Vec<Grain>,
}

/// Renders a job to completion or fails outright; no partial output.
pub trait OfflineRenderer: Send + Sync {
    fn render(&self, job: &RenderJob) -> Result<AudioBuffer>;
}

impl<R: OfflineRenderer + ?Sized> OfflineRenderer for Arc<R> {
    fn render(&self, job: &RenderJob) -> Result<AudioBuffer> {
        (**self).render(job)
    }
}
