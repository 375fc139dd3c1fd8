//! Granular cloud voice.
//!
//! Granular synthesis chops a recording into short overlapping grains and
//! plays them back with their own timing, pitch, pan and fade. A handful of
//! grains sounds like a stutter; a dense cloud turns a single moment of the
//! recording into a sustained texture.
//!
//! # Placement
//!
//! A cloud is centred on `position` (a fraction of the source length).
//! Grains read from a window around that centre:
//!
//! ```text
//! center = position * duration
//! range  = spread * (duration - center)
//! lo     = clamp(center - range, 0, duration)
//! hi     = clamp(center + range, 0, duration)
//!
//! 0 ──────────[ lo ···· center ···· hi ]──────── duration
//!                ▲ grain read offsets land in here
//! ```
//!
//! Each grain then reads from `onset + offset`, so a cloud scans forward
//! through the source as it plays. Grains whose read point runs past the
//! end stay silent.
//!
//! Offsets come from a seeded [`SimpleRandom`], one per cloud, so the same
//! seed always gives the same cloud. Without a seed the window collapses to
//! the centre and every grain is offset by exactly the playback position.
//!
//! # Timing
//!
//! Grain `i` starts `i * grain_duration * delay` seconds into the render.
//! `delay < 1` overlaps grains into a dense cloud; `delay > 1` leaves gaps.
//!
//! # Example
//!
//! ```ignore
//! let ctx = AudioContext::new(ContextConfig::default())?;
//! let source = Arc::new(load_buffer("voice.wav")?);
//! let cloud = Granular::new(&ctx).source(source).cloud(CloudConfig {
//!     duration: 0.08,
//!     delay: 0.5,
//!     ..Default::default()
//! });
//! let texture = cloud.spawn(0.4, 40, 0.75).wait()?;
//! ```

use std::sync::Arc;

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::random::{clamp, clamp_unit, Seed, SimpleRandom},
    error::{Error, Result},
    graph::context::AudioContext,
    io::buffer::AudioBuffer,
    render::{deferred::Deferred, OfflineRenderer, RenderJob, SoftwareRenderer},
};

/// Shape of every grain in a cloud.
///
/// Unset fields fall back to their defaults when deserialized.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudConfig {
    /// Fade-in, as a fraction of grain duration.
    pub attack: f64,
    /// Onset spacing, as a fraction of grain duration.
    pub delay: f64,
    /// Grain length in seconds of source material.
    pub duration: f64,
    /// -1 (left) to 1 (right).
    pub pan: f32,
    /// Fade-out, as a fraction of grain duration.
    pub release: f64,
    /// `None` disables randomized placement.
    pub seed: Seed,
    /// Read window half-width, as a fraction of the remaining source.
    pub spread: f64,
    /// Pitch shift in octaves.
    pub transpose: f64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            attack: 0.1,
            delay: 1.0,
            duration: 0.1,
            pan: 0.0,
            release: 0.5,
            seed: Some(2.0),
            spread: 0.9,
            transpose: 0.0,
        }
    }
}

impl CloudConfig {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.attack,
            self.delay,
            self.duration,
            self.release,
            self.spread,
            self.transpose,
            self.pan as f64,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "cloud settings must be finite: {self:?}"
            )));
        }
        if self.duration <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "grain duration must be positive, got {}",
                self.duration
            )));
        }
        if self.delay < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "grain delay cannot be negative, got {}",
                self.delay
            )));
        }
        Ok(())
    }
}

/// One scheduled grain. Times are seconds on the render timeline, which
/// starts at 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grain {
    pub onset: f64,
    /// Offset drawn from the read window, seconds.
    pub offset: f64,
    /// Where playback starts in the source: `onset + offset`, clamped to
    /// the source. A grain starting at the very end is silent.
    pub start: f64,
    /// Seconds of source material played.
    pub duration: f64,
    pub pan: f32,
    /// Cents.
    pub detune: f32,
    /// Seconds.
    pub attack: f64,
    /// Seconds, starting when the attack ends.
    pub release: f64,
    pub volume: f32,
}

/// Lay out `count` grains over a source `source_duration` seconds long.
pub fn schedule(
    config: &CloudConfig,
    source_duration: f64,
    position: f64,
    count: usize,
    volume: f32,
) -> Vec<Grain> {
    let spread = if config.seed.is_some() {
        config.spread
    } else {
        0.0
    };
    let mut random = SimpleRandom::new(config.seed.unwrap_or_default());

    let center = clamp_unit(position) * source_duration;
    let range = spread * (source_duration - center);
    let lo = clamp(center - range, 0.0, source_duration);
    let hi = clamp(center + range, 0.0, source_duration);

    let attack = config.duration * clamp_unit(config.attack);
    let release = config.duration * clamp_unit(config.release);
    let detune = (config.transpose * 1200.0) as f32;

    (0..count)
        .map(|i| {
            let onset = i as f64 * config.duration * config.delay;
            let offset = clamp(random.draw(lo, hi), 0.0, source_duration);

            Grain {
                onset,
                offset,
                start: clamp(onset + offset, 0.0, source_duration),
                duration: config.duration,
                pan: config.pan.clamp(-1.0, 1.0),
                detune,
                attack,
                release,
                volume,
            }
        })
        .collect()
}

/// Granular engine bound to a context's output format.
pub struct Granular<R = SoftwareRenderer> {
    channel_count: usize,
    sample_rate: f32,
    renderer: Arc<R>,
}

impl Granular<SoftwareRenderer> {
    pub fn new(ctx: &AudioContext) -> Self {
        Self {
            channel_count: ctx.channel_count(),
            sample_rate: ctx.sample_rate(),
            renderer: Arc::new(SoftwareRenderer),
        }
    }
}

impl<R: OfflineRenderer + 'static> Granular<R> {
    /// Swap in a different offline backend.
    pub fn with_renderer<S: OfflineRenderer + 'static>(self, renderer: S) -> Granular<S> {
        Granular {
            channel_count: self.channel_count,
            sample_rate: self.sample_rate,
            renderer: Arc::new(renderer),
        }
    }

    pub fn source(&self, buffer: Arc<AudioBuffer>) -> GrainSource<R> {
        GrainSource {
            buffer,
            channel_count: self.channel_count,
            sample_rate: self.sample_rate,
            renderer: self.renderer.clone(),
        }
    }
}

/// A granular engine with its source buffer chosen.
pub struct GrainSource<R = SoftwareRenderer> {
    buffer: Arc<AudioBuffer>,
    channel_count: usize,
    sample_rate: f32,
    renderer: Arc<R>,
}

impl<R: OfflineRenderer + 'static> GrainSource<R> {
    pub fn cloud(&self, config: CloudConfig) -> Cloud<R> {
        Cloud {
            buffer: self.buffer.clone(),
            config,
            channel_count: self.channel_count,
            sample_rate: self.sample_rate,
            renderer: self.renderer.clone(),
        }
    }

    pub fn buffer(&self) -> &AudioBuffer {
        &self.buffer
    }
}

/// A configured cloud, ready to render at any position.
pub struct Cloud<R = SoftwareRenderer> {
    buffer: Arc<AudioBuffer>,
    config: CloudConfig,
    channel_count: usize,
    sample_rate: f32,
    renderer: Arc<R>,
}

impl<R: OfflineRenderer + 'static> Cloud<R> {
    pub const POSITION: f64 = 0.0;
    pub const COUNT: usize = 20;
    pub const VOLUME: f32 = 0.75;

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// The grains a render at `position` would play.
    pub fn grains(&self, position: f64, count: usize, volume: f32) -> Vec<Grain> {
        schedule(&self.config, self.buffer.duration(), position, count, volume)
    }

    /// The full offline job for a render at `position`.
    pub fn job(&self, position: f64, count: usize, volume: f32) -> Result<RenderJob> {
        self.config.validate()?;
        if !position.is_finite() || !volume.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "position and volume must be finite, got {position} and {volume}"
            )));
        }

        Ok(RenderJob {
            channel_count: self.channel_count,
            frames: self.buffer.len(),
            sample_rate: self.sample_rate,
            source: self.buffer.clone(),
            grains: self.grains(position, count, volume),
        })
    }

    /// Render on the calling thread.
    pub fn render(&self, position: f64, count: usize, volume: f32) -> Result<AudioBuffer> {
        let job = self.job(position, count, volume)?;
        debug!(
            "rendering cloud at {position:.3}: {count} grains of {}s",
            self.config.duration
        );
        self.renderer.render(&job)
    }

    /// Render on the worker pool.
    pub fn spawn(&self, position: f64, count: usize, volume: f32) -> Deferred<AudioBuffer> {
        let job = match self.job(position, count, volume) {
            Ok(job) => job,
            Err(err) => return Deferred::ready(Err(err)),
        };

        debug!("spawning cloud at {position:.3}: {count} grains");
        let renderer = self.renderer.clone();
        Deferred::spawn(move || renderer.render(&job))
    }

    /// `render` with the default position, count and volume.
    pub fn render_default(&self) -> Result<AudioBuffer> {
        self.render(Self::POSITION, Self::COUNT, Self::VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CloudConfig::default();
        assert_eq!(config.attack, 0.1);
        assert_eq!(config.delay, 1.0);
        assert_eq!(config.duration, 0.1);
        assert_eq!(config.pan, 0.0);
        assert_eq!(config.release, 0.5);
        assert_eq!(config.seed, Some(2.0));
        assert_eq!(config.spread, 0.9);
        assert_eq!(config.transpose, 0.0);
    }

    #[test]
    fn disabled_seed_reads_the_centre() {
        let config = CloudConfig {
            seed: None,
            ..Default::default()
        };
        let grains = schedule(&config, 2.0, 0.5, 12, 0.75);

        assert_eq!(grains.len(), 12);
        assert!(grains.iter().all(|g| g.offset == 1.0));
    }

    #[test]
    fn reads_scan_forward_with_onset() {
        let config = CloudConfig {
            seed: None,
            ..Default::default()
        };
        let grains = schedule(&config, 2.0, 0.5, 5, 0.75);

        for (i, grain) in grains.iter().enumerate() {
            let expected = 1.0 + i as f64 * 0.1;
            assert!((grain.start - expected).abs() < 1e-12, "{grain:?}");
        }
    }

    #[test]
    fn reads_clamp_to_the_source_end() {
        let config = CloudConfig {
            seed: None,
            ..Default::default()
        };
        let grains = schedule(&config, 1.0, 0.9, 4, 0.75);

        assert!(grains.iter().all(|g| g.offset == 0.9));
        assert_eq!(grains[3].start, 1.0);
    }

    #[test]
    fn offsets_stay_inside_the_window() {
        let config = CloudConfig::default();
        let grains = schedule(&config, 3.0, 0.25, 200, 0.75);

        // centre 0.75, range 0.9 * 2.25 = 2.025
        let lo = 0.0;
        let hi = 0.75 + 2.025;
        assert!(grains.iter().all(|g| (lo..hi).contains(&g.offset)));
        assert!(grains.windows(2).any(|w| w[0].offset != w[1].offset));
    }

    #[test]
    fn onsets_follow_delay() {
        let config = CloudConfig {
            duration: 0.2,
            delay: 0.5,
            ..Default::default()
        };
        let grains = schedule(&config, 1.0, 0.0, 4, 1.0);

        let onsets: Vec<f64> = grains.iter().map(|g| g.onset).collect();
        for (i, onset) in onsets.iter().enumerate() {
            assert!((onset - i as f64 * 0.1).abs() < 1e-12);
        }
    }

    #[test]
    fn envelope_fractions_are_clamped() {
        let config = CloudConfig {
            attack: 2.0,
            release: -1.0,
            transpose: -1.0,
            ..Default::default()
        };
        let grain = schedule(&config, 1.0, 0.0, 1, 1.0)[0];

        assert_eq!(grain.attack, config.duration);
        assert_eq!(grain.release, 0.0);
        assert_eq!(grain.detune, -1200.0);
    }

    #[test]
    fn same_seed_same_cloud() {
        let config = CloudConfig {
            seed: Some(7.0),
            ..Default::default()
        };
        assert_eq!(
            schedule(&config, 2.0, 0.3, 16, 0.5),
            schedule(&config, 2.0, 0.3, 16, 0.5)
        );
    }

    #[test]
    fn invalid_config_is_rejected_before_rendering() {
        let config = CloudConfig {
            duration: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
