use crate::error::{Error, Result};

/// Immutable planar PCM audio.
///
/// Every channel holds the same number of frames, and there is always at
/// least one channel with at least one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: f32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn new(sample_rate: f32, channels: Vec<Vec<f32>>) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(Error::InvalidSource(format!(
                "buffer sample rate must be positive, got {sample_rate}"
            )));
        }
        let Some(frames) = channels.first().map(Vec::len) else {
            return Err(Error::InvalidSource("buffer has no channels".into()));
        };
        if frames == 0 {
            return Err(Error::InvalidSource("buffer has no frames".into()));
        }
        if channels.iter().any(|c| c.len() != frames) {
            return Err(Error::InvalidSource(
                "buffer channels differ in length".into(),
            ));
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    pub fn from_mono(sample_rate: f32, samples: Vec<f32>) -> Result<Self> {
        Self::new(sample_rate, vec![samples])
    }

    pub fn silence(sample_rate: f32, channel_count: usize, frames: usize) -> Result<Self> {
        Self::new(sample_rate, vec![vec![0.0; frames]; channel_count])
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Length in frames.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Linearly interpolated read at a fractional frame position.
    ///
    /// Positions outside the buffer read as silence.
    #[inline]
    pub fn read(&self, channel: usize, position: f64) -> f32 {
        let Some(data) = self.channels.get(channel) else {
            return 0.0;
        };
        if position < 0.0 || !position.is_finite() {
            return 0.0;
        }

        let index = position.floor() as usize;
        let frac = (position - index as f64) as f32;
        let a = data.get(index).copied().unwrap_or(0.0);
        let b = data.get(index + 1).copied().unwrap_or(0.0);
        a + (b - a) * frac
    }

    /// Copy of this buffer converted to `sample_rate` by linear interpolation.
    pub fn resampled(&self, sample_rate: f32) -> Result<Self> {
        if sample_rate == self.sample_rate {
            return Ok(self.clone());
        }
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(Error::InvalidSource(format!(
                "cannot resample to {sample_rate} Hz"
            )));
        }

        let ratio = self.sample_rate as f64 / sample_rate as f64;
        let frames = ((self.len() as f64 / ratio).round() as usize).max(1);
        let channels = (0..self.channel_count())
            .map(|c| (0..frames).map(|i| self.read(c, i as f64 * ratio)).collect())
            .collect();

        Self::new(sample_rate, channels)
    }
}
