//! Byte-valued time and frequency analysis frames.

/*
Analysis Frames
===============

An analyser keeps the most recent `fft_size` samples and answers two
questions about them, each as bytes (0..=255):

TIME DOMAIN
    byte = floor(128 * (1 + x)), clamped to 0..=255

    x = -1.0  -> 0
    x =  0.0  -> 128       (silence sits in the middle)
    x = +1.0  -> 255       (256 clamped)

FREQUENCY DOMAIN
    1. Blackman window over the fft_size history
    2. Forward FFT
    3. magnitude = |X[k]| / fft_size                for k in 0..fft_size/2
    4. smoothed[k] = 0.8 * smoothed[k] + 0.2 * magnitude
    5. dB = 20 * log10(smoothed[k])
    6. byte = floor(255 * (dB - (-100)) / (-30 - (-100))), clamped

So -100 dB and quieter reads 0, -30 dB and louder reads 255. The smoothing
state carries across frames, which is why a single loud click fades out of
the spectrum over a few frames instead of vanishing at once.

The window (not to be confused with the Blackman window) is a ring: the
oldest sample sits at `write`, and reading index j means
history[(write + j) % fft_size].
*/

use std::f32::consts::TAU;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

pub const MIN_DECIBELS: f32 = -100.0;
pub const MAX_DECIBELS: f32 = -30.0;
pub const SMOOTHING: f32 = 0.8;

pub const MIN_FFT_SIZE: usize = 32;
pub const MAX_FFT_SIZE: usize = 32_768;

pub struct Analysis {
    history: Vec<f32>,
    write: usize,
    blackman: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl Analysis {
    /// `fft_size` is expected to be a validated power of two.
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            history: vec![0.0; fft_size],
            write: 0,
            blackman: blackman_window(fft_size),
            fft,
            spectrum: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
            smoothed: vec![0.0; fft_size / 2],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.history.len()
    }

    pub fn bin_count(&self) -> usize {
        self.history.len() / 2
    }

    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.history[self.write] = sample;
        self.write = (self.write + 1) % self.history.len();
    }

    #[inline]
    fn ordered(&self, index: usize) -> f32 {
        self.history[(self.write + index) % self.history.len()]
    }

    /// Fill `out` with time-domain bytes, oldest sample first.
    pub fn time_bytes(&self, out: &mut [u8]) {
        for (j, byte) in out.iter_mut().enumerate().take(self.history.len()) {
            *byte = time_byte(self.ordered(j));
        }
    }

    /// Fill `out` with smoothed magnitude-spectrum bytes.
    pub fn frequency_bytes(&mut self, out: &mut [u8]) {
        let n = self.history.len();

        for j in 0..n {
            self.spectrum[j] = Complex::new(self.ordered(j) * self.blackman[j], 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        let scale = 1.0 / n as f32;
        for (k, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.spectrum[k].norm() * scale;
            *smoothed = SMOOTHING * *smoothed + (1.0 - SMOOTHING) * magnitude;
        }

        for (byte, &magnitude) in out.iter_mut().zip(self.smoothed.iter()) {
            *byte = frequency_byte(magnitude);
        }
    }
}

#[inline]
pub fn time_byte(sample: f32) -> u8 {
    (128.0 * (1.0 + sample)).floor().clamp(0.0, 255.0) as u8
}

#[inline]
pub fn frequency_byte(magnitude: f32) -> u8 {
    if magnitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let range = MAX_DECIBELS - MIN_DECIBELS;
    (255.0 / range * (db - MIN_DECIBELS)).floor().clamp(0.0, 255.0) as u8
}

/// Blackman window with alpha = 0.16.
pub fn blackman_window(size: usize) -> Vec<f32> {
    let alpha = 0.16;
    let a0 = 0.5 * (1.0 - alpha);
    let a1 = 0.5;
    let a2 = 0.5 * alpha;

    (0..size)
        .map(|i| {
            let x = i as f32 / size as f32;
            a0 - a1 * (TAU * x).cos() + a2 * (2.0 * TAU * x).cos()
        })
        .collect()
}

pub fn is_valid_fft_size(size: usize) -> bool {
    size.is_power_of_two() && (MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_byte_mapping() {
        assert_eq!(time_byte(-1.0), 0);
        assert_eq!(time_byte(0.0), 128);
        assert_eq!(time_byte(1.0), 255);
        assert_eq!(time_byte(-4.0), 0);
        assert_eq!(time_byte(0.5), 192);
    }

    #[test]
    fn test_frequency_byte_mapping() {
        assert_eq!(frequency_byte(0.0), 0);
        assert_eq!(frequency_byte(1.0e-6), 0); // -120 dB
        assert_eq!(frequency_byte(1.0), 255); // 0 dB
    }

    #[test]
    fn test_silence_reads_center_line() {
        let analysis = Analysis::new(64);
        let mut bytes = vec![0u8; 32];
        analysis.time_bytes(&mut bytes);
        assert!(bytes.iter().all(|&b| b == 128));
    }

    #[test]
    fn test_history_is_ordered_oldest_first() {
        let mut analysis = Analysis::new(32);
        for i in 0..40 {
            analysis.push(i as f32 / 64.0);
        }
        // last 32 pushed are 8..40, oldest first
        let mut bytes = vec![0u8; 16];
        analysis.time_bytes(&mut bytes);
        assert_eq!(bytes[0], time_byte(8.0 / 64.0));
        assert_eq!(bytes[15], time_byte(23.0 / 64.0));
    }

    #[test]
    fn test_spectrum_peaks_at_tone_bin() {
        let size = 256;
        let mut analysis = Analysis::new(size);
        let bin = 16;
        for i in 0..size {
            // -60 dB tone so neighbouring bins stay below the byte ceiling
            analysis.push(0.001 * (TAU * bin as f32 * i as f32 / size as f32).sin());
        }

        let mut bytes = vec![0u8; size / 2];
        for _ in 0..20 {
            analysis.frequency_bytes(&mut bytes);
        }

        let (peak, _) = bytes
            .iter()
            .enumerate()
            .max_by_key(|&(_, &b)| b)
            .expect("non-empty spectrum");
        assert_eq!(peak, bin);
        assert!(bytes[bin] > bytes[bin + 8]);
    }

    #[test]
    fn test_valid_fft_sizes() {
        assert!(is_valid_fft_size(32));
        assert!(is_valid_fft_size(2048));
        assert!(!is_valid_fft_size(16));
        assert!(!is_valid_fft_size(300));
        assert!(!is_valid_fft_size(65_536));
    }
}
