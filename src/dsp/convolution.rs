//! Uniformly partitioned FFT convolution.

/*
Partitioned Convolution
=======================

Convolving with a long impulse response (a recorded room, a plate) is too
expensive sample by sample. The FFT turns convolution into multiplication,
but a single FFT over the whole response would add seconds of latency.

The compromise is to cut the response into partitions of B samples:

    h = [ h0 | h1 | h2 | ... | hP-1 ]      each partition B samples

and to process the input in blocks of B as well. Every partition gets its
spectrum computed once, up front, zero-padded to 2B:

    H[p] = FFT( hp ++ zeros(B) )

For each new input block we take the FFT of the last 2B input samples and
push it onto a frequency-domain delay line (FDL). The output block is

    y = last B samples of IFFT( Σp  X[now - p] · H[p] ) / 2B

which is overlap-save: the first B samples of the inverse transform are
circular wrap-around and get discarded.

    input  ──► [ prev B | new B ] ──FFT──► FDL ──┐
                                                 ├─ Σ X·H ──IFFT──► out
    H[0] H[1] ... H[P-1] ────────────────────────┘

Latency is exactly one partition (B samples). Everything is allocated at
construction; `process` only reads and writes preallocated buffers.

Normalization
-------------
Recorded responses vary wildly in level. Like a browser convolver with
`normalize = true`, the response is scaled by

    scale = 0.00125 / max(rms(h), 0.000125) * 44100 / sample_rate

so different rooms come out at comparable loudness.
*/

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Partition length used by the convolver node.
pub const PARTITION_SIZE: usize = 128;

const GAIN_CALIBRATION: f32 = 0.001_25;
const GAIN_CALIBRATION_SAMPLE_RATE: f32 = 44_100.0;
const MIN_POWER: f32 = 0.000_125;

pub struct PartitionedConvolver {
    partition: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    responses: Vec<Vec<Complex<f32>>>,
    history: Vec<Vec<Complex<f32>>>,
    head: usize,
    window: Vec<f32>,
    output: Vec<f32>,
    position: usize,
    spectrum: Vec<Complex<f32>>,
    sum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl PartitionedConvolver {
    /// `partition` must be non-zero. An empty impulse behaves as silence.
    pub fn new(impulse: &[f32], partition: usize) -> Self {
        let partition = partition.max(1);
        let size = 2 * partition;

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        let mut scratch = vec![Complex::new(0.0, 0.0); scratch_len];

        let count = impulse.len().div_ceil(partition).max(1);
        let mut responses = Vec::with_capacity(count);
        for p in 0..count {
            let mut spectrum = vec![Complex::new(0.0, 0.0); size];
            let start = p * partition;
            let end = (start + partition).min(impulse.len());
            if start < end {
                for (bin, &tap) in spectrum.iter_mut().zip(&impulse[start..end]) {
                    *bin = Complex::new(tap, 0.0);
                }
            }
            forward.process_with_scratch(&mut spectrum, &mut scratch);
            responses.push(spectrum);
        }

        Self {
            partition,
            forward,
            inverse,
            history: vec![vec![Complex::new(0.0, 0.0); size]; count],
            responses,
            head: 0,
            window: vec![0.0; size],
            output: vec![0.0; partition],
            position: 0,
            spectrum: vec![Complex::new(0.0, 0.0); size],
            sum: vec![Complex::new(0.0, 0.0); size],
            scratch,
        }
    }

    /// Samples of delay between input and output.
    pub fn latency(&self) -> usize {
        self.partition
    }

    /// Convolve `buffer` in place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        let b = self.partition;
        for sample in buffer.iter_mut() {
            self.window[b + self.position] = *sample;
            *sample = self.output[self.position];

            self.position += 1;
            if self.position == b {
                self.position = 0;
                self.process_partition();
            }
        }
    }

    pub fn reset(&mut self) {
        self.window.fill(0.0);
        self.output.fill(0.0);
        for spectrum in &mut self.history {
            spectrum.fill(Complex::new(0.0, 0.0));
        }
        self.head = 0;
        self.position = 0;
    }

    fn process_partition(&mut self) {
        let b = self.partition;
        let count = self.responses.len();

        for (bin, &x) in self.spectrum.iter_mut().zip(&self.window) {
            *bin = Complex::new(x, 0.0);
        }
        self.forward
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);
        self.history[self.head].copy_from_slice(&self.spectrum);

        self.sum.fill(Complex::new(0.0, 0.0));
        for (p, response) in self.responses.iter().enumerate() {
            let input = &self.history[(self.head + count - p) % count];
            for ((acc, x), h) in self.sum.iter_mut().zip(input).zip(response) {
                *acc += x * h;
            }
        }

        self.inverse
            .process_with_scratch(&mut self.sum, &mut self.scratch);
        let scale = 1.0 / (2 * b) as f32;
        for (out, bin) in self.output.iter_mut().zip(&self.sum[b..]) {
            *out = bin.re * scale;
        }

        self.window.copy_within(b.., 0);
        self.head = (self.head + 1) % count;
    }
}

/// Loudness normalization factor for an impulse response.
pub fn normalization_scale(channels: &[Vec<f32>], sample_rate: f32) -> f32 {
    let samples: usize = channels.iter().map(Vec::len).sum();
    if samples == 0 {
        return 1.0;
    }

    let energy: f32 = channels.iter().flatten().map(|s| s * s).sum();
    let mut power = (energy / samples as f32).sqrt();
    if !power.is_finite() || power < MIN_POWER {
        power = MIN_POWER;
    }

    GAIN_CALIBRATION / power * GAIN_CALIBRATION_SAMPLE_RATE / sample_rate
}
