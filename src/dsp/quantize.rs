//! Quantization / Bitcrushing
//!
//! A bitcrusher throws resolution away on purpose, in two directions at once:
//!
//! - **Amplitude**: each sample is snapped onto a coarse grid of `2^bits`
//!   steps per unit, like a low bit-depth converter.
//! - **Time**: the snapped value is held for `period` samples before the next
//!   one is taken, like a converter running at `sample_rate / period`.
//!
//! # The Grid
//!
//! ```text
//! step = 2^-bits
//! snap(x) = floor(x / step + 0.5) * step      (round half up)
//! ```
//!
//!   bits = 16  step ≈ 0.0000153   transparent grid, decimation dominates
//!   bits = 8   step ≈ 0.0039      audible hiss and grit
//!   bits = 4   step = 0.0625      crunchy, stair-stepped
//!   bits = 1   step = 0.5         five levels across [-1, 1]
//!
//! # Sample and Hold Through the Output
//!
//! The per-sample callback receives the previous *output* as its
//! accumulator. Returning the accumulator repeats the last snapped value, so
//! between snap points the output is a flat line:
//!
//! ```text
//! index:   0   1   2  ...  8   9  10  ...  19
//! output:  h   h   h  ...  h   S   S  ...  S'
//!            held from before   ^ snap      ^ next snap
//! ```

/// Quantization step for a bit depth: `2^-bits`.
#[inline]
pub fn step_for_bits(bits: u32) -> f32 {
    0.5_f32.powi(bits as i32)
}

/// Snap `sample` to the nearest multiple of `step` (halves round up).
#[inline]
pub fn snap(sample: f32, step: f32) -> f32 {
    (sample / step + 0.5).floor() * step
}

/// True on the last sample of each `period`-long group of a block.
#[inline]
pub fn is_snap_index(index: usize, period: usize) -> bool {
    (index + 1) % period == 0
}

/// One bitcrusher step.
///
/// Returns the snapped input on snap indices and the accumulator otherwise.
#[inline]
pub fn bitcrush(index: usize, sample: f32, accumulator: f32, step: f32, period: usize) -> f32 {
    if is_snap_index(index, period) {
        snap(sample, step)
    } else {
        accumulator
    }
}
