//! Equal-power stereo panning.
//!
//! `pan` runs from -1 (hard left) through 0 (centre) to +1 (hard right).
//!
//! # Mono input
//!
//! ```text
//! x = (pan + 1) / 2
//! left  = in * cos(x * π/2)
//! right = in * sin(x * π/2)
//! ```
//!
//! At the centre both sides get `cos(π/4) ≈ 0.707`, so the summed power
//! stays constant as the source moves across the field.
//!
//! # Stereo input
//!
//! Panning a stereo pair folds one side into the other instead of
//! attenuating the whole image:
//!
//! ```text
//! pan <= 0:  x = pan + 1
//!            left  = l + r * cos(x * π/2)
//!            right =     r * sin(x * π/2)
//!
//! pan > 0:   x = pan
//!            left  = l * cos(x * π/2)
//!            right = r + l * sin(x * π/2)
//! ```
//!
//! At pan = 0 a stereo pair passes through unchanged.

use std::f32::consts::FRAC_PI_2;

/// Pan a mono sample into (left, right).
#[inline]
pub fn pan_mono(sample: f32, pan: f32) -> (f32, f32) {
    let x = (pan.clamp(-1.0, 1.0) + 1.0) * 0.5;
    let angle = x * FRAC_PI_2;
    (sample * angle.cos(), sample * angle.sin())
}

/// Pan a stereo pair.
#[inline]
pub fn pan_stereo(left: f32, right: f32, pan: f32) -> (f32, f32) {
    let pan = pan.clamp(-1.0, 1.0);
    if pan <= 0.0 {
        let angle = (pan + 1.0) * FRAC_PI_2;
        (left + right * angle.cos(), right * angle.sin())
    } else {
        let angle = pan * FRAC_PI_2;
        (left * angle.cos(), right + left * angle.sin())
    }
}
