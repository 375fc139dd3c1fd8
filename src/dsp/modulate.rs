//! Frequency modulation primitives.

/*
Frequency Modulation
====================

FM uses one oscillator (the modulator) to wobble the frequency of another
(the carrier) at audio rate. Instead of hearing vibrato you hear new
partials: sidebands spaced at multiples of the modulator frequency around
the carrier.

Vocabulary
----------

  carrier      The oscillator you hear.

  modulator    The oscillator you don't hear directly; its output is added
               to the carrier's frequency control.

  ratio        modulator_frequency / carrier_frequency.
                 ratio 1, 2, 3 ...   harmonic spectra (brass, organ)
                 ratio 1.41, 3.7     inharmonic spectra (bells, metal)

  depth        Peak frequency deviation in Hz. The modulator outputs -1..+1,
               scaled by depth, so the carrier swings ±depth Hz.


The Math
--------

Per sample:

    carrier_frequency(t) = base_frequency + modulator(t) × depth

Example: base 440 Hz, ratio 2, depth 80
    modulator runs at 880 Hz
    carrier sweeps between 360 Hz and 520 Hz, 880 times per second
    -> sidebands at 440 ± 880k Hz

The modulation index (depth / modulator_frequency) roughly sets how many
sidebands are audible. 80 / 880 ≈ 0.09: gentle, mostly the fundamental.


Sample-Rate, Not Block-Rate
---------------------------

Filter sweeps can get away with one parameter update per block. FM cannot:
the modulator is itself an audio signal, so the deviation is applied to
every sample. The oscillator block takes its frequency per sample for this
reason.
*/

/// Calculate the modulated parameter value.
///
/// # Arguments
/// * `base_value` - The parameter's center/default value
/// * `modulator` - The control signal value (typically -1.0 to +1.0)
/// * `depth` - How much the parameter should vary
///
/// # Returns
/// The modulated value: base + (modulator × depth)
#[inline]
pub fn apply_modulation(base_value: f32, modulator: f32, depth: f32) -> f32 {
    base_value + (modulator * depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_modulation_center() {
        // Modulator at 0 should give base value
        assert_eq!(apply_modulation(440.0, 0.0, 80.0), 440.0);
    }

    #[test]
    fn test_apply_modulation_positive() {
        assert_eq!(apply_modulation(440.0, 1.0, 80.0), 520.0);
    }

    #[test]
    fn test_apply_modulation_negative() {
        assert_eq!(apply_modulation(440.0, -1.0, 80.0), 360.0);
    }

    #[test]
    fn test_apply_modulation_partial() {
        assert_eq!(apply_modulation(440.0, 0.5, 80.0), 480.0);
    }
}
