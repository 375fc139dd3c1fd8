//! Seeded pseudo-random scalars for reproducible grain placement.

/*
Simple Seeded Random
====================

Granular clouds scatter their grains around a playback position. To make a
cloud sound the same every time it is rendered, the scatter comes from a
tiny deterministic generator rather than from the OS entropy pool.

The Recurrence
--------------

  seed  <- seed + 1
  value  = ((seed * C) mod M) / M * (hi - lo) + lo

    C = 15485863^3     (the millionth prime, cubed)
    M = 2038074743     (the hundred-millionth prime)

Everything is computed in f64. C does not fit in the 53-bit mantissa, so
the product is rounded; that rounding is part of the sequence and must be
reproduced exactly. 15485863^2 is still exact, so computing C as
`square * base` rounds once, to the nearest representable value.

The modulo uses the Euclidean remainder, so negative seeds still land in
[lo, hi) instead of below `lo`.

Same seed + same call sequence = same values. Always.
*/

/// 15485863, the millionth prime.
const BASE: f64 = 15_485_863.0;
/// BASE cubed, rounded once.
const MULTIPLIER: f64 = BASE * BASE * BASE;
/// 2038074743, the hundred-millionth prime.
const MODULUS: f64 = 2_038_074_743.0;

/// Seed for a randomised component. `None` disables randomisation.
pub type Seed = Option<f64>;

/// Deterministic scalar generator advanced by one on every draw.
#[derive(Debug, Clone)]
pub struct SimpleRandom {
    seed: f64,
}

impl SimpleRandom {
    pub fn new(seed: f64) -> Self {
        Self { seed }
    }

    /// Draw a value in `[lo, hi)`.
    ///
    /// When `lo == hi` the result is exactly `lo`.
    pub fn draw(&mut self, lo: f64, hi: f64) -> f64 {
        self.seed += 1.0;
        let unit = (self.seed * MULTIPLIER).rem_euclid(MODULUS) / MODULUS;
        unit * (hi - lo) + lo
    }

    /// Current internal seed (advanced once per draw).
    pub fn seed(&self) -> f64 {
        self.seed
    }
}

/// Constrain `value` to `[lo, hi]`.
///
/// Unlike `f64::clamp` this never panics on an inverted range; `lo` wins.
#[inline]
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    lo.max(value.min(hi))
}

/// Constrain `value` to `[0, 1]`.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimpleRandom::new(2.0);
        let mut b = SimpleRandom::new(2.0);

        for _ in 0..256 {
            assert_eq!(a.draw(0.0, 1.0).to_bits(), b.draw(0.0, 1.0).to_bits());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SimpleRandom::new(2.0);
        let mut b = SimpleRandom::new(3.0);

        assert!((0..32).any(|_| a.draw(0.0, 1.0) != b.draw(0.0, 1.0)));
    }

    #[test]
    fn draws_stay_in_range() {
        let mut rand = SimpleRandom::new(2.0);

        for _ in 0..10_000 {
            let v = rand.draw(-0.5, 1.5);
            assert!((-0.5..1.5).contains(&v), "draw out of range: {v}");
        }
    }

    #[test]
    fn negative_seed_stays_in_range() {
        let mut rand = SimpleRandom::new(-1_000.5);

        for _ in 0..1_000 {
            let v = rand.draw(0.25, 0.75);
            assert!((0.25..0.75).contains(&v), "draw out of range: {v}");
        }
    }

    #[test]
    fn seed_advances_by_one() {
        let mut rand = SimpleRandom::new(2.0);
        rand.draw(0.0, 1.0);
        rand.draw(0.0, 1.0);
        assert_eq!(rand.seed(), 4.0);
    }

    #[test]
    fn matches_reference_value() {
        // seed 2 -> first draw uses s = 3
        let mut rand = SimpleRandom::new(2.0);
        let expected = (3.0 * MULTIPLIER).rem_euclid(MODULUS) / MODULUS;
        assert_eq!(rand.draw(0.0, 1.0), expected);
    }

    #[test]
    fn collapsed_range_returns_lo() {
        let mut rand = SimpleRandom::new(7.0);
        for _ in 0..16 {
            assert_eq!(rand.draw(1.0, 1.0), 1.0);
        }
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
        assert_eq!(clamp(-3.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(3.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp_unit(1.5), 1.0);

        for i in -20..20 {
            let v = i as f64 * 0.13;
            let c = clamp(v, -1.0, 1.0);
            assert!((-1.0..=1.0).contains(&c));
            if (-1.0..=1.0).contains(&v) {
                assert_eq!(c, v);
            }
        }
    }
}
