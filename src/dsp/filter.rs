use std::f32::consts::TAU;

use crate::graph::node::RenderCtx;

/*
State-Variable Band-Pass
========================

A two-integrator (TPT) state-variable filter, read at its band-pass tap.
Frequencies near the cutoff pass; everything above and below is rejected,
more steeply the higher the Q.

Q and damping
-------------

The SVF is parameterised by a damping factor k. Resonance expressed as Q
maps onto it as k = 1 / Q:

    Q = 0.5   k = 2.0   very wide band
    Q = 1     k = 1.0
    Q = 10    k = 0.1   narrow, ringing band

The raw v1 state peaks at 1 / k = Q at the cutoff; we read it scaled by k so
the passband peak sits at unity regardless of Q (the "constant peak gain"
band-pass). Formant cascades rely on that, otherwise three high-Q stages
would explode.

Gain
----

`gain_db` is carried with the other settings so it can be automated and
read back, but a band-pass has no gain term: like a Web Audio biquad of
type "bandpass", the response ignores it.
*/

/// Smallest Q accepted; keeps k finite.
const MIN_Q: f32 = 1.0e-4;
/// Cutoff ceiling as a fraction of the sample rate (just under Nyquist).
const MAX_CUTOFF_RATIO: f32 = 0.49;

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
    pub gain_db: f32,
}

impl SVFilter {
    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: 1.0,
            gain_db: 0.0,
        }
    }

    #[inline]
    fn compute_g(&self, ctx: &RenderCtx) -> f32 {
        let cutoff = self.cutoff_hz.clamp(0.0, MAX_CUTOFF_RATIO * ctx.sample_rate);
        (TAU * cutoff / (2.0 * ctx.sample_rate)).tan()
    }

    #[inline]
    fn compute_k(&self) -> f32 {
        1.0 / self.q.max(MIN_Q)
    }

    /// One band-pass sample.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> f32 {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        k * v1
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        let g = self.compute_g(ctx);
        let k = self.compute_k();

        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, k, g);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q;
    }

    pub fn set_gain_db(&mut self, gain_db: f32) {
        self.gain_db = gain_db;
    }
}
