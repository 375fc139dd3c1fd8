//! Benchmarks for complete voice chains.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sound_kit::{
    graph::{
        extensions::NodeExt,
        gain::GainNode,
        inspector::{Inspector, InspectorConfig},
        oscillator::OscNode,
        processor::{Processor, QuantizerConfig},
        trigger::Trigger,
    },
    voices::{
        fm::FmVoice,
        formant::{FormantParams, FormantVoice},
    },
    AudioContext, ContextConfig,
};

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = AudioContext::new(ContextConfig::default()).expect("valid context");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === FM ===
        // modulator → depth → carrier frequency, enveloped
        let (mut fm, node) = FmVoice::new(&ctx);
        let (amp, amp_handle) = GainNode::new(&ctx, 0.0);
        let mut envelope = Trigger::new(amp_handle);
        let mut chain = node.through(amp);
        fm.voice(220.0, 3.5, 300.0);
        fm.start(ctx.current_time());
        envelope.on_default();

        group.bench_with_input(BenchmarkId::new("fm", size), &size, |b, _| {
            b.iter(|| ctx.render_block(&mut chain, black_box(&mut buffer)))
        });

        // === FORMANT ===
        // sawtooth through three bandpass stages
        let (mut formant, mut node) = FormantVoice::new(&ctx);
        formant
            .voice(&FormantParams {
                frequencies: [700.0, 1_220.0, 2_600.0],
                q: [8.0, 10.0, 12.0],
                gains: [0.0, -6.0, -12.0],
            })
            .start(ctx.current_time());

        group.bench_with_input(BenchmarkId::new("formant", size), &size, |b, _| {
            b.iter(|| ctx.render_block(&mut node, black_box(&mut buffer)))
        });

        // === CRUSHER ===
        // oscillator → bitcrush → analyser tap
        let (osc, mut osc_handle) = OscNode::sine(&ctx, 110.0);
        osc_handle.start(ctx.current_time());
        let crusher =
            Processor::from_config(&ctx, QuantizerConfig::Bitcrush { bits: 4, period: 8 })
                .expect("valid bitcrush");
        let (tap, mut inspector) =
            Inspector::new(&ctx, InspectorConfig::default()).expect("valid inspector");
        let mut chain = osc.through(crusher).through(tap);

        group.bench_with_input(BenchmarkId::new("crusher", size), &size, |b, _| {
            b.iter(|| {
                ctx.render_block(&mut chain, black_box(&mut buffer));
                inspector.snapshot().sum::<f32>()
            })
        });
    }

    group.finish();
}
