//! Benchmarks for offline cloud rendering.

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion};
use sound_kit::{
    voices::granular::{CloudConfig, Granular},
    AudioBuffer, AudioContext, ContextConfig,
};

pub fn bench_granular(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/granular");
    group.sample_size(10);

    let ctx = AudioContext::new(ContextConfig::default()).expect("valid context");
    let samples: Vec<f32> = (0..48_000)
        .map(|i| (i as f32 * 0.0576).sin() * 0.5)
        .collect();
    let source = Arc::new(AudioBuffer::from_mono(48_000.0, samples).expect("valid buffer"));
    let granular = Granular::new(&ctx).source(source);

    for count in [20usize, 200] {
        let cloud = granular.cloud(CloudConfig {
            transpose: 0.5,
            ..Default::default()
        });
        group.bench_with_input(BenchmarkId::new("cloud", count), &count, |b, &count| {
            b.iter(|| cloud.render(black_box(0.25), count, 0.75))
        });
    }

    group.finish();
}
