#![cfg(feature = "serde")]

use sound_kit::{
    graph::{
        inspector::{Domain, InspectorConfig},
        processor::QuantizerConfig,
    },
    voices::{formant::FormantParams, granular::CloudConfig},
    ContextConfig,
};

#[test]
fn partial_cloud_config_keeps_defaults() {
    let config: CloudConfig =
        serde_json::from_str(r#"{ "duration": 0.2, "seed": null }"#).expect("parse");

    assert_eq!(config.duration, 0.2);
    assert_eq!(config.seed, None);
    assert_eq!(config.spread, CloudConfig::default().spread);
    assert_eq!(config.release, CloudConfig::default().release);
}

#[test]
fn inspector_and_context_configs() {
    let inspector: InspectorConfig =
        serde_json::from_str(r#"{ "fft_size": 1024 }"#).expect("parse");
    assert_eq!(inspector.fft_size, 1024);
    assert_eq!(inspector.domain, Domain::Time);
    assert_eq!(inspector.scale, 1.0);

    let context: ContextConfig =
        serde_json::from_str(r#"{ "sample_rate": 44100.0 }"#).expect("parse");
    assert_eq!(context.sample_rate, 44_100.0);
    assert_eq!(context.channel_count, ContextConfig::default().channel_count);
}

#[test]
fn quantizer_and_formant_round_trip() {
    let quantizer = QuantizerConfig::Bitcrush { bits: 8, period: 4 };
    let json = serde_json::to_string(&quantizer).expect("serialize");
    assert_eq!(
        serde_json::from_str::<QuantizerConfig>(&json).expect("parse"),
        quantizer
    );

    let formant: FormantParams =
        serde_json::from_str(r#"{ "frequencies": [700.0, 1220.0, 2600.0] }"#).expect("parse");
    assert_eq!(formant.frequencies, [700.0, 1_220.0, 2_600.0]);
    assert_eq!(formant.q, [1.0; 3]);
    assert_eq!(formant.gains, [0.0; 3]);
}
