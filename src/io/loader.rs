use std::{fs, io::Cursor, path::Path};

use hound::{SampleFormat, WavReader};
use log::debug;

use crate::{
    error::{Error, Result},
    io::buffer::AudioBuffer,
    render::deferred::Deferred,
};

/// Read an asset's raw bytes.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|e| Error::DecodeFailure(format!("reading '{}': {e}", path.display())))?;

    debug!("loaded {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Decode WAV bytes into planar float PCM at the file's own sample rate.
pub fn decode(bytes: &[u8]) -> Result<AudioBuffer> {
    let mut reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    let channel_count = spec.channels as usize;
    if channel_count == 0 {
        return Err(Error::DecodeFailure("wav declares zero channels".into()));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << spec.bits_per_sample.saturating_sub(1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let frames = interleaved.len() / channel_count;
    let mut channels = vec![Vec::with_capacity(frames); channel_count];
    for frame in interleaved.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    debug!(
        "decoded {frames} frames, {channel_count} channels at {} Hz",
        spec.sample_rate
    );
    AudioBuffer::new(spec.sample_rate as f32, channels)
        .map_err(|e| Error::DecodeFailure(e.to_string()))
}

/// `load` then `decode`.
pub fn load_buffer(path: impl AsRef<Path>) -> Result<AudioBuffer> {
    let path = path.as_ref();
    let bytes = load(path)?;
    decode(&bytes).map_err(|e| match e {
        Error::DecodeFailure(msg) => {
            Error::DecodeFailure(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Load and decode on the worker pool.
pub fn spawn_load(path: impl AsRef<Path>) -> Deferred<AudioBuffer> {
    let path = path.as_ref().to_path_buf();
    Deferred::spawn_with(Error::DecodeFailure, move || load_buffer(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn wav_bytes(spec: WavSpec, write: impl FnOnce(&mut WavWriter<&mut Cursor<Vec<u8>>>)) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).expect("writer");
            write(&mut writer);
            writer.finalize().expect("finalize");
        }
        cursor.into_inner()
    }

    #[test]
    fn decodes_int_stereo() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, |w| {
            for (l, r) in [(16_384_i16, -16_384_i16), (0, 32_767)] {
                w.write_sample(l).expect("sample");
                w.write_sample(r).expect("sample");
            }
        });

        let buffer = decode(&bytes).expect("decodes");
        assert_eq!(buffer.sample_rate(), 22_050.0);
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.channel(0), Some(&[0.5, 0.0][..]));
        assert_eq!(buffer.channel(1).map(|c| c[0]), Some(-0.5));
    }

    #[test]
    fn decodes_float_mono() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 48_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let bytes = wav_bytes(spec, |w| {
            for s in [0.25_f32, -0.75, 1.0] {
                w.write_sample(s).expect("sample");
            }
        });

        let buffer = decode(&bytes).expect("decodes");
        assert_eq!(buffer.channel(0), Some(&[0.25, -0.75, 1.0][..]));
    }

    #[test]
    fn garbage_is_a_decode_failure() {
        assert!(matches!(
            decode(b"definitely not a wav file"),
            Err(Error::DecodeFailure(_))
        ));
    }

    #[test]
    fn missing_file_is_a_decode_failure() {
        assert!(matches!(
            load_buffer("/nonexistent/impulse.wav"),
            Err(Error::DecodeFailure(_))
        ));
        assert!(matches!(
            spawn_load("/nonexistent/impulse.wav").wait(),
            Err(Error::DecodeFailure(_))
        ));
    }
}
