// Purpose - audio data and the way it gets into the process

/// Immutable planar PCM buffers.
pub mod buffer;
/// Asset loading and WAV decoding.
pub mod loader;

pub use buffer::AudioBuffer;
pub use loader::{decode, load, load_buffer, spawn_load};
