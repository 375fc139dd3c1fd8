pub mod dsp; // Signal-processing math
pub mod error;
pub mod fx; // Ready-made effect constructors
pub mod graph; // Composable audio graph nodes
pub mod io; // Buffers, asset loading and decoding
pub mod render; // Offline rendering and deferred results
pub mod voices; // FM, formant and granular voices

pub use error::{Error, Result};
pub use graph::context::{AudioContext, ContextConfig};
pub use io::buffer::AudioBuffer;

pub const MAX_BLOCK_SIZE: usize = 2048;
