//! Crate-wide error type.
//!
//! Every failure is reported upward; nothing in this crate retries on its
//! own. Callers decide fallback policy (e.g. switching to a built-in clip when
//! an asset fails to decode).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required collaborator is missing or cannot do what is asked of it.
    /// Raised at construction time, never deferred.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// A numeric configuration value is outside its supported range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Fetching or decoding an external audio asset failed.
    #[error("decode failure: {0}")]
    DecodeFailure(String),

    /// The offline renderer could not produce a cloud.
    #[error("render failure: {0}")]
    RenderFailure(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        Error::DecodeFailure(err.to_string())
    }
}
