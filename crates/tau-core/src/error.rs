//! Error type shared across tau-core.
//!
//! A missing storage key is not an error: lookups return `Option`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TauError {
    /// Codec table index outside `[0, len)`.
    #[error("codec index {index} out of range (table has {len} entries)")]
    OutOfRange { index: i64, len: usize },

    #[error("unknown codec: {0}")]
    UnknownCodec(String),

    #[error("storage I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TauError>;
