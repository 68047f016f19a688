//! tau-core: codec registry and record-URL storage for the tau sound
//! web front-end.
//!
//! # Architecture
//!
//! ```text
//! registry  codec -> MIME type -> container tag (static tables)
//! storage   persistent + session key/value scopes
//! session   record-URL resolution over both scopes
//! ```
//!
//! Recording, encoding and playback live in the host; this crate only
//! describes codecs and finds where a finished recording was stored.

pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod session;
pub mod storage;

pub use config::Config;
pub use error::{Result, TauError};
pub use models::*;
pub use registry::{
    codec_at, format_for, is_decoder_supported, is_encoder_supported, mime_for, CodecEntry,
    CodecRef, MimeList, MimeSupport,
};
pub use session::RecordSession;
pub use storage::{KeyValueStore, StorageKey, StorageScope};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
