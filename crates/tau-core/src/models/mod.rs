//! tau data models.
//!
//! Plain enums: codec identity and the host's log-level scale. The tables
//! that give codecs their MIME types and formats live in `registry`.

pub mod codec;
pub mod log_level;

pub use codec::Codec;
pub use log_level::{set_log_level, LogLevel};
