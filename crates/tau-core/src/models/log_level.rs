//! Host log-level scale.
//!
//! The host reports severities as ordinals 0..=6. `set_log_level` maps
//! them onto the `log` facade's global filter.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum LogLevel {
    Verbose = 0,
    Dbg = 1,
    Info = 2,
    Warning = 3,
    Error = 4,
    Wtf = 5,
    Nothing = 6,
}

impl LogLevel {
    pub fn from_ordinal(n: u8) -> Option<Self> {
        match n {
            0 => Some(LogLevel::Verbose),
            1 => Some(LogLevel::Dbg),
            2 => Some(LogLevel::Info),
            3 => Some(LogLevel::Warning),
            4 => Some(LogLevel::Error),
            5 => Some(LogLevel::Wtf),
            6 => Some(LogLevel::Nothing),
            _ => None,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// WTF has no stricter `log` counterpart, so it shares `Error`.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Verbose => log::LevelFilter::Trace,
            LogLevel::Dbg => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error | LogLevel::Wtf => log::LevelFilter::Error,
            LogLevel::Nothing => log::LevelFilter::Off,
        }
    }
}

/// Apply a host log level to the global `log` filter.
pub fn set_log_level(level: LogLevel) {
    log::set_max_level(level.to_level_filter());
    log::debug!("tau: log level set to {:?}", level);
}
