//! Where persistent state lives on disk.

use std::path::PathBuf;

pub const ROOT_ENV: &str = "TAU_SOUND_ROOT";
pub const DEFAULT_APP: &str = "tau";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub root: PathBuf,
    pub app: String,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>, app: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            app: app.into(),
        }
    }

    /// Root from `TAU_SOUND_ROOT`, falling back to `~/.tau_sound`.
    pub fn from_env(app: &str) -> Self {
        let root = match std::env::var(ROOT_ENV) {
            Ok(root) if !root.is_empty() => PathBuf::from(root),
            _ => {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
                PathBuf::from(home).join(".tau_sound")
            }
        };
        Self::new(root, app)
    }

    /// Directory holding this app's persistent store.
    pub fn app_dir(&self) -> PathBuf {
        self.root.join(&self.app)
    }
}
