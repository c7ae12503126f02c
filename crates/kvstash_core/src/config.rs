//! Store configuration.

use std::path::PathBuf;

/// File name used when no path is configured.
pub const DEFAULT_STORE_FILE: &str = "kvstash.json";

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the file holding the persisted store.
    pub path: PathBuf,

    /// Whether a missing store file is treated as an empty store.
    pub create_if_missing: bool,

    /// Whether to fsync the file and its directory on every write.
    pub sync_on_write: bool,

    /// Whether to write indented JSON.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_FILE),
            create_if_missing: true,
            sync_on_write: true,
            pretty: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the store file path.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets whether to start empty when the store file is missing.
    #[must_use]
    pub fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to sync on every write.
    #[must_use]
    pub fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Sets whether to write indented JSON.
    #[must_use]
    pub fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }
}
