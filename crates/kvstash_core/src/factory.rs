//! Store selection by name.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::memory::MemoryStore;
use crate::storage::Storage;
use crate::store::JsonStore;
use std::fmt;
use std::str::FromStr;

/// The store implementations the factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// [`MemoryStore`]: no persistence, no transactions.
    Memory,
    /// [`JsonStore`]: file-backed with transactions.
    Json,
}

impl StoreKind {
    /// Returns the canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Json => "json",
        }
    }
}

impl FromStr for StoreKind {
    type Err = CoreError;

    fn from_str(name: &str) -> CoreResult<Self> {
        match name {
            "memory" | "dict_storage" => Ok(Self::Memory),
            "json" | "json_storage" => Ok(Self::Json),
            _ => Err(CoreError::UnknownStoreKind {
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a store of the requested kind.
///
/// `config` is ignored for [`StoreKind::Memory`].
///
/// # Errors
///
/// Returns an error if a [`JsonStore`] cannot be opened.
pub fn open_store(kind: StoreKind, config: &Config) -> CoreResult<Box<dyn Storage>> {
    match kind {
        StoreKind::Memory => Ok(Box::new(MemoryStore::new())),
        StoreKind::Json => Ok(Box::new(JsonStore::open(config.clone())?)),
    }
}
