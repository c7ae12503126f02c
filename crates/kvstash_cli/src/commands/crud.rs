//! Single-operation commands.
//!
//! Each command opens the store, performs one direct-mode operation and
//! prints its result as JSON on stdout.

use super::parse_value;
use kvstash_core::{open_store, Config, StoreKind};
use tracing::info;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Insert a new key.
pub fn insert(kind: StoreKind, config: &Config, key: &str, raw_value: &str) -> CommandResult {
    info!("Inserting {:?} into {:?}", key, config.path);

    let mut store = open_store(kind, config)?;
    let record = store.insert(key, parse_value(raw_value))?;
    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}

/// Print the value stored under a key.
pub fn select(kind: StoreKind, config: &Config, key: &str) -> CommandResult {
    let store = open_store(kind, config)?;
    let value = store.select(key)?;
    println!("{}", serde_json::to_string(&value)?);
    Ok(())
}

/// Replace the value of an existing key.
pub fn update(kind: StoreKind, config: &Config, key: &str, raw_value: &str) -> CommandResult {
    info!("Updating {:?} in {:?}", key, config.path);

    let mut store = open_store(kind, config)?;
    let record = store.update(key, parse_value(raw_value))?;
    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}

/// Delete an existing key.
pub fn delete(kind: StoreKind, config: &Config, key: &str) -> CommandResult {
    info!("Deleting {:?} from {:?}", key, config.path);

    let mut store = open_store(kind, config)?;
    store.delete(key)?;
    Ok(())
}

/// Report whether a key exists.
pub fn exists(kind: StoreKind, config: &Config, key: &str) -> CommandResult {
    let store = open_store(kind, config)?;
    println!("{}", store.exists(key));
    Ok(())
}

/// List keys in insertion order, optionally filtered.
pub fn keys(kind: StoreKind, config: &Config, pattern: Option<&str>) -> CommandResult {
    let store = open_store(kind, config)?;
    for key in store.keys(pattern)? {
        println!("{key}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvstash_core::JsonStore;
    use kvstash_core::Storage;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn commands_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let config = Config::new().path(dir.path().join("cli.json"));

        insert(StoreKind::Json, &config, "key", "value").unwrap();
        update(StoreKind::Json, &config, "key", "{\"n\":1}").unwrap();
        insert(StoreKind::Json, &config, "other", "2").unwrap();
        delete(StoreKind::Json, &config, "other").unwrap();

        let store = JsonStore::open(config).unwrap();
        assert_eq!(store.select("key").unwrap(), json!({"n": 1}));
        assert!(!store.exists("other"));
    }

    #[test]
    fn missing_key_is_an_error() {
        let dir = tempdir().unwrap();
        let config = Config::new().path(dir.path().join("cli.json"));

        assert!(select(StoreKind::Json, &config, "nope").is_err());
        assert!(delete(StoreKind::Json, &config, "nope").is_err());
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let dir = tempdir().unwrap();
        let config = Config::new().path(dir.path().join("cli.json"));

        assert!(keys(StoreKind::Json, &config, Some("[")).is_err());
    }
}
