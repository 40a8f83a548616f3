use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Durable string-list storage keyed by name.
pub trait KeyValueStore: Send {
    fn read_string_list(&self, key: &str) -> Option<Vec<String>>;
    fn write_string_list(&mut self, key: &str, values: &[String]) -> Result<()>;
}

/// A JSON object of `key -> [string]` kept in a single file.
///
/// An unreadable file starts the store empty, and a key holding anything
/// other than a list of strings reads as absent.
pub struct JsonStore {
    path: PathBuf,
    entries: HashMap<String, Value>,
}

impl JsonStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable store file");
                HashMap::new()
            })
        } else {
            HashMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(crate::config::data_dir()?.join("store.json"))
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for JsonStore {
    fn read_string_list(&self, key: &str) -> Option<Vec<String>> {
        let value = self.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(list) => Some(list),
            Err(e) => {
                warn!(key, error = %e, "Stored value is not a string list");
                None
            }
        }
    }

    fn write_string_list(&mut self, key: &str, values: &[String]) -> Result<()> {
        self.entries.insert(key.to_string(), Value::from(values.to_vec()));
        self.save()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(key: &str, values: &[&str]) -> Self {
        let mut store = Self::new();
        store.entries.insert(
            key.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn read_string_list(&self, key: &str) -> Option<Vec<String>> {
        self.entries.get(key).cloned()
    }

    fn write_string_list(&mut self, key: &str, values: &[String]) -> Result<()> {
        self.entries.insert(key.to_string(), values.to_vec());
        Ok(())
    }
}
