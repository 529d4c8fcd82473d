//! # Named Configuration Store
//!
//! Persists full [`CardConfig`] snapshots under user-chosen names, backed by
//! a plain key-value [`StorageBackend`] (the browser-localStorage shape: two
//! independent string keys, JSON payloads).
//!
//! ## Resilience contract
//!
//! - The store is loaded once at startup; a malformed payload degrades to an
//!   empty store, and individually malformed entries are skipped — never a
//!   crash.
//! - `save` keeps memory and backend in sync: when the backend write fails,
//!   the in-memory map is rolled back to its pre-call state and the error is
//!   surfaced once.
//! - `load` hands out a copy; later edits to the caller's working config
//!   never mutate the stored snapshot.
//! - `list` order is the in-session insertion order. Backends are not
//!   required to preserve key order, so display order across restarts is
//!   best-effort, not contractual.

pub mod prefs;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::card::CardConfig;
use crate::error::QuoteSnapError;

/// Backend key for the named-configuration map.
pub const CONFIGS_KEY: &str = "quotesnap-configs";

/// Backend key for the preference record.
pub const PREFERENCES_KEY: &str = "quotesnap-preferences";

/// Synchronous, single-writer key-value persistence with last-writer-wins
/// semantics.
pub trait StorageBackend {
    /// Read the payload under `key`, `None` when absent.
    fn read(&self, key: &str) -> Result<Option<String>, QuoteSnapError>;

    /// Write (insert or replace) the payload under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), QuoteSnapError>;

    /// Remove `key`; removing an absent key is a no-op.
    fn remove(&mut self, key: &str) -> Result<(), QuoteSnapError>;
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, QuoteSnapError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), QuoteSnapError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), QuoteSnapError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed backend: one JSON object on disk mapping backend keys to
/// string payloads.
///
/// Each operation is a full read-modify-write of the file. That is fine for
/// the single-writer access pattern this store is specified for.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole key space. Missing file or malformed JSON degrades to
    /// an empty map (logged, not surfaced).
    fn read_all(&self) -> HashMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                println!("[store] Ignoring malformed store file {}: {}", self.path.display(), e);
                HashMap::new()
            }
        }
    }

    fn write_all(&self, map: &HashMap<String, String>) -> Result<(), QuoteSnapError> {
        let payload = serde_json::to_string_pretty(map)
            .map_err(|e| QuoteSnapError::Persistence(format!("Failed to encode store: {e}")))?;
        fs::write(&self.path, payload).map_err(|e| {
            QuoteSnapError::Persistence(format!(
                "Failed to write {}: {e}",
                self.path.display()
            ))
        })
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, QuoteSnapError> {
        Ok(self.read_all().remove(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), QuoteSnapError> {
        let mut map = self.read_all();
        map.insert(key.to_string(), value.to_string());
        self.write_all(&map)
    }

    fn remove(&mut self, key: &str) -> Result<(), QuoteSnapError> {
        let mut map = self.read_all();
        if map.remove(key).is_some() {
            self.write_all(&map)?;
        }
        Ok(())
    }
}

/// Serializes entries as a JSON object in insertion order.
struct OrderedEntries<'a>(&'a [(String, CardConfig)]);

impl Serialize for OrderedEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, config) in self.0 {
            map.serialize_entry(name, config)?;
        }
        map.end()
    }
}

/// Named-configuration CRUD over a persistence backend.
pub struct ConfigStore<B: StorageBackend> {
    backend: B,
    entries: Vec<(String, CardConfig)>,
}

impl<B: StorageBackend> ConfigStore<B> {
    /// Open the store, loading whatever the backend currently holds.
    ///
    /// Malformed payloads degrade to an empty store; malformed individual
    /// entries are skipped. Startup never fails on bad data.
    pub fn open(backend: B) -> Self {
        let entries = match backend.read(CONFIGS_KEY) {
            Ok(Some(raw)) => parse_entries(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                println!("[store] Failed to read saved configurations: {e}");
                Vec::new()
            }
        };
        Self { backend, entries }
    }

    /// Insert or overwrite the snapshot under `name` and persist the full
    /// mapping. On backend failure the in-memory map is rolled back.
    pub fn save(&mut self, name: &str, config: &CardConfig) -> Result<(), QuoteSnapError> {
        let previous = self
            .entries
            .iter()
            .position(|(n, _)| n == name)
            .map(|i| (i, self.entries[i].1.clone()));

        match previous {
            Some((i, _)) => self.entries[i].1 = config.clone(),
            None => self.entries.push((name.to_string(), config.clone())),
        }

        if let Err(e) = self.persist() {
            match previous {
                Some((i, old)) => self.entries[i].1 = old,
                None => {
                    self.entries.pop();
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Return a copy of the snapshot under `name`.
    pub fn load(&self, name: &str) -> Result<CardConfig, QuoteSnapError> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| QuoteSnapError::NotFound(format!("no saved configuration {name:?}")))
    }

    /// Remove the snapshot under `name` and persist. Absent names are a
    /// successful no-op.
    pub fn delete(&mut self, name: &str) -> Result<(), QuoteSnapError> {
        let Some(i) = self.entries.iter().position(|(n, _)| n == name) else {
            return Ok(());
        };
        let removed = self.entries.remove(i);
        if let Err(e) = self.persist() {
            self.entries.insert(i, removed);
            return Err(e);
        }
        Ok(())
    }

    /// Saved names in insertion order.
    pub fn list(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Access the underlying backend (shared with the preference store).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn persist(&mut self) -> Result<(), QuoteSnapError> {
        let payload = serde_json::to_string(&OrderedEntries(&self.entries))
            .map_err(|e| QuoteSnapError::Persistence(format!("Failed to encode configs: {e}")))?;
        self.backend.write(CONFIGS_KEY, &payload)
    }
}

/// Parse the persisted mapping, skipping malformed entries.
fn parse_entries(raw: &str) -> Vec<(String, CardConfig)> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            println!("[store] Ignoring malformed configuration payload: {e}");
            return Vec::new();
        }
    };
    let Some(object) = value.as_object() else {
        println!("[store] Ignoring non-object configuration payload");
        return Vec::new();
    };

    let mut entries = Vec::with_capacity(object.len());
    for (name, entry) in object {
        match serde_json::from_value::<CardConfig>(entry.clone()) {
            Ok(config) => entries.push((name.clone(), config)),
            Err(e) => println!("[store] Skipping malformed configuration {name:?}: {e}"),
        }
    }
    entries
}
