//! Recently searched location names, persisted through a small key-value store.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::PathBuf,
};

/// Key under which the ledger is stored.
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

pub const MAX_RECENT: usize = 5;

/// String-keyed persistent storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Non-persistent store, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A single JSON object file holding every key.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // A corrupt state file is replaced rather than blocking writes forever.
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize state")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        Ok(())
    }
}

/// Up to [`MAX_RECENT`] distinct names, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecentSearches(Vec<String>);

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `name` in front, dropping any earlier copy and anything past the limit.
    pub fn record(mut self, name: &str) -> Self {
        self.0.retain(|existing| existing != name);
        self.0.insert(0, name.to_string());
        self.0.truncate(MAX_RECENT);
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Build a ledger from stored entries (most recent first), restoring the invariants.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Vec::with_capacity(MAX_RECENT);
        for entry in entries {
            let entry = entry.as_ref();
            if out.len() == MAX_RECENT {
                break;
            }
            if !out.iter().any(|e: &String| e == entry) {
                out.push(entry.to_string());
            }
        }
        Self(out)
    }

    /// Read the ledger from `store`. Missing or unreadable data yields an empty list.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(RECENT_SEARCHES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(),
            Err(err) => {
                tracing::warn!("Ignoring unreadable recent searches: {err:#}");
                return Self::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(entries) => Self::from_entries(entries),
            Err(err) => {
                tracing::warn!("Ignoring malformed recent searches: {err}");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(&self.0).context("Failed to serialize recent searches")?;
        store.set(RECENT_SEARCHES_KEY, &json)
    }
}
