//! Persisted connection data.
//!
//! Each saved connection is a driver name plus a flat string map the
//! driver owns. The whole store lives in one TOML file under the user's
//! configuration directory.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const STORE_FILE: &str = "connections.toml";

/// Key/value data for one saved connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    #[serde(default)]
    pub driver: String,
    #[serde(default)]
    pub driver_data: BTreeMap<String, String>,
}

impl ConnectionInfo {
    #[must_use]
    pub fn for_driver(driver: impl Into<String>) -> Self {
        ConnectionInfo {
            driver: driver.into(),
            driver_data: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.driver_data.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.driver_data.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.driver_data.remove(key)
    }
}

/// All saved connections, keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionStore {
    #[serde(skip)]
    path: Option<PathBuf>,
    #[serde(default)]
    connections: BTreeMap<String, ConnectionInfo>,
}

impl ConnectionStore {
    /// A store that is never written to disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the store from the default location.
    pub fn load() -> CoreResult<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load the store from `path`; a missing file yields an empty store.
    pub fn load_from(path: &Path) -> CoreResult<Self> {
        let mut store = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str::<ConnectionStore>(&contents).map_err(|source| {
                CoreError::ConnectionParse {
                    path: path.to_path_buf(),
                    source,
                }
            })?
        } else {
            tracing::debug!(path = %path.display(), "no connection store yet");
            ConnectionStore::default()
        };
        store.path = Some(path.to_path_buf());
        Ok(store)
    }

    /// Write the store back to where it was loaded from.
    pub fn save(&self) -> CoreResult<()> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(()),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        tracing::debug!(path = %path.display(), count = self.connections.len(), "saved connections");
        Ok(())
    }

    pub fn default_path() -> CoreResult<PathBuf> {
        let dir = dirs::config_dir().ok_or(CoreError::ConfigDirUnavailable)?;
        Ok(dir.join("gitlist").join(STORE_FILE))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&ConnectionInfo> {
        self.connections.get(name)
    }

    /// Like [`get`](Self::get) but failing with [`CoreError::ConnectionNotFound`].
    pub fn require(&self, name: &str) -> CoreResult<&ConnectionInfo> {
        self.get(name)
            .ok_or_else(|| CoreError::ConnectionNotFound(name.to_string()))
    }

    pub fn insert(&mut self, name: impl Into<String>, info: ConnectionInfo) {
        self.connections.insert(name.into(), info);
    }

    pub fn remove(&mut self, name: &str) -> Option<ConnectionInfo> {
        self.connections.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.connections.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConnectionInfo)> {
        self.connections.iter()
    }
}
