//! Credential handle and the local preference collaborator.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};

/// Preference key holding the remote access token.
pub const PREF_AUTH_TOKEN: &str = "auth_token";
/// Preference key holding the last account the user browsed.
pub const PREF_LAST_ACCOUNT: &str = "last_account";

/// Process-wide bearer-token handle. The content client reads it on every
/// request; nothing caches it request-to-request.
#[derive(Clone, Debug, Default)]
pub struct Credential {
    token: Arc<RwLock<Option<String>>>,
}

impl Credential {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token.filter(|t| !t.is_empty()))),
        }
    }

    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.token().is_some()
    }

    pub fn replace(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token.filter(|t| !t.is_empty());
        }
    }
}

/// The preference collaborator: a trivial key/value store, loaded once at
/// startup and never polled. Setting an empty value clears the key.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Single-file JSON store backing the command shell.
#[derive(Debug)]
pub struct JsonFilePrefs {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFilePrefs {
    pub fn load(path: &Path) -> Result<Self> {
        let values = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("parse preference file {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("read preference file {}", path.display()));
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.values).context("serialize preferences")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("write preference file {}", self.path.display()))
    }
}

impl PreferenceStore for JsonFilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        if let Err(err) = self.persist() {
            log::warn!("could not persist preferences: {err:#}");
        }
    }
}
