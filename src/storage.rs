//! Mirror of the handful of client-local persistence keys (current user,
//! language, theme, branding). Plain string values in one JSON file,
//! written synchronously on every change; a failed write is logged and
//! otherwise ignored.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const USER_KEY: &str = "doel_user";
pub const LANG_KEY: &str = "doel_lang";
pub const THEME_KEY: &str = "doel_theme";
pub const SITE_NAME_KEY: &str = "doel_site_name";
pub const SITE_LOGO_KEY: &str = "doel_site_logo";

#[derive(Clone)]
pub struct LocalStore {
    path: Option<PathBuf>,
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl LocalStore {
    /// Backed by `<dir>/local_store.json`, loading whatever was persisted
    /// by a previous run.
    pub fn open(dir: &std::path::Path) -> Self {
        let path = dir.join("local_store.json");
        let values = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<HashMap<String, String>>(&raw).ok())
            .unwrap_or_default();
        Self {
            path: Some(path),
            values: Arc::new(Mutex::new(values)),
        }
    }

    /// No file backing; used by tests.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.into());
            self.persist(&values);
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
            self.persist(&values);
        }
    }

    fn persist(&self, values: &HashMap<String, String>) {
        let Some(path) = &self.path else {
            return;
        };
        let result = serde_json::to_string_pretty(values)
            .map_err(std::io::Error::other)
            .and_then(|raw| {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, raw)
            });
        if let Err(e) = result {
            // No rollback; in-memory state stays authoritative.
            tracing::warn!("Failed to persist local store to {:?}: {}", path, e);
        }
    }
}
