//! Persisted window bounds, keyed by an optional environment name.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::geometry::WindowBounds;
use crate::paths;

/// Fixed namespace for the last-used window rectangle.
const BOUNDS_KEY: &str = "last-window-bounds";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Key/value store for the last window rectangle. The schema has no
/// required defaults: `load` returns `None` until a rectangle was saved.
pub trait BoundsStore {
    fn load(&self, environment: Option<&str>) -> Option<WindowBounds>;
    fn save(&mut self, environment: Option<&str>, bounds: &WindowBounds) -> Result<(), StoreError>;
}

/// JSON-file implementation under the program data directory.
pub struct JsonBoundsStore {
    path: PathBuf,
}

impl JsonBoundsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default location (`bounds.json` in the app data dir).
    pub fn open_default() -> Self {
        Self::new(paths::bounds_file())
    }

    fn key(environment: Option<&str>) -> String {
        match environment {
            Some(env) => format!("{BOUNDS_KEY}.{env}"),
            None => BOUNDS_KEY.to_string(),
        }
    }

    /// Read the whole file; unreadable or malformed content counts as empty.
    fn read_all(&self) -> BTreeMap<String, WindowBounds> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("bounds store not readable at {}: {}", self.path.display(), e);
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                debug!("bounds store at {} is malformed: {}", self.path.display(), e);
                BTreeMap::new()
            }
        }
    }
}

impl BoundsStore for JsonBoundsStore {
    fn load(&self, environment: Option<&str>) -> Option<WindowBounds> {
        self.read_all().remove(&Self::key(environment))
    }

    fn save(&mut self, environment: Option<&str>, bounds: &WindowBounds) -> Result<(), StoreError> {
        let mut all = self.read_all();
        all.insert(Self::key(environment), *bounds);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&all)?)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
