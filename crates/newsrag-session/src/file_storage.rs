//! File-backed `SessionStorage`
//!
//! All keys live in a single flat JSON object on disk. Every mutation
//! rewrites the file atomically, so a crash leaves either the previous or
//! the new session, never a torn one.

use crate::atomic_writer::AtomicWriter;
use newsrag_core::{Error, Result, SessionStorage};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Default session file, relative to the home directory
pub const DEFAULT_SESSION_FILE: &str = ".newsrag/session.json";

/// Durable key-value storage in a JSON file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create storage backed by `path`; a leading `~` expands to the home directory
    ///
    /// The file is created lazily on the first write.
    ///
    /// # Errors
    /// - `Error::Config` if `~` is used and no home directory is known
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = expand_home(path.into())?;
        debug!("Using session file {:?}", path);
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Storage at `~/.newsrag/session.json`
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;
        Self::new(home.join(DEFAULT_SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(Error::Io(e)),
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                warn!(path = ?self.path, "Session file is not a JSON object, treating as empty");
                Ok(Map::new())
            }
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        let contents = serde_json::to_vec_pretty(map)?;
        let mut writer = AtomicWriter::new(&self.path)?;
        writer.write(&contents)?;
        writer.commit()
    }

    fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Map<String, Value>) -> bool,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::Storage("session file lock poisoned".to_string()))?;

        let mut map = self.read_map()?;
        if mutate(&mut map) {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.read_map()?;
        Ok(map.get(key).and_then(|value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|map| {
            map.insert(key.to_string(), Value::String(value.to_string()));
            true
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|map| map.remove(key).is_some())
    }
}

fn expand_home(path: PathBuf) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir()
                .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path),
    }
}
