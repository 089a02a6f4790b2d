//! Key-value backends the statement store writes through to.
//!
//! Values are opaque strings; the store owns the JSON encoding of its slot.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PlannerError, Result};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Process-local backend, used by tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot with a raw value
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(key.into(), value.into());
        self
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All slots in one JSON object file: `{"<key>": "<value>", ...}`.
///
/// A missing file is an empty store. Every `set` rewrites the whole file via a
/// sibling temp file and a rename, so readers see either the old or the new file.
/// A file that is not a JSON object is moved aside to `<name>.bak` on the next
/// `set`, and writing starts again from an empty object.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a corrupt file is moved before it is replaced
    pub fn backup_path(&self) -> PathBuf {
        sibling(&self.path, "bak")
    }

    fn read_slots(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let s = fs::read_to_string(&self.path)?;
        if s.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&s)?)
    }

    fn slots_for_write(&self) -> Result<BTreeMap<String, String>> {
        match self.read_slots() {
            Ok(slots) => Ok(slots),
            Err(PlannerError::Json(err)) => {
                let bak = self.backup_path();
                tracing::warn!(
                    path = %self.path.display(),
                    backup = %bak.display(),
                    "storage file is not a JSON object, moving it aside: {err}"
                );
                fs::rename(&self.path, &bak)?;
                Ok(BTreeMap::new())
            }
            Err(err) => Err(err),
        }
    }
}

fn sibling(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(ext);
    path.with_file_name(name)
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_slots()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots_for_write()?;
        slots.insert(key.to_string(), value.to_string());
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(&slots)?;
        let tmp = sibling(&self.path, "tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), key, bytes = value.len(), "slot written");
        Ok(())
    }
}
