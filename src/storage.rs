use crate::constants::{ENDPOINTS_FILE, PREFERENCES_FILE};
use crate::error::{Error, Result};
use crate::models::Endpoint;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// What [`EndpointStore::load`] found on disk
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// File read and parsed, with this many endpoints
    Loaded(usize),
    /// No file yet; starting empty
    Missing,
    /// File unreadable or not a JSON array of endpoints; starting empty
    Corrupted(String),
}

impl LoadOutcome {
    pub fn is_corrupted(&self) -> bool {
        matches!(self, LoadOutcome::Corrupted(_))
    }
}

/// Owns the endpoint collection and its backing file
pub struct EndpointStore {
    endpoints: Vec<Endpoint>,
    path: PathBuf,
}

impl EndpointStore {
    /// Empty store backed by `endpoints.json` inside `base_dir`. Nothing is read yet.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        EndpointStore {
            endpoints: Vec::new(),
            path: base_dir.as_ref().join(ENDPOINTS_FILE),
        }
    }

    /// Create a store and load it right away
    pub fn open(base_dir: impl AsRef<Path>) -> (Self, LoadOutcome) {
        let mut store = Self::new(base_dir);
        let outcome = store.load();
        (store, outcome)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory collection with the file's content.
    ///
    /// Never fails: a missing file or a corrupted one both leave the store empty.
    pub fn load(&mut self) -> LoadOutcome {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.endpoints.clear();
                return LoadOutcome::Missing;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Endpoint file unreadable");
                self.endpoints.clear();
                return LoadOutcome::Corrupted(e.to_string());
            }
        };

        match serde_json::from_str::<Vec<Endpoint>>(&content) {
            Ok(endpoints) => {
                tracing::info!(count = endpoints.len(), "Loaded endpoints");
                self.endpoints = endpoints;
                LoadOutcome::Loaded(self.endpoints.len())
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Endpoint file corrupted, starting empty");
                self.endpoints.clear();
                LoadOutcome::Corrupted(e.to_string())
            }
        }
    }

    /// Insert or replace by name. Returns the endpoint's index.
    pub fn upsert(&mut self, endpoint: Endpoint) -> usize {
        if let Some(idx) = self.position(&endpoint.name) {
            tracing::info!(name = %endpoint.name, idx, "Replacing endpoint");
            self.endpoints[idx] = endpoint;
            return idx;
        }
        tracing::info!(name = %endpoint.name, "Adding endpoint");
        self.endpoints.push(endpoint);
        self.endpoints.len() - 1
    }

    /// Remove and return the endpoint at `index`
    pub fn delete(&mut self, index: usize) -> Result<Endpoint> {
        if index >= self.endpoints.len() {
            return Err(Error::OutOfRange {
                index,
                len: self.endpoints.len(),
            });
        }
        let removed = self.endpoints.remove(index);
        tracing::info!(name = %removed.name, index, "Deleted endpoint");
        Ok(removed)
    }

    /// Write the whole collection to disk atomically
    pub fn persist(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.endpoints)?;
        write_atomic(&self.path, content.as_bytes())?;
        tracing::debug!(path = %self.path.display(), count = self.endpoints.len(), "Persisted endpoints");
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Endpoint> {
        self.endpoints.get(index)
    }

    /// Index of the endpoint with exactly this name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.endpoints.iter().position(|ep| ep.name == name)
    }

    pub fn find(&self, name: &str) -> Option<&Endpoint> {
        self.position(name).and_then(|idx| self.endpoints.get(idx))
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Opaque layout/preferences blob kept next to the endpoints.
///
/// The core never looks inside; it only guarantees the blob is a JSON object.
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        PreferencesStore {
            path: base_dir.as_ref().join(PREFERENCES_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored object, or an empty one when missing or unusable
    pub fn load(&self) -> Map<String, Value> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            _ => {
                tracing::debug!(path = %self.path.display(), "Ignoring unusable preferences file");
                Map::new()
            }
        }
    }

    pub fn save(&self, prefs: &Map<String, Value>) -> Result<()> {
        let content = serde_json::to_string_pretty(prefs)?;
        write_atomic(&self.path, content.as_bytes())
    }
}

/// Write to a temporary file in the target directory, then rename over `path`.
///
/// The temporary file is removed on every failure path; readers only ever see
/// the old file or the complete new one.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{}", file_name))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| Error::io(dir, e))?;
    let tmp_path = tmp.path().to_path_buf();

    tmp.write_all(contents)
        .map_err(|e| Error::io(&tmp_path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| Error::io(&tmp_path, e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
