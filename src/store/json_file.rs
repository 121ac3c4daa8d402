use std::{
    collections::BTreeMap,
    fs::{self, File},
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use tracing::{debug, instrument, warn};

use crate::tracker::PersistenceStore;

use super::StoreError;

/// Key/value store persisted as a JSON object.
///
/// Values are cached in memory after [`open`](Self::open). Writes go through
/// [`update`](PersistenceStore::update): under an exclusive lock on a sibling
/// `.lock` file the current file is re-read, the one key is changed and the
/// file is replaced before returning, so keys written by another process in
/// the meantime survive.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file yields an empty store; the file is only created on the
    /// first write. A file that is not a JSON object of strings is logged and
    /// treated as empty.
    ///
    /// # Errors
    /// Returns `StoreError::Io` if the file exists but cannot be read.
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = Self::read_file(&path)?;

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the cached values with the file's current content.
    ///
    /// # Errors
    /// Returns `StoreError::Io` if the file exists but cannot be read.
    pub fn reload(&self) -> Result<(), StoreError> {
        let values = Self::read_file(&self.path)?;
        *self.values.write().unwrap_or_else(PoisonError::into_inner) = values;
        Ok(())
    }

    /// Snapshot of every stored key and value.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn read_file(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
        if !path.exists() {
            debug!("No state file yet");
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(path).map_err(|e| StoreError::io(e, path))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid state file, using empty state");
            BTreeMap::new()
        }))
    }

    /// Takes the cross-process write lock, released when the file is dropped.
    fn lock(&self) -> Result<File, StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(e, parent))?;
        }

        let lock_path = self.path.with_extension("json.lock");
        let file = File::options()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StoreError::io(e, &lock_path))?;
        file.lock().map_err(|e| StoreError::io(e, &lock_path))?;

        Ok(file)
    }

    fn write_file(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(values)?;
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, content).map_err(|e| StoreError::io(e, &tmp_path))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::io(e, &self.path))?;

        Ok(())
    }
}

impl PersistenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut value = Some(value);
        self.update(key, &mut |_| Ok(value.take()))
    }

    #[instrument(skip(self, apply), fields(path = %self.path.display()))]
    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<&str>) -> Result<Option<String>, StoreError>,
    ) -> Result<(), StoreError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        let _lock = self.lock()?;

        let mut latest = Self::read_file(&self.path)?;
        if let Some(value) = apply(latest.get(key).map(String::as_str))? {
            latest.insert(key.to_string(), value);
            self.write_file(&latest)?;
        }

        *values = latest;
        Ok(())
    }
}
