use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tempfile::NamedTempFile;

use super::domain::UserRecord;

/// Storage abstraction so the registration service can be exercised in isolation.
pub trait UserStore: Send + Sync {
    fn load_all(&self) -> Result<Vec<UserRecord>, StoreError>;
    fn append(&self, record: UserRecord) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user store unavailable: {0}")]
    Unavailable(String),
    #[error("user store i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("user store at {path} does not hold a user collection: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Volatile store backed by a vector; every instance is isolated.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    records: Mutex<Vec<UserRecord>>,
}

impl InMemoryUserStore {
    pub fn with_records(records: Vec<UserRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn records(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.load_all()
    }
}

impl UserStore for InMemoryUserStore {
    fn load_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("user store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn append(&self, record: UserRecord) -> Result<(), StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("user store lock poisoned".to_string()))?;
        guard.push(record);
        Ok(())
    }
}

/// Flat-file store holding the collection as one JSON array.
///
/// A missing file is bootstrapped with `[]` on first load, and an empty file
/// reads as an empty collection. Every write goes to its own temporary file in
/// the same directory, which is then renamed over the data file, so a reader
/// never sees a half-written collection. Bootstrap and appends from one
/// process are serialised; nothing coordinates separate processes.
#[derive(Debug)]
pub struct JsonFileUserStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("user store lock poisoned".to_string()))
    }

    /// `None` when the data file does not exist yet.
    fn read_collection(&self) -> Result<Option<Vec<UserRecord>>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };

        if raw.trim().is_empty() {
            return Ok(Some(Vec::new()));
        }

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    // Callers hold `write_lock`.
    fn write_collection(&self, records: &[UserRecord]) -> Result<(), StoreError> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;

        let payload = serde_json::to_vec(records).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let mut staging =
            NamedTempFile::new_in(parent).map_err(|err| StoreError::io(parent, err))?;
        staging
            .write_all(&payload)
            .and_then(|()| staging.as_file().sync_all())
            .map_err(|err| StoreError::io(staging.path(), err))?;
        staging
            .persist(&self.path)
            .map_err(|err| StoreError::io(&self.path, err.error))?;
        Ok(())
    }
}

impl UserStore for JsonFileUserStore {
    fn load_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        if let Some(records) = self.read_collection()? {
            return Ok(records);
        }

        let _guard = self.lock_writes()?;
        // An append may have created the file while we waited.
        if let Some(records) = self.read_collection()? {
            return Ok(records);
        }
        self.write_collection(&[])?;
        Ok(Vec::new())
    }

    fn append(&self, record: UserRecord) -> Result<(), StoreError> {
        let _guard = self.lock_writes()?;

        let mut records = self.read_collection()?.unwrap_or_default();
        records.push(record);
        self.write_collection(&records)?;

        tracing::debug!(path = %self.path.display(), total = records.len(), "appended user record");
        Ok(())
    }
}
