use crate::record::ObservationRecord;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const RECORDS_FILE: &str = "local-records.json";
pub const DEFAULT_RECENT_WINDOW: usize = 20;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("local record store {} is unavailable: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    fn unavailable(path: &Path, source: impl Into<BoxError>) -> Self {
        Self::Unavailable {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

/// A JSON array of records on disk. Every append rewrites the whole
/// document through a temp file and rename, so readers never observe a
/// half-written file. Not safe for multiple writers; see `writer`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the store inside `data_dir`, seeding an empty list when the
    /// file does not exist yet.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir).map_err(|e| StoreError::unavailable(data_dir, e))?;
        let store = Self::new(data_dir.join(RECORDS_FILE));
        if !store.path.exists() {
            store.write_all(&[])?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<ObservationRecord>, StoreError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::unavailable(&self.path, e))?;
        serde_json::from_str(&raw).map_err(|e| StoreError::unavailable(&self.path, e))
    }

    pub fn append(&self, record: &ObservationRecord) -> Result<(), StoreError> {
        let mut records = self.load()?;
        records.push(record.clone());
        self.write_all(&records)
    }

    /// Up to `n` records, last appended first.
    pub fn recent(&self, n: usize) -> Result<Vec<ObservationRecord>, StoreError> {
        let records = self.load()?;
        Ok(records.into_iter().rev().take(n).collect())
    }

    fn write_all(&self, records: &[ObservationRecord]) -> Result<(), StoreError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let body = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::unavailable(&self.path, e))?;

        let mut tmp =
            NamedTempFile::new_in(dir).map_err(|e| StoreError::unavailable(&self.path, e))?;
        tmp.write_all(body.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| StoreError::unavailable(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::unavailable(&self.path, e.error))?;
        Ok(())
    }
}
