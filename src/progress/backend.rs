use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

use super::store::ProgressData;

/// Durable medium behind a [`ProgressStore`](super::ProgressStore).
///
/// Last write wins; there is only ever one writer.
pub trait ProgressBackend {
    /// Returns `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<ProgressData>, StoreError>;

    fn save(&mut self, data: &ProgressData) -> Result<(), StoreError>;
}

/// Stores everything in one JSON file named after the storage key.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/<storage_key>.json`
    pub fn for_storage_key(data_dir: &Path, storage_key: &str) -> Self {
        Self::new(data_dir.join(format!("{}.json", storage_key)))
    }

    /// Platform data directory for the application, falling back to the working directory.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("health-quiz"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable progress file is moved before it can be overwritten.
    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("json.bak")
    }
}

impl ProgressBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<ProgressData>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(data) => Ok(Some(data)),
            Err(e) => {
                let backup = self.backup_path();
                match fs::rename(&self.path, &backup) {
                    Ok(()) => tracing::warn!(
                        backup = %backup.display(),
                        "moved unreadable progress file aside"
                    ),
                    Err(re) => tracing::warn!(
                        error = %re,
                        "could not move unreadable progress file aside"
                    ),
                }
                Err(e.into())
            }
        }
    }

    fn save(&mut self, data: &ProgressData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Keeps data in memory; counts writes so callers can check what was persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: Option<ProgressData>,
    writes: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: ProgressData) -> Self {
        Self {
            data: Some(data),
            writes: 0,
        }
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn data(&self) -> Option<&ProgressData> {
        self.data.as_ref()
    }
}

impl ProgressBackend for MemoryBackend {
    fn load(&self) -> Result<Option<ProgressData>, StoreError> {
        Ok(self.data.clone())
    }

    fn save(&mut self, data: &ProgressData) -> Result<(), StoreError> {
        self.data = Some(data.clone());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_file_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::for_storage_key(dir.path(), "quiz");
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonFileBackend::for_storage_key(&dir.path().join("nested"), "quiz");

        let mut data = ProgressData::default();
        data.user_mut("ana").modules.insert("lombalgia".to_string(), 80);
        backend.save(&data).unwrap();

        assert!(backend.path().ends_with("nested/quiz.json"));
        let loaded = backend.load().unwrap().unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_json_file_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::for_storage_key(dir.path(), "quiz");
        fs::write(backend.path(), "{not json").unwrap();
        assert!(matches!(backend.load(), Err(StoreError::Json(_))));

        assert!(!backend.path().exists());
        assert!(backend.backup_path().ends_with("quiz.json.bak"));
        assert_eq!(fs::read_to_string(backend.backup_path()).unwrap(), "{not json");
        assert!(backend.load().unwrap().is_none());
    }
}
