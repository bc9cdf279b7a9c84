//! Client-side persisted state
//!
//! Two slots survive between runs:
//! - the latest analysis, as serialized JSON (overwritten by every upload)
//! - the bearer credential of the signed-in user
//!
//! [`FileStore`] keeps them as files under the data directory
//! (`genomic_result.json`, `credentials.json`). [`MemoryStore`] keeps them
//! in memory and counts writes, for tests and one-shot runs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use thiserror::Error;

pub const RESULT_FILE: &str = "genomic_result.json";
pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt credentials file: {0}")]
    Corruption(String),

    #[error("Storage lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// The single analysis-result slot
pub trait ResultStore: Send + Sync {
    /// Serialized analysis, if one has been stored
    fn load_result(&self) -> StorageResult<Option<String>>;

    /// Overwrite the slot
    fn save_result(&self, serialized: &str) -> StorageResult<()>;

    fn clear_result(&self) -> StorageResult<()>;
}

/// The bearer credential
pub trait CredentialStore: Send + Sync {
    fn load_token(&self) -> StorageResult<Option<String>>;

    fn save_token(&self, token: &str) -> StorageResult<()>;

    fn clear_token(&self) -> StorageResult<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Credentials {
    token: String,
}

/// File-backed store under one data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the data directory
    pub fn new(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read(&self, name: &str) -> StorageResult<Option<String>> {
        let path = self.path(name);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    /// Write through a temp file and rename so readers never see half a file
    fn write(&self, name: &str, content: &str) -> StorageResult<()> {
        let path = self.path(name);
        let tmp = self.path(&format!("{}.tmp", name));

        fs::write(&tmp, content).map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;
        Ok(())
    }

    fn remove(&self, name: &str) -> StorageResult<()> {
        let path = self.path(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl ResultStore for FileStore {
    fn load_result(&self) -> StorageResult<Option<String>> {
        self.read(RESULT_FILE)
    }

    fn save_result(&self, serialized: &str) -> StorageResult<()> {
        self.write(RESULT_FILE, serialized)?;
        tracing::debug!(bytes = serialized.len(), "Stored analysis result");
        Ok(())
    }

    fn clear_result(&self) -> StorageResult<()> {
        self.remove(RESULT_FILE)
    }
}

impl CredentialStore for FileStore {
    fn load_token(&self) -> StorageResult<Option<String>> {
        let Some(content) = self.read(CREDENTIALS_FILE)? else {
            return Ok(None);
        };

        let creds: Credentials = serde_json::from_str(&content)
            .map_err(|e| StorageError::Corruption(e.to_string()))?;
        Ok(Some(creds.token).filter(|t| !t.is_empty()))
    }

    fn save_token(&self, token: &str) -> StorageResult<()> {
        let content = serde_json::to_string(&Credentials {
            token: token.to_string(),
        })
        .map_err(|e| StorageError::Corruption(e.to_string()))?;

        self.write(CREDENTIALS_FILE, &content)?;
        restrict_permissions(&self.path(CREDENTIALS_FILE));
        Ok(())
    }

    fn clear_token(&self) -> StorageResult<()> {
        self.remove(CREDENTIALS_FILE)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Could not restrict permissions on {:?}: {}", path, e);
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    result: Mutex<Option<String>>,
    token: Mutex<Option<String>>,
    result_writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the result slot was written
    pub fn result_writes(&self) -> usize {
        self.result_writes.load(Ordering::SeqCst)
    }
}

impl ResultStore for MemoryStore {
    fn load_result(&self) -> StorageResult<Option<String>> {
        Ok(self.result.lock().map_err(|_| StorageError::Poisoned)?.clone())
    }

    fn save_result(&self, serialized: &str) -> StorageResult<()> {
        *self.result.lock().map_err(|_| StorageError::Poisoned)? = Some(serialized.to_string());
        self.result_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear_result(&self) -> StorageResult<()> {
        *self.result.lock().map_err(|_| StorageError::Poisoned)? = None;
        Ok(())
    }
}

impl CredentialStore for MemoryStore {
    fn load_token(&self) -> StorageResult<Option<String>> {
        Ok(self.token.lock().map_err(|_| StorageError::Poisoned)?.clone())
    }

    fn save_token(&self, token: &str) -> StorageResult<()> {
        *self.token.lock().map_err(|_| StorageError::Poisoned)? = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> StorageResult<()> {
        *self.token.lock().map_err(|_| StorageError::Poisoned)? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_result_slot_overwritten() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert_eq!(store.load_result().unwrap(), None);

        store.save_result(r#"{"file_processed":"a.vcf"}"#).unwrap();
        store.save_result(r#"{"file_processed":"b.vcf"}"#).unwrap();

        let stored = store.load_result().unwrap().unwrap();
        assert!(stored.contains("b.vcf"));
        assert!(!dir.path().join("genomic_result.json.tmp").exists());
    }

    #[test]
    fn test_slots_survive_reopen() {
        let dir = tempdir().unwrap();

        {
            let store = FileStore::new(dir.path()).unwrap();
            store.save_result("{}").unwrap();
            store.save_token("tok-123").unwrap();
        }

        let store = FileStore::new(dir.path()).unwrap();
        assert_eq!(store.load_result().unwrap().as_deref(), Some("{}"));
        assert_eq!(store.load_token().unwrap().as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.save_token("tok").unwrap();
        store.clear_token().unwrap();
        store.clear_token().unwrap();
        assert_eq!(store.load_token().unwrap(), None);

        store.clear_result().unwrap();
    }

    #[test]
    fn test_corrupt_credentials() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        fs::write(dir.path().join(CREDENTIALS_FILE), "not json").unwrap();

        assert!(matches!(store.load_token(), Err(StorageError::Corruption(_))));
    }

    #[test]
    fn test_creates_nested_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(&nested).unwrap();
        store.save_result("{}").unwrap();
        assert!(nested.join(RESULT_FILE).exists());
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemoryStore::new();
        store.save_result("{}").unwrap();
        store.save_result("{}").unwrap();
        assert_eq!(store.result_writes(), 2);

        store.save_token("t").unwrap();
        assert_eq!(store.load_token().unwrap().as_deref(), Some("t"));
        store.clear_token().unwrap();
        assert_eq!(store.load_token().unwrap(), None);
    }
}
