//! Durable credential storage.
//!
//! The session token, user id and email live under three string keys. A
//! record counts as "logged in" only when both `token` and `userId` are
//! present and non-empty; anything less is treated as absent.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Credential file name in the data directory
pub const CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageKey {
    Token,
    UserId,
    Email,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [StorageKey::Token, StorageKey::UserId, StorageKey::Email];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::UserId => "userId",
            StorageKey::Email => "email",
        }
    }
}

/// Key/value store for the durable credential record.
pub trait CredentialStorage: Send + Sync {
    fn get(&self, key: StorageKey) -> Result<Option<String>>;

    fn set(&self, key: StorageKey, value: &str) -> Result<()>;

    fn remove(&self, key: StorageKey) -> Result<()>;

    /// Write several keys. Backends that can write them in one go override this.
    fn set_many(&self, entries: &[(StorageKey, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(*key, value)?;
        }
        Ok(())
    }

    /// Remove several keys. Every key is attempted; the first error is returned.
    fn remove_many(&self, keys: &[StorageKey]) -> Result<()> {
        let mut first_err = None;
        for key in keys {
            if let Err(e) = self.remove(*key) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// The three durable values as read from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialRecord {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

impl CredentialRecord {
    pub fn read(storage: &dyn CredentialStorage) -> Result<Self> {
        Ok(Self {
            token: storage.get(StorageKey::Token)?,
            user_id: storage.get(StorageKey::UserId)?,
            email: storage.get(StorageKey::Email)?,
        })
    }

    /// Token and user id, if both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.token.as_deref().filter(|t| !t.is_empty())?;
        let user_id = self.user_id.as_deref().filter(|u| !u.is_empty())?;
        Some((token, user_id))
    }

    pub fn write(storage: &dyn CredentialStorage, token: &str, user_id: &str, email: &str) -> Result<()> {
        storage.set_many(&[
            (StorageKey::Token, token),
            (StorageKey::UserId, user_id),
            (StorageKey::Email, email),
        ])
    }

    pub fn clear(storage: &dyn CredentialStorage) -> Result<()> {
        storage.remove_many(&StorageKey::ALL)
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<StorageKey, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStorage for MemoryStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        Ok(self.entries.read().get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        self.entries.write().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        self.entries.write().remove(&key);
        Ok(())
    }
}

// ============================================================================
// File backend
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(flatten)]
    entries: BTreeMap<String, String>,
}

/// JSON file in the data directory, rewritten whole on every change.
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self::at_path(data_dir.join(CREDENTIALS_FILE))
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<CredentialFile> {
        if !self.path.exists() {
            return Ok(CredentialFile::default());
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read credentials file")?;
        if contents.trim().is_empty() {
            return Ok(CredentialFile::default());
        }
        serde_json::from_str(&contents).context("Failed to parse credentials file")
    }

    fn store(&self, file: &CredentialFile) -> Result<()> {
        if file.entries.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path).context("Failed to remove credentials file")?;
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(file)?;
        write_private(&self.path, contents.as_bytes()).context("Failed to write credentials file")
    }

    /// Read-modify-write under the lock. A file that no longer parses is
    /// replaced rather than blocking every later write.
    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut file = match self.load() {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "Discarding unreadable credentials file");
                CredentialFile::default()
            }
        };
        apply(&mut file.entries);
        self.store(&file)
    }
}

/// Write to a sibling temp file, then rename it over `path`, so readers see
/// either the old contents or the new ones.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(e) = write_new_private(&tmp, contents) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    std::fs::rename(&tmp, path)
}

#[cfg(unix)]
fn write_new_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_new_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

impl CredentialStorage for FileStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        Ok(self.load()?.entries.get(key.as_str()).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.as_str().to_string(), value.to_string());
        })
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        self.update(|entries| {
            entries.remove(key.as_str());
        })
    }

    fn set_many(&self, pairs: &[(StorageKey, &str)]) -> Result<()> {
        self.update(|entries| {
            for (key, value) in pairs {
                entries.insert(key.as_str().to_string(), value.to_string());
            }
        })
    }

    fn remove_many(&self, keys: &[StorageKey]) -> Result<()> {
        self.update(|entries| {
            for key in keys {
                entries.remove(key.as_str());
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(StorageKey::Token.as_str(), "token");
        assert_eq!(StorageKey::UserId.as_str(), "userId");
        assert_eq!(StorageKey::Email.as_str(), "email");
    }

    #[test]
    fn test_record_requires_token_and_user_id() {
        let storage = MemoryStorage::new();
        assert_eq!(CredentialRecord::read(&storage).unwrap().credentials(), None);

        storage.set(StorageKey::Token, "T").unwrap();
        assert_eq!(CredentialRecord::read(&storage).unwrap().credentials(), None);

        storage.set(StorageKey::UserId, "").unwrap();
        assert_eq!(CredentialRecord::read(&storage).unwrap().credentials(), None);

        storage.set(StorageKey::UserId, "7").unwrap();
        assert_eq!(
            CredentialRecord::read(&storage).unwrap().credentials(),
            Some(("T", "7"))
        );
    }

    #[test]
    fn test_file_storage_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        CredentialRecord::write(&storage, "T", "7", "a@x.com").unwrap();
        let contents = std::fs::read_to_string(storage.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(json["token"], "T");
        assert_eq!(json["userId"], "7");
        assert_eq!(json["email"], "a@x.com");

        // A second handle on the same file sees the same record.
        let reopened = FileStorage::new(dir.path());
        assert_eq!(reopened.get(StorageKey::UserId).unwrap().as_deref(), Some("7"));

        CredentialRecord::clear(&storage).unwrap();
        assert!(!storage.path().exists());
        assert_eq!(CredentialRecord::read(&reopened).unwrap(), CredentialRecord::default());
    }

    #[test]
    fn test_file_storage_missing_and_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get(StorageKey::Token).unwrap(), None);

        std::fs::write(storage.path(), "").unwrap();
        assert_eq!(storage.get(StorageKey::Token).unwrap(), None);
    }

    #[test]
    fn test_file_storage_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        std::fs::write(storage.path(), "{not json").unwrap();
        assert!(storage.get(StorageKey::Token).is_err());
    }

    #[test]
    fn test_file_storage_corrupt_file_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        std::fs::write(storage.path(), r#"{"token": "OL"#).unwrap();

        CredentialRecord::write(&storage, "T", "7", "a@x.com").unwrap();
        assert_eq!(
            CredentialRecord::read(&storage).unwrap().credentials(),
            Some(("T", "7"))
        );
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);

        std::fs::write(storage.path(), "garbage").unwrap();
        CredentialRecord::clear(&storage).unwrap();
        assert!(!storage.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.set(StorageKey::Token, "T").unwrap();
        let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
