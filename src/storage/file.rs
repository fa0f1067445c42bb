use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::StorageError;

/// Directory-backed key-value store, one file per key.
///
/// Writes go to a temp file and are renamed into place, so a crash mid-write
/// leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::debug!("File storage at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", escape_key(key)))
    }
}

/// Map a key to a file-name-safe string. Bytes outside `[A-Za-z0-9_-]`
/// become `%XX`, so distinct keys never collide.
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &path)
        };
        write().map_err(|e| {
            let _ = fs::remove_file(&tmp);
            StorageError::Write {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_key() {
        assert_eq!(escape_key("@Challenge08:products"), "%40Challenge08%3Aproducts");
        assert_eq!(escape_key("plain_key-1"), "plain_key-1");
        assert_ne!(escape_key("a:b"), escape_key("a_b"));
    }

    #[test]
    fn test_roundtrip_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();

        assert_eq!(storage.get("@ns:products").unwrap(), None);
        storage.set("@ns:products", "[1,2]").unwrap();
        assert_eq!(storage.get("@ns:products").unwrap().as_deref(), Some("[1,2]"));

        // Survives reopening
        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("@ns:products").unwrap().as_deref(), Some("[1,2]"));

        storage.set("@ns:products", "[]").unwrap();
        assert_eq!(reopened.get("@ns:products").unwrap().as_deref(), Some("[]"));
        // No temp file left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
