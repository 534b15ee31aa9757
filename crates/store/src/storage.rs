use std::path::{Path, PathBuf};

use contact_model::{Contact, TagRegistry};
use serde::{Deserialize, Serialize};

use crate::book::AddressBook;
use crate::error::{Result, StoreError};

#[derive(Debug, Serialize, Deserialize)]
struct SerializedAddressBook {
    #[serde(default)]
    allowed_tags: Vec<String>,
    #[serde(default)]
    contacts: Vec<Contact>,
}

/// Address book persisted as a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonAddressBookStorage {
    path: PathBuf,
}

impl JsonAddressBookStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file does not exist yet.
    pub fn read(&self) -> Result<Option<AddressBook>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No data file at {}, starting fresh", self.path.display());
                return Ok(None);
            }
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };
        let stored: SerializedAddressBook = serde_json::from_slice(&bytes)
            .map_err(|err| StoreError::malformed(&self.path, err))?;

        let registry = TagRegistry::new(&stored.allowed_tags);
        let book = AddressBook::from_parts(registry, stored.contacts)?;
        log::info!(
            "Loaded {} contacts and {} tags from {}",
            book.contacts().len(),
            book.registry().len(),
            self.path.display()
        );
        Ok(Some(book))
    }

    /// Write through a temp file and rename so a crash never leaves a
    /// half-written data file.
    pub fn save(&self, book: &AddressBook) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
            }
        }
        let stored = SerializedAddressBook {
            allowed_tags: book.registry().sorted(),
            contacts: book.contacts().to_vec(),
        };
        let bytes = serde_json::to_vec_pretty(&stored)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes).map_err(|err| StoreError::io(&tmp, err))?;
        if let Err(err) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(StoreError::io(&self.path, err));
        }
        log::info!(
            "Saved {} contacts to {}",
            book.contacts().len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contact_query::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let storage = JsonAddressBookStorage::new(dir.path().join("absent.json"));
        assert!(storage.read().unwrap().is_none());
    }

    #[test]
    fn malformed_json_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonAddressBookStorage::new(&path).read().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn invalid_field_names_the_constraint() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad_phone.json");
        std::fs::write(
            &path,
            r#"{"allowed_tags": [], "contacts": [{"name": "Alice", "phone": "+65",
                "email": "a@example.com", "address": "x"}]}"#,
        )
        .unwrap();
        let err = JsonAddressBookStorage::new(&path).read().unwrap_err();
        assert!(err.to_string().contains("Phone"), "{err}");
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data").join("contacts.json");
        let storage = JsonAddressBookStorage::new(&path);
        storage.save(&AddressBook::new(TagRegistry::with_defaults())).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("contacts.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "occupied").unwrap();

        let storage = JsonAddressBookStorage::new(&path);
        let err = storage
            .save(&AddressBook::new(TagRegistry::with_defaults()))
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
