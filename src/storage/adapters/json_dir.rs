//! Storage adapter keeping one JSON file per key inside a directory.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::Value;
use std::io::ErrorKind;

use crate::storage::ports::{EntityStore, StorageError, StorageResult};

/// Directory-backed store writing `<key>.json` documents.
///
/// All file access is scoped to the opened directory. Writes land in a
/// temporary sibling file first and are renamed over the target, so readers
/// never observe a half-written document.
#[derive(Debug)]
pub struct JsonDirStore {
    dir: Dir,
    root: Utf8PathBuf,
}

impl JsonDirStore {
    /// Opens an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when the directory cannot be opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> StorageResult<Self> {
        let path = root.as_ref();
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|err| StorageError::io(path.as_str(), err))?;
        Ok(Self {
            dir,
            root: path.to_owned(),
        })
    }

    /// Creates the directory (and parents) if needed, then opens it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] when the directory cannot be created or
    /// opened.
    pub fn create(root: impl AsRef<Utf8Path>) -> StorageResult<Self> {
        let path = root.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(|err| StorageError::io(path.as_str(), err))?;
        Self::open(path)
    }

    /// Returns the directory this store writes into.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

fn file_name_for(key: &str) -> StorageResult<String> {
    let is_plain = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if !is_plain {
        return Err(StorageError::io(
            key,
            std::io::Error::new(ErrorKind::InvalidInput, "storage keys must be plain names"),
        ));
    }
    Ok(format!("{key}.json"))
}

impl EntityStore for JsonDirStore {
    fn load(&self, key: &str) -> StorageResult<Option<Value>> {
        let file_name = file_name_for(key)?;
        let contents = match self.dir.read_to_string(&file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::io(key, err)),
        };
        let value = serde_json::from_str(&contents)
            .map_err(|err| StorageError::serialization(key, err))?;
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: Value) -> StorageResult<()> {
        let file_name = file_name_for(key)?;
        let temp_name = format!("{file_name}.tmp");
        let encoded = serde_json::to_vec_pretty(&value)
            .map_err(|err| StorageError::serialization(key, err))?;
        self.dir
            .write(&temp_name, encoded)
            .map_err(|err| StorageError::io(key, err))?;
        self.dir
            .rename(&temp_name, &self.dir, &file_name)
            .map_err(|err| StorageError::io(key, err))
    }
}
