use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;

use crate::error::{StorageError, StorageResult};

use super::traits::KvBackend;

const SNAPSHOT_EXTENSION: &str = "json";

/// Directory backed store: one `<key>.json` file per key.
///
/// Writes land in a temp file in the same directory and are renamed over the
/// target, so a reader never sees a half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn build_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{SNAPSHOT_EXTENSION}")))
    }

    fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })
    }

    fn snapshot_files(&self) -> StorageResult<Vec<(String, PathBuf)>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.root.clone(),
                    source,
                })
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StorageError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            files.push((stem.to_string(), path.clone()));
        }
        Ok(files)
    }
}

impl KvBackend for FileBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.build_path(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.build_path(key)?;
        self.ensure_root()?;

        let mut tmp = NamedTempFile::new_in(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })?;
        tmp.write_all(value.as_bytes())
            .and_then(|()| tmp.flush())
            .map_err(|source| StorageError::Io {
                path: tmp.path().to_path_buf(),
                source,
            })?;
        tmp.persist(&path).map_err(|error| StorageError::Io {
            path: path.clone(),
            source: error.error,
        })?;

        tracing::debug!("wrote snapshot {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.build_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn clear(&mut self) -> StorageResult<()> {
        for (_, path) in self.snapshot_files()? {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(error) if error.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(StorageError::Io { path, source }),
            }
        }
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self
            .snapshot_files()?
            .into_iter()
            .map(|(key, _)| key)
            .collect())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key == "." || key == ".." {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    if key.contains('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
