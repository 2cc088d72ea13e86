use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state directory missing or not writable: {0}")]
    StateDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the state directory exists; create if missing.
pub fn ensure_state_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::StateDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
    }
    Ok(())
}

/// A small text file that is always replaced whole: readers see either the
/// previous or the new content, never a mix.
#[derive(Debug, Clone)]
pub struct StateFile {
    dir: PathBuf,
    filename: String,
}

impl StateFile {
    pub fn new(dir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            filename: filename.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }

    /// `Ok(None)` when nothing has been stored yet.
    pub fn load(&self) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path()) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn store(&self, content: &str) -> Result<PathBuf, PersistError> {
        ensure_state_dir(&self.dir)?;

        let target = self.path();
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
