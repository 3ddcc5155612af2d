// --- Message file writer ---

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use humansize::{format_size, DECIMAL};
use log::{debug, error, info};
use tempfile::NamedTempFile;
use thiserror::Error;

const FILE_PREFIX: &str = "swift_message_";
const FILE_EXTENSION: &str = "txt";
const MAX_NAME_ATTEMPTS: usize = 1000;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create save folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write message file in {folder}: {source}")]
    Write {
        folder: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No free file name for timestamp {0} in the save folder")]
    NameExhausted(i64),
}

/// Persists serialized messages verbatim, one new file per call.
#[derive(Debug, Clone)]
pub struct MessageWriter {
    folder: PathBuf,
}

impl MessageWriter {
    /// Creates `folder` (recursively) if it does not exist yet.
    pub fn new(folder: impl AsRef<Path>) -> Result<Self, StorageError> {
        let folder = folder.as_ref().to_path_buf();
        if !folder.exists() {
            debug!("Creating save folder {}", folder.display());
        }
        fs::create_dir_all(&folder).map_err(|source| StorageError::CreateFolder {
            path: folder.clone(),
            source,
        })?;
        Ok(Self { folder })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Write `message` to `swift_message_<unix-millis>.txt` and return its path.
    pub fn save(&self, message: &str) -> Result<PathBuf, StorageError> {
        let millis = Utc::now().timestamp_millis();
        self.save_with_timestamp(message, millis)
    }

    pub(crate) fn save_with_timestamp(
        &self,
        message: &str,
        millis: i64,
    ) -> Result<PathBuf, StorageError> {
        let write_err = |source| StorageError::Write {
            folder: self.folder.clone(),
            source,
        };

        // Stage in the target folder so the final rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(&self.folder).map_err(write_err)?;
        tmp.write_all(message.as_bytes()).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.folder.join(file_name(millis, attempt));
            match tmp.persist_noclobber(&path) {
                Ok(_) => {
                    info!(
                        "File saved at {} ({})",
                        path.display(),
                        format_size(message.len() as u64, DECIMAL)
                    );
                    return Ok(path);
                }
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                    debug!("{} already exists, trying next suffix", path.display());
                    tmp = e.file;
                }
                Err(e) => {
                    error!("Error saving file {}: {}", path.display(), e.error);
                    return Err(write_err(e.error));
                }
            }
        }
        Err(StorageError::NameExhausted(millis))
    }
}

fn file_name(millis: i64, attempt: usize) -> String {
    if attempt == 0 {
        format!("{FILE_PREFIX}{millis}.{FILE_EXTENSION}")
    } else {
        format!("{FILE_PREFIX}{millis}_{attempt}.{FILE_EXTENSION}")
    }
}
