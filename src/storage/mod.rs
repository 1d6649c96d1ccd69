use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::submit::FormFields;
use thiserror::Error;

const PARTIAL_SUFFIX: &str = "partial";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Where a submitted form ends up.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionTarget {
    #[default]
    Stdout,
    File(PathBuf),
}

impl SubmissionTarget {
    pub fn from_output(output: Option<PathBuf>) -> Self {
        match output {
            Some(path) if path.as_os_str() != "-" => Self::File(path),
            _ => Self::Stdout,
        }
    }
}

pub trait SubmissionStorage {
    /// Persists the form; returns the written path for file targets.
    fn save_submission(&self, form: &FormFields) -> StorageResult<Option<PathBuf>>;
}

#[derive(Debug, Clone, Default)]
pub struct StorageService {
    target: SubmissionTarget,
}

impl StorageService {
    pub const fn new(target: SubmissionTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &SubmissionTarget {
        &self.target
    }

    pub fn save_submission(&self, form: &FormFields) -> StorageResult<Option<PathBuf>> {
        let json = serde_json::to_string_pretty(form)?;
        match &self.target {
            SubmissionTarget::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{json}")?;
                stdout.flush()?;
                tracing::info!(fields = form.len(), "submission written to stdout");
                Ok(None)
            }
            SubmissionTarget::File(path) => {
                save_overwrite(path, json.as_bytes())?;
                tracing::info!(path = %path.display(), fields = form.len(), "submission saved");
                Ok(Some(path.clone()))
            }
        }
    }
}

impl SubmissionStorage for StorageService {
    fn save_submission(&self, form: &FormFields) -> StorageResult<Option<PathBuf>> {
        self.save_submission(form)
    }
}

fn save_overwrite(destination: &Path, contents: &[u8]) -> StorageResult<()> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let partial = destination.with_extension(PARTIAL_SUFFIX);
    fs::write(&partial, contents)?;
    if let Err(err) = fs::rename(&partial, destination) {
        let _ = fs::remove_file(&partial);
        return Err(StorageError::Io(err));
    }
    Ok(())
}
