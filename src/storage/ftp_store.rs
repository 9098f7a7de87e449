//! Single-value FTP persistence.
//!
//! The file holds one line: the rider's FTP as a number. Reading happens once
//! per session in the host; the analysis itself only ever receives the value.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// FTP file errors.
#[derive(Debug, Error)]
pub enum FtpStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("FTP file {path} does not contain a number: '{content}'")]
    NotANumber { path: PathBuf, content: String },

    #[error("FTP must be a positive number, got {0}")]
    NotPositive(f64),
}

/// A one-line text file holding FTP in watts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpStore {
    path: PathBuf,
}

impl FtpStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored FTP; `Ok(None)` when the file does not exist.
    pub fn load(&self) -> Result<Option<f64>, FtpStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let trimmed = content.trim();
        let ftp: f64 = trimmed.parse().map_err(|_| FtpStoreError::NotANumber {
            path: self.path.clone(),
            content: trimmed.to_string(),
        })?;
        if !ftp.is_finite() || ftp <= 0.0 {
            return Err(FtpStoreError::NotPositive(ftp));
        }

        tracing::debug!("Loaded FTP {} W from {}", ftp, self.path.display());
        Ok(Some(ftp))
    }

    /// Persist `ftp`, creating parent directories as needed.
    pub fn save(&self, ftp: f64) -> Result<(), FtpStoreError> {
        if !ftp.is_finite() || ftp <= 0.0 {
            return Err(FtpStoreError::NotPositive(ftp));
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, format!("{}\n", ftp))?;
        tracing::info!("Saved FTP {} W to {}", ftp, self.path.display());
        Ok(())
    }
}
