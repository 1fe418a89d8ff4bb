//! Error types for loopcard operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for loopcard operations.
pub type Result<T> = std::result::Result<T, LoopcardError>;

/// Errors that can occur while building or editing song folders.
#[derive(Error, Debug)]
pub enum LoopcardError {
    // Input Errors
    #[error("Invalid number of source files: {count} (expected 1 to 5)")]
    InvalidInputCount { count: usize },

    #[error("No wav files found in: {path}")]
    NoSourceFiles { path: PathBuf },

    #[error("Source folder does not exist: {path}")]
    SourceFolderMissing { path: PathBuf },

    // Gateway Errors
    #[error("Transcode failed for {path}: {reason}")]
    TranscodeFailed { path: PathBuf, reason: String },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Swap Errors
    //
    // `restored` records whether the on-disk names were put back; a swap
    // that could not be rolled back leaves files under temporary names.
    #[error("Swap failed: {reason}")]
    SwapFailed { reason: String, restored: bool },

    // Registry Errors
    #[error("Registry file not found: {path}")]
    RegistryMissing { path: PathBuf },

    #[error("Registry has no entry for: {key}")]
    RegistryKeyMissing { key: String },

    #[error("Unrecognized registry format: {reason}")]
    RegistryFormat { reason: String },

    #[error("Failed to write registry: {path}: {source}")]
    RegistryWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Generic Errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoopcardError {
    /// Returns true if the song folder may have been left with files under
    /// temporary names and needs manual repair before the next operation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LoopcardError::SwapFailed { restored: false, .. })
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            LoopcardError::InvalidInputCount { .. } => Some("Supply between 1 and 5 wav files."),
            LoopcardError::NoSourceFiles { .. } => {
                Some("Check that the source folder contains .wav files.")
            }
            LoopcardError::SourceFolderMissing { .. } => {
                Some("Check the source folder path and try again.")
            }
            LoopcardError::TranscodeFailed { .. } => {
                Some("Check that ffmpeg is installed and the input is valid audio.")
            }
            LoopcardError::FileNotFound { .. } => Some("Check the file path and try again."),
            LoopcardError::SwapFailed {
                restored: false, ..
            } => Some("Rename the temporary files back by hand before retrying."),
            LoopcardError::RegistryMissing { .. } => {
                Some("Rebuild the song folder with 'loopcard create'.")
            }
            LoopcardError::RegistryFormat { .. } => {
                Some("Try 'loopcard convert-registry' to upgrade a legacy NAME.json.")
            }
            _ => None,
        }
    }
}
