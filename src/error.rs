use std::path::PathBuf;
use thiserror::Error;

/// Errors from the settings synchronization layer.
///
/// None of these are fatal to a controlling process: every failure path
/// leaves the prior on-disk content valid, because the atomic-replace commit
/// either fully ran or never started.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to stage temporary file in {dir}: {source}")]
    Stage {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to replace {path}: {source}")]
    Replace {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to scan {dir}: {source}")]
    Scan {
        dir: PathBuf,
        source: walkdir::Error,
    },
}
