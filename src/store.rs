//! On-disk persistence for the backing file.
//!
//! This module owns the only shared resource in the system: the settings
//! file the overlays read. The mutation discipline is always the same
//! sequence — read the current text, apply the changed keys onto it, stage
//! the full new content in a temporary file in the same directory, and
//! atomically replace the target. A concurrent reader therefore sees either
//! fully the old content or fully the new content, never a half-written
//! intermediate, and a crash mid-write leaves the original intact.
//!
//! Re-reading before every commit means keys this process did not change are
//! never stomped, even if another process edited them since our last read.
//! There is no optimistic-concurrency detection beyond that: exactly one
//! writer process is assumed.
//!
//! # Path convention
//!
//! The default location is `Settings/settings.js` next to the executable
//! (falling back to the current directory when the executable path is
//! unavailable). An explicit override may be a directory — the file name is
//! appended — or a full file path.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::document;
use crate::error::SyncError;
use crate::schema::{KeySpec, Value};
use crate::snapshot::Snapshot;

/// Subdirectory holding the backing file.
pub const SETTINGS_DIR: &str = "Settings";
/// File name of the backing file.
pub const SETTINGS_FILE: &str = "settings.js";

/// Outcome of a commit attempt that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// New content was staged and atomically replaced the target.
    Written,
    /// The computed content was identical to what is on disk; no I/O ran.
    Unchanged,
}

/// The directory paths are resolved against: the executable's directory,
/// or the current directory when that cannot be determined.
pub fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve the backing file path from an optional override.
///
/// `None` yields the default `<base>/Settings/settings.js`. A `Some` override
/// that names a directory gets [`SETTINGS_FILE`] appended; any other path is
/// used as-is.
pub fn resolve_settings_path(override_path: Option<&Path>) -> PathBuf {
    match override_path {
        Some(p) if p.is_dir() => p.join(SETTINGS_FILE),
        Some(p) => p.to_path_buf(),
        None => base_dir().join(SETTINGS_DIR).join(SETTINGS_FILE),
    }
}

/// Handle on the backing file.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    /// A store at the default path convention.
    pub fn at_default_path() -> Self {
        Store::new(resolve_settings_path(None))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw document text, or `None` if the file does not exist.
    ///
    /// Only genuine I/O errors (permissions and the like) propagate; a
    /// missing file is a recoverable condition everywhere in this crate.
    pub fn read_document(&self) -> Result<Option<String>, SyncError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SyncError::Read {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Parse the current on-disk values into a snapshot.
    ///
    /// A missing file yields the full default snapshot.
    pub fn load(&self) -> Result<Snapshot, SyncError> {
        match self.read_document()? {
            Some(content) => Ok(document::parse(&content)),
            None => {
                debug!("{} not found, starting from defaults", self.path.display());
                Ok(Snapshot::defaults())
            }
        }
    }

    /// Apply `changes` onto the current on-disk document and commit the
    /// result atomically.
    ///
    /// When the file is missing it is created fresh with the computed
    /// assignments. When the computed content equals what is already on disk
    /// the commit is skipped entirely — no temp file, no replace.
    pub fn commit(&self, changes: &[(&'static KeySpec, Value)]) -> Result<Commit, SyncError> {
        let current = self.read_document()?;
        let base = current.as_deref().unwrap_or("");
        let next = document::apply(base, changes);

        if next == base {
            debug!("{}: no textual change, skipping write", self.path.display());
            return Ok(Commit::Unchanged);
        }

        self.replace_with(&next)?;
        info!(
            "{}: committed {} key(s)",
            self.path.display(),
            changes.len()
        );
        Ok(Commit::Written)
    }

    /// Stage `content` in a same-directory temp file and rename it over the
    /// target. The rename is the commit point.
    fn replace_with(&self, content: &str) -> Result<(), SyncError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| SyncError::Stage {
            dir: dir.clone(),
            source: e,
        })?;

        let mut staged = NamedTempFile::new_in(&dir).map_err(|e| SyncError::Stage {
            dir: dir.clone(),
            source: e,
        })?;
        staged
            .write_all(content.as_bytes())
            .map_err(|e| SyncError::Stage {
                dir: dir.clone(),
                source: e,
            })?;
        staged.persist(&self.path).map_err(|e| SyncError::Replace {
            path: self.path.clone(),
            source: e.error,
        })?;
        Ok(())
    }
}
