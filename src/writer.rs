//! Persistence writer: flush a ChangeSet back to disk.
//!
//! Only documents present in the ChangeSet get any I/O; everything else keeps
//! its bytes and its mtime. Each write is independent: a failure is recorded
//! and the remaining documents are still written.

use crate::driver::{ChangeSet, DocumentChange};
use crate::safety::{SafetyError, WorkspaceGuard};
use crate::workspace::DocumentId;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("on-disk text of {path} no longer matches the text this change was computed from")]
    StaleSource { path: PathBuf },

    #[error(transparent)]
    Boundary(#[from] SafetyError),
}

/// One successfully written document.
#[derive(Debug)]
pub struct WriteOutcome {
    pub id: DocumentId,
    pub path: PathBuf,
    pub bytes_written: usize,
}

/// One document that could not be written.
#[derive(Debug)]
pub struct WriteFailure {
    pub id: DocumentId,
    pub error: WriteError,
}

/// Per-document results of a write stage. Failures never abort the stage.
#[derive(Debug, Default)]
#[must_use = "WriteReport should be checked for failures"]
pub struct WriteReport {
    pub written: Vec<WriteOutcome>,
    pub failures: Vec<WriteFailure>,
}

impl WriteReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure_for(&self, id: &DocumentId) -> Option<&WriteFailure> {
        self.failures.iter().find(|f| &f.id == id)
    }
}

/// Writes changed documents back to their original paths.
pub struct FileWriter {
    guard: WorkspaceGuard,
    verify: bool,
}

impl FileWriter {
    /// Create a writer rooted at the workspace directory.
    pub fn new(workspace_root: impl AsRef<Path>) -> Result<Self, SafetyError> {
        Ok(Self {
            guard: WorkspaceGuard::new(workspace_root)?,
            verify: true,
        })
    }

    /// Skip the stale-source check (for callers that own the files outright).
    pub fn without_verification(mut self) -> Self {
        self.verify = false;
        self
    }

    /// Write every document in the ChangeSet, collecting per-document
    /// failures. Documents absent from the ChangeSet get no I/O at all.
    pub fn write(&self, change_set: &ChangeSet) -> WriteReport {
        let mut report = WriteReport::default();

        for change in &change_set.changes {
            match self.write_one(change) {
                Ok(outcome) => report.written.push(outcome),
                Err(error) => report.failures.push(WriteFailure {
                    id: change.id.clone(),
                    error,
                }),
            }
        }

        report
    }

    fn write_one(&self, change: &DocumentChange) -> Result<WriteOutcome, WriteError> {
        let path = self.guard.validate_path(&change.id.path)?;

        if self.verify {
            let current = fs::read(&path).map_err(|source| WriteError::Io {
                path: path.clone(),
                source,
            })?;
            // The change was computed against original_text; if someone else
            // touched the file since, fail this document instead of
            // clobbering their edit.
            if xxh3_64(&current) != xxh3_64(change.original_text.as_bytes()) {
                return Err(WriteError::StaleSource { path });
            }
        }

        atomic_write(&path, change.new_text.as_bytes())?;

        // Bump mtime so downstream tooling notices the change
        let now = filetime::FileTime::now();
        filetime::set_file_mtime(&path, now).map_err(|source| WriteError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(WriteOutcome {
            id: change.id.clone(),
            path,
            bytes_written: change.new_text.len(),
        })
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full new text lands or the original file is untouched.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), WriteError> {
    let parent = path.parent().ok_or_else(|| WriteError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent"),
    })?;

    let io_err = |source: std::io::Error| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
    temp.write_all(content).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;

    Ok(())
}
