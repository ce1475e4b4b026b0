use std::path::{Path, PathBuf};
use thiserror::Error;

/// Workspace boundary checks: the writer may only touch files inside the
/// workspace it was created for.
#[derive(Debug, Clone)]
pub struct WorkspaceGuard {
    /// Absolute path to workspace root
    workspace_root: PathBuf,
    /// Canonical paths to forbidden directories
    forbidden_paths: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("path is outside workspace: {path} (workspace: {workspace})")]
    OutsideWorkspace { path: PathBuf, workspace: PathBuf },

    #[error("path is in forbidden directory: {path} (forbidden: {forbidden})")]
    ForbiddenPath { path: PathBuf, forbidden: PathBuf },

    #[error("failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

impl WorkspaceGuard {
    /// Create a guard for the given workspace root.
    ///
    /// The root is canonicalized so symlinked workspaces behave correctly.
    /// Build output directories under the root are forbidden by default; a
    /// transformed document never lives there.
    pub fn new(workspace_root: impl AsRef<Path>) -> Result<Self, SafetyError> {
        let workspace_root = workspace_root.as_ref().canonicalize()?;

        let mut forbidden_paths = Vec::new();
        for dir in ["target", "bin", "obj", "node_modules"] {
            if let Ok(path) = workspace_root.join(dir).canonicalize() {
                forbidden_paths.push(path);
            }
        }

        Ok(Self {
            workspace_root,
            forbidden_paths,
        })
    }

    /// Create a guard with an explicit forbidden list.
    pub fn with_forbidden(
        workspace_root: impl AsRef<Path>,
        forbidden: Vec<PathBuf>,
    ) -> Result<Self, SafetyError> {
        let workspace_root = workspace_root.as_ref().canonicalize()?;
        Ok(Self {
            workspace_root,
            forbidden_paths: forbidden,
        })
    }

    /// Check that a path is safe to write.
    ///
    /// Relative paths resolve against the workspace root. Returns the
    /// canonicalized absolute path if it stays inside the workspace; symlink
    /// escapes are caught because the check runs on the canonical path.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SafetyError> {
        let path = path.as_ref();

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        };

        let canonical = absolute.canonicalize()?;

        if !canonical.starts_with(&self.workspace_root) {
            return Err(SafetyError::OutsideWorkspace {
                path: canonical,
                workspace: self.workspace_root.clone(),
            });
        }

        for forbidden in &self.forbidden_paths {
            if canonical.starts_with(forbidden) {
                return Err(SafetyError::ForbiddenPath {
                    path: canonical,
                    forbidden: forbidden.clone(),
                });
            }
        }

        Ok(canonical)
    }

    /// Get the workspace root.
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}
