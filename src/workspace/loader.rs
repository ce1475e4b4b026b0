//! Folder-scan workspace loader.
//!
//! This is the external collaborator at the core's load boundary: it turns a
//! directory into an ordered Workspace. Each top-level directory holding
//! recognized sources becomes a Project; sources directly under the root form
//! a project named after the root directory. The walk is sorted, so two loads
//! of the same tree always produce the same workspace order.

use crate::lang;
use crate::workspace::{Document, Project, Workspace};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Directories never scanned for sources.
const SKIPPED_DIRS: &[&str] = &["target", "bin", "obj", "node_modules"];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("workspace source not found: {0}")]
    NotFound(PathBuf),

    #[error("workspace source is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to scan workspace: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no recognized source documents under {0}")]
    NoSources(PathBuf),
}

/// Load a workspace from a directory.
///
/// Fatal on any failure: with no workspace there is nothing to transform.
/// Documents are returned unparsed; the driver parses each at most once per
/// pass.
pub fn load_workspace(root: impl AsRef<Path>) -> Result<Workspace, LoadError> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(LoadError::NotFound(root.to_path_buf()));
    }
    let root = root
        .canonicalize()
        .map_err(|source| LoadError::Io {
            path: root.to_path_buf(),
            source,
        })?;
    if !root.is_dir() {
        return Err(LoadError::NotADirectory(root));
    }

    let root_project_name = root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(".")
        .to_string();

    // BTreeMap keeps project order deterministic (sorted by name); the
    // sorted walk keeps document order deterministic within each project.
    let mut projects: BTreeMap<String, Vec<Document>> = BTreeMap::new();

    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !(name.starts_with('.') && entry.depth() > 0) && !SKIPPED_DIRS.contains(&name.as_ref())
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(detected) = lang::detect(entry.path()) else {
            continue;
        };

        let rel = entry
            .path()
            .strip_prefix(&root)
            .expect("walked path is always under the walk root")
            .to_path_buf();

        let project = match rel.components().count() {
            1 => root_project_name.clone(),
            _ => rel
                .components()
                .next()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .unwrap_or_else(|| root_project_name.clone()),
        };

        let text = fs::read_to_string(entry.path()).map_err(|source| LoadError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;

        projects
            .entry(project)
            .or_default()
            .push(Document::new(rel, detected, text));
    }

    if projects.is_empty() {
        return Err(LoadError::NoSources(root));
    }

    let projects = projects
        .into_iter()
        .map(|(name, documents)| Project::new(name, documents))
        .collect();

    Ok(Workspace::new(root, projects))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::create_dir_all(dir.path().join("target/debug")).unwrap();

        fs::write(dir.path().join("app/main.cs"), "class A {}").unwrap();
        fs::write(dir.path().join("app/util.cs"), "class B {}").unwrap();
        fs::write(dir.path().join("lib/core.rs"), "fn f() {}").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        fs::write(dir.path().join("target/debug/gen.rs"), "fn g() {}").unwrap();
        dir
    }

    #[test]
    fn loads_projects_from_top_level_dirs() {
        let dir = setup_workspace();
        let ws = load_workspace(dir.path()).unwrap();

        let names: Vec<_> = ws.projects().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["app", "lib"]);
        assert_eq!(ws.document_count(), 3);
    }

    #[test]
    fn skips_build_dirs_and_unrecognized_files() {
        let dir = setup_workspace();
        let ws = load_workspace(dir.path()).unwrap();

        for (_, doc) in ws.documents() {
            assert!(!doc.path().starts_with("target"));
            assert_ne!(doc.path().extension().unwrap(), "md");
        }
    }

    #[test]
    fn load_is_deterministic() {
        let dir = setup_workspace();
        let a = load_workspace(dir.path()).unwrap();
        let b = load_workspace(dir.path()).unwrap();

        let order =
            |ws: &Workspace| ws.documents().map(|(_, d)| d.path().clone()).collect::<Vec<_>>();
        assert_eq!(order(&a), order(&b));
    }

    #[test]
    fn root_level_sources_form_root_project() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("single.rs"), "fn f() {}").unwrap();

        let ws = load_workspace(dir.path()).unwrap();
        assert_eq!(ws.projects().len(), 1);
        assert_eq!(ws.document_count(), 1);
    }

    #[test]
    fn missing_root_is_fatal() {
        let result = load_workspace("/nonexistent/treewright-test");
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn sourceless_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "nothing here").unwrap();

        let result = load_workspace(dir.path());
        assert!(matches!(result, Err(LoadError::NoSources(_))));
    }
}
