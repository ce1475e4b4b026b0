//! Workspace model: ordered projects of ordered documents.

mod document;
mod loader;

use std::path::{Path, PathBuf};

pub use document::{Document, DocumentId};
pub use loader::{load_workspace, LoadError};

/// A named group of documents. Document paths are unique within a project.
#[derive(Debug)]
pub struct Project {
    name: String,
    documents: Vec<Document>,
}

impl Project {
    pub fn new(name: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            name: name.into(),
            documents,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub(crate) fn documents_mut(&mut self) -> &mut [Document] {
        &mut self.documents
    }
}

/// An ordered sequence of projects rooted at a directory, processed as one
/// unit. Iteration order is load order and is stable, which is what makes
/// transformation passes deterministic.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    projects: Vec<Project>,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, projects: Vec<Project>) -> Self {
        Self {
            root: root.into(),
            projects,
        }
    }

    /// Filesystem root all document paths are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub(crate) fn projects_mut(&mut self) -> &mut [Project] {
        &mut self.projects
    }

    pub fn document_count(&self) -> usize {
        self.projects.iter().map(|p| p.documents.len()).sum()
    }

    /// Iterate all documents in workspace order, with their project names.
    pub fn documents(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.projects
            .iter()
            .flat_map(|p| p.documents.iter().map(move |d| (p.name.as_str(), d)))
    }

    /// Find a document by identity.
    pub fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.projects
            .iter()
            .find(|p| p.name == id.project)?
            .documents
            .iter()
            .find(|d| d.path() == &id.path)
    }
}
