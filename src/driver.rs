//! Transformation driver: one pass of parse -> rewrite -> diff over a
//! workspace.

use crate::parse::ParseError;
use crate::pool;
use crate::rule::{rewrite_tree, RulePipeline};
use crate::tree::Node;
use crate::workspace::{DocumentId, Workspace};

/// One document whose tree changed during a pass.
#[derive(Debug)]
pub struct DocumentChange {
    pub id: DocumentId,
    /// Text the change was computed from, kept for diffing and for the
    /// writer's stale-source check.
    pub original_text: String,
    /// Rendered text of the new root.
    pub new_text: String,
}

/// A document that could not be transformed this pass.
#[derive(Debug)]
pub struct TransformFailure {
    pub id: DocumentId,
    pub error: ParseError,
}

/// The outcome of one transformation pass: changed documents plus isolated
/// per-document failures. Transient; recomputed each pass.
#[derive(Debug, Default)]
pub struct ChangeSet {
    pub changes: Vec<DocumentChange>,
    pub failures: Vec<TransformFailure>,
}

impl ChangeSet {
    /// True when no document changed. Failures do not count as changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.changes.iter().any(|c| &c.id == id)
    }

    pub fn failure_for(&self, id: &DocumentId) -> Option<&TransformFailure> {
        self.failures.iter().find(|f| &f.id == id)
    }
}

/// Apply a rule pipeline to every document of a workspace, in workspace
/// order.
///
/// Pure with respect to its inputs: the same workspace and pipeline always
/// produce the same ChangeSet. Each document is parsed at most once per pass
/// (documents already carrying a tree from an earlier pass are walked as-is),
/// and a document whose walk returns the identical root is left untouched in
/// the output workspace. A parse failure isolates that document: it is
/// excluded from the ChangeSet, recorded as a failure, and the pass
/// continues.
///
/// Running `apply` twice with idempotent rules yields an empty ChangeSet the
/// second time; see [`crate::rule::RenamePrefix`] for the one documented
/// exception.
pub fn apply(mut workspace: Workspace, pipeline: &RulePipeline) -> (Workspace, ChangeSet) {
    let mut change_set = ChangeSet::default();

    for project in workspace.projects_mut() {
        let project_name = project.name().to_string();
        for doc in project.documents_mut() {
            let id = DocumentId {
                project: project_name.clone(),
                path: doc.path().clone(),
            };

            let root = match doc.root() {
                Some(root) => root.clone(),
                None => {
                    match pool::parse(doc.lang(), doc.text()) {
                        Ok(root) => {
                            doc.set_parsed(root.clone());
                            root
                        }
                        Err(error) => {
                            change_set.failures.push(TransformFailure { id, error });
                            continue;
                        }
                    }
                }
            };

            let new_root = rewrite_tree(&root, pipeline);
            if Node::same(&new_root, &root) {
                continue;
            }

            let original_text = doc.text().to_string();
            let new_text = new_root.render();
            doc.replace_root(new_root, new_text.clone());
            change_set.changes.push(DocumentChange {
                id,
                original_text,
                new_text,
            });
        }
    }

    (workspace, change_set)
}
