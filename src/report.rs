//! Per-document run reporting.
//!
//! A completed run assigns every document exactly one status. The report is
//! data only; presentation (colors, diffs, JSON) belongs to the front-end.

use crate::driver::ChangeSet;
use crate::workspace::{DocumentId, Workspace};
use crate::writer::WriteReport;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentStatus {
    Unchanged,
    Transformed,
    TransformFailed,
    WriteFailed,
}

#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub project: String,
    pub path: PathBuf,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub documents: Vec<DocumentReport>,
}

impl RunReport {
    /// Assemble the per-document statuses of one run.
    ///
    /// `write_report` is `None` for dry runs; transformed documents then
    /// report as transformed without a write having happened.
    pub fn assemble(
        workspace: &Workspace,
        change_set: &ChangeSet,
        write_report: Option<&WriteReport>,
    ) -> Self {
        let documents = workspace
            .documents()
            .map(|(project, doc)| {
                let id = DocumentId {
                    project: project.to_string(),
                    path: doc.path().clone(),
                };

                let (status, detail) = if let Some(failure) = change_set.failure_for(&id) {
                    (DocumentStatus::TransformFailed, Some(failure.error.to_string()))
                } else if let Some(failure) =
                    write_report.and_then(|report| report.failure_for(&id))
                {
                    (DocumentStatus::WriteFailed, Some(failure.error.to_string()))
                } else if change_set.contains(&id) {
                    (DocumentStatus::Transformed, None)
                } else {
                    (DocumentStatus::Unchanged, None)
                };

                DocumentReport {
                    project: id.project,
                    path: id.path,
                    status,
                    detail,
                }
            })
            .collect();

        Self { documents }
    }

    pub fn count(&self, status: DocumentStatus) -> usize {
        self.documents.iter().filter(|d| d.status == status).count()
    }

    /// True when every document is unchanged or transformed.
    pub fn is_clean(&self) -> bool {
        self.count(DocumentStatus::TransformFailed) == 0
            && self.count(DocumentStatus::WriteFailed) == 0
    }
}
