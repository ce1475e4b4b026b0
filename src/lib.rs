//! Treewright: batch source transformation engine
//!
//! Parses every document of a multi-project workspace into a persistent
//! syntax tree, applies a pipeline of structural rewrite rules, and writes
//! back only the documents whose trees actually changed.
//!
//! # Architecture
//!
//! Change detection rests on a single primitive: [`Node`] is an immutable,
//! structurally-shared tree, and a rewrite that changes nothing returns the
//! node it received. Pointer identity therefore answers "did anything
//! change" without any text comparison, and an untouched document is
//! guaranteed byte-identical on disk because it never gets an I/O call.
//!
//! # Safety
//!
//! - Round-trip fidelity: an accepted parse always renders back to the exact
//!   input text
//! - Atomic file writes (tempfile + fsync + rename)
//! - Workspace boundary enforcement before every write
//! - Stale-source detection: a document edited behind the engine's back is
//!   failed, not clobbered
//! - Per-document error isolation; only workspace load failure is fatal
//!
//! # Example
//!
//! ```no_run
//! use treewright::{apply, load_workspace, FileWriter, RenamePrefix, RulePipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let workspace = load_workspace("path/to/workspace")?;
//! let pipeline = RulePipeline::new().with_rule(RenamePrefix::new("Old", "New"));
//!
//! let (workspace, changes) = apply(workspace, &pipeline);
//! let report = FileWriter::new(workspace.root())?.write(&changes);
//!
//! println!("{} written, {} failed", report.written.len(), report.failures.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;
pub mod lang;
pub mod parse;
pub mod pool;
pub mod report;
pub mod rule;
pub mod safety;
pub mod tree;
pub mod workspace;
pub mod writer;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, RunConfig};
pub use driver::{apply, ChangeSet, DocumentChange, TransformFailure};
pub use parse::{ParseError, SourceParser};
pub use report::{DocumentReport, DocumentStatus, RunReport};
pub use rule::{rewrite_tree, RenamePrefix, RewriteRule, RulePipeline};
pub use safety::{SafetyError, WorkspaceGuard};
pub use tree::Node;
pub use workspace::{load_workspace, Document, DocumentId, LoadError, Project, Workspace};
pub use writer::{FileWriter, WriteError, WriteReport};
