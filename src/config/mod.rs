//! Rule-pipeline configuration: TOML schema, validation, loading.

mod loader;
mod schema;

pub use loader::{load_from_path, load_from_str, ConfigError};
pub use schema::{Metadata, RuleDefinition, RunConfig, ValidationError, ValidationIssue};
