use crate::rule::{RenamePrefix, RulePipeline};
use serde::Deserialize;
use std::fmt;

/// A rule-pipeline definition, usually loaded from a TOML file:
///
/// ```toml
/// [meta]
/// description = "Migrate legacy Old* APIs"
///
/// [[rules]]
/// type = "rename_prefix"
/// prefix = "Old"
/// replacement = "New"
/// ```
#[derive(Debug, Deserialize, Default, Clone)]
pub struct RunConfig {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleDefinition {
    RenamePrefix {
        prefix: String,
        replacement: String,
        /// Declaration kinds to match; empty means the built-in defaults.
        #[serde(default)]
        kinds: Vec<String>,
    },
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.rules.is_empty() {
            issues.push(ValidationIssue::EmptyRuleList);
        }

        for (index, rule) in self.rules.iter().enumerate() {
            match rule {
                RuleDefinition::RenamePrefix {
                    prefix,
                    replacement,
                    ..
                } => {
                    if prefix.is_empty() {
                        issues.push(ValidationIssue::MissingField {
                            rule_index: index,
                            field: "prefix",
                        });
                    }
                    // Old -> OldNew re-matches its own output; such a
                    // pipeline only guarantees convergence for one pass.
                    if !prefix.is_empty()
                        && replacement != prefix
                        && replacement.starts_with(prefix.as_str())
                    {
                        issues.push(ValidationIssue::NonConvergentRule { rule_index: index });
                    }
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Build the rule pipeline this config describes.
    pub fn pipeline(&self) -> RulePipeline {
        let mut pipeline = RulePipeline::new();
        for rule in &self.rules {
            match rule {
                RuleDefinition::RenamePrefix {
                    prefix,
                    replacement,
                    kinds,
                } => {
                    let mut rename = RenamePrefix::new(prefix.clone(), replacement.clone());
                    if !kinds.is_empty() {
                        rename = rename.with_kinds(kinds.clone());
                    }
                    pipeline.push(Box::new(rename));
                }
            }
        }
        pipeline
    }
}

#[derive(Debug)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} issue(s):", self.issues.len())?;
        for issue in &self.issues {
            write!(f, " {issue};")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
pub enum ValidationIssue {
    EmptyRuleList,
    MissingField {
        rule_index: usize,
        field: &'static str,
    },
    NonConvergentRule {
        rule_index: usize,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyRuleList => write!(f, "config defines no rules"),
            ValidationIssue::MissingField { rule_index, field } => {
                write!(f, "rule {rule_index} is missing '{field}'")
            }
            ValidationIssue::NonConvergentRule { rule_index } => {
                write!(
                    f,
                    "rule {rule_index}: replacement re-matches its own prefix, \
                     only a single pass is guaranteed to converge"
                )
            }
        }
    }
}
