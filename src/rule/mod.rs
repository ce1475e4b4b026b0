//! Structural rewrite rules and the tree walk that applies them.

mod rename;
mod walk;

use crate::tree::Node;

pub use rename::RenamePrefix;
pub use walk::rewrite_tree;

/// A pure node-to-node transformation.
///
/// A rule inspects one node at a time and returns its replacement. Returning
/// the node it received (any clone of it) signals a no-op; the walk and the
/// driver use that pointer identity as the change signal, so a rule must
/// never rebuild a node it did not change. Rules carry no per-walk mutable
/// state; parameterization happens at construction time.
pub trait RewriteRule {
    /// Human-readable rule name for reporting.
    fn name(&self) -> &str;

    /// Map a node to its (possibly unchanged) replacement.
    fn rewrite(&self, node: &Node) -> Node;
}

/// An ordered rule pipeline, composed left-to-right.
///
/// When several rules apply to the same node they run sequentially, each
/// seeing the previous rule's output.
#[derive(Default)]
pub struct RulePipeline {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl RulePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Box<dyn RewriteRule>) {
        self.rules.push(rule);
    }

    pub fn with_rule(mut self, rule: impl RewriteRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Apply every rule to one node, in pipeline order.
    pub fn apply(&self, node: &Node) -> Node {
        let mut current = node.clone();
        for rule in &self.rules {
            current = rule.rewrite(&current);
        }
        current
    }
}
