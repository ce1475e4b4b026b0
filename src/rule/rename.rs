use crate::lang::DECLARATION_KINDS;
use crate::rule::RewriteRule;
use crate::tree::Node;

/// Rename declarations whose name starts with a prefix.
///
/// Matches structurally: the node's kind must be in the configured
/// declaration-kind set, and the prefix check is anchored at the start of the
/// declared name token only. `MyOldFoo` never matches prefix `Old`, and
/// references to a renamed declaration are left alone (they are not
/// declarations).
///
/// Idempotence: rewriting to a token equal to the current one is a strict
/// no-op, so a replacement equal to the prefix converges after one pass. A
/// replacement that itself starts with the prefix (e.g. `Old` -> `OldNew`)
/// re-matches on every pass; for such configurations only a single pass is
/// guaranteed to converge.
pub struct RenamePrefix {
    prefix: String,
    replacement: String,
    kinds: Vec<String>,
}

impl RenamePrefix {
    /// Create a rename rule over the default declaration kinds.
    pub fn new(prefix: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            replacement: replacement.into(),
            kinds: DECLARATION_KINDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Restrict the rule to an explicit set of declaration kinds.
    pub fn with_kinds(mut self, kinds: Vec<String>) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// Resolve the declared-name leaf of a declaration node.
///
/// Grammars disagree on nesting: C# and Rust put an identifier leaf directly
/// under the declaration's `name` field, while C routes through
/// `declarator` fields (`function_definition` -> `function_declarator` ->
/// `identifier`). Follow `name` first, then `declarator`, until a leaf is
/// reached; accept it only if it is an identifier-class token.
fn declared_name_path(node: &Node) -> Option<Vec<usize>> {
    let mut path = Vec::new();
    let mut cur = node;
    loop {
        let (index, child) = cur
            .child_by_field("name")
            .or_else(|| cur.child_by_field("declarator"))?;
        path.push(index);
        if child.is_leaf() {
            return child.kind().ends_with("identifier").then_some(path);
        }
        cur = child;
    }
}

impl RewriteRule for RenamePrefix {
    fn name(&self) -> &str {
        "rename-prefix"
    }

    fn rewrite(&self, node: &Node) -> Node {
        if !self.kinds.iter().any(|k| k == node.kind()) {
            return node.clone();
        }
        let Some(path) = declared_name_path(node) else {
            return node.clone();
        };
        let name_leaf = match node.descendant(&path) {
            Some(leaf) => leaf.clone(),
            None => return node.clone(),
        };
        let token = match name_leaf.token() {
            Some(token) => token,
            None => return node.clone(),
        };
        let Some(rest) = token.strip_prefix(&self.prefix) else {
            return node.clone();
        };

        let new_token = format!("{}{rest}", self.replacement);
        if new_token == token {
            // Semantic no-op; keep identity so nothing is marked dirty
            return node.clone();
        }

        node.replace_descendant(&path, name_leaf.with_token(&new_token))
    }
}
