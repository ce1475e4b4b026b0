use crate::lang::SupportLang;
use crate::tree::Node;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Identity of a document within a workspace: owning project plus the
/// project-unique, workspace-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentId {
    pub project: String,
    pub path: PathBuf,
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project, self.path.display())
    }
}

/// One source file: its path, text, and parsed trees.
///
/// `text` always backs the current root: the driver updates both together
/// whenever it replaces the root. Dirtiness is computed, never stored — a
/// document is dirty iff its current root is not pointer-identical to the
/// root that came out of the original parse.
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    lang: SupportLang,
    text: String,
    original_root: Option<Node>,
    root: Option<Node>,
}

impl Document {
    /// Create an unparsed document. The driver parses it on the first pass.
    pub fn new(path: impl Into<PathBuf>, lang: SupportLang, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            lang,
            text: text.into(),
            original_root: None,
            root: None,
        }
    }

    /// Workspace-relative path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn lang(&self) -> SupportLang {
        self.lang
    }

    /// Text backing the current root.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current root, if the document has been parsed.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Root as originally parsed, before any transformation.
    pub fn original_root(&self) -> Option<&Node> {
        self.original_root.as_ref()
    }

    /// True iff the current root differs (by identity) from the originally
    /// parsed one.
    pub fn is_dirty(&self) -> bool {
        match (&self.original_root, &self.root) {
            (Some(original), Some(current)) => !Node::same(original, current),
            _ => false,
        }
    }

    /// Record the result of the initial parse. Both roots start identical,
    /// so a freshly parsed document is clean.
    pub(crate) fn set_parsed(&mut self, root: Node) {
        self.original_root = Some(root.clone());
        self.root = Some(root);
    }

    /// Replace the current root and the text backing it.
    pub(crate) fn replace_root(&mut self, root: Node, text: String) {
        self.root = Some(root);
        self.text = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf() -> Node {
        Node::leaf("identifier", None, "", "x")
    }

    #[test]
    fn unparsed_document_is_clean() {
        let doc = Document::new("a.rs", SupportLang::Rust, "fn x() {}");
        assert!(!doc.is_dirty());
        assert!(doc.root().is_none());
    }

    #[test]
    fn freshly_parsed_document_is_clean() {
        let mut doc = Document::new("a.rs", SupportLang::Rust, "x");
        doc.set_parsed(leaf());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn replacing_root_marks_dirty() {
        let mut doc = Document::new("a.rs", SupportLang::Rust, "x");
        doc.set_parsed(leaf());
        doc.replace_root(leaf(), "y".to_string());
        assert!(doc.is_dirty());
        assert_eq!(doc.text(), "y");
    }

    #[test]
    fn replacing_root_with_same_node_stays_clean() {
        let mut doc = Document::new("a.rs", SupportLang::Rust, "x");
        let root = leaf();
        doc.set_parsed(root.clone());
        doc.replace_root(root, "x".to_string());
        assert!(!doc.is_dirty());
    }
}
