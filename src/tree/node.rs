use std::fmt;
use std::rc::Rc;

/// A persistent syntax tree node.
///
/// Nodes are immutable and structurally shared: "updating" a node produces a
/// new `Node` whose unreplaced subtrees are the same `Rc` allocations as the
/// original's. Cloning a `Node` is a pointer copy, and two clones of the same
/// node compare equal under [`Node::same`]. That pointer identity is the
/// engine's change signal: a rewrite that returns the node it received is a
/// no-op, with no text comparison needed.
///
/// All source text lives in leaves. A leaf carries the trivia (whitespace,
/// comments) between the previous token and its own token, so concatenating
/// leaf text left-to-right reproduces the original source byte-for-byte.
#[derive(Clone)]
pub struct Node {
    data: Rc<NodeData>,
}

struct NodeData {
    kind: Box<str>,
    /// Field name this node occupies in its parent (e.g. "name", "body").
    field: Option<Box<str>>,
    content: Content,
}

enum Content {
    Internal(Vec<Node>),
    Leaf { leading: Box<str>, token: Box<str> },
}

impl Node {
    /// Create an internal node from its ordered children.
    pub fn internal(kind: &str, field: Option<&str>, children: Vec<Node>) -> Self {
        Self {
            data: Rc::new(NodeData {
                kind: kind.into(),
                field: field.map(Into::into),
                content: Content::Internal(children),
            }),
        }
    }

    /// Create a leaf node: leading trivia followed by the token text.
    pub fn leaf(kind: &str, field: Option<&str>, leading: &str, token: &str) -> Self {
        Self {
            data: Rc::new(NodeData {
                kind: kind.into(),
                field: field.map(Into::into),
                content: Content::Leaf {
                    leading: leading.into(),
                    token: token.into(),
                },
            }),
        }
    }

    /// Grammar kind tag (e.g. "method_declaration", "identifier").
    pub fn kind(&self) -> &str {
        &self.data.kind
    }

    /// Field name this node occupies in its parent, if any.
    pub fn field(&self) -> Option<&str> {
        self.data.field.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.data.content, Content::Leaf { .. })
    }

    /// Ordered children. Empty for leaves.
    pub fn children(&self) -> &[Node] {
        match &self.data.content {
            Content::Internal(children) => children,
            Content::Leaf { .. } => &[],
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children().get(index)
    }

    /// First child occupying the given field, with its index.
    pub fn child_by_field(&self, field: &str) -> Option<(usize, &Node)> {
        self.children()
            .iter()
            .enumerate()
            .find(|(_, child)| child.field() == Some(field))
    }

    /// Token text of a leaf (without leading trivia).
    pub fn token(&self) -> Option<&str> {
        match &self.data.content {
            Content::Leaf { token, .. } => Some(token),
            Content::Internal(_) => None,
        }
    }

    /// Leading trivia of a leaf.
    pub fn leading(&self) -> Option<&str> {
        match &self.data.content {
            Content::Leaf { leading, .. } => Some(leading),
            Content::Internal(_) => None,
        }
    }

    /// Pointer identity: true iff both handles refer to the same allocation.
    ///
    /// This is the change-detection primitive. Structural equality is
    /// deliberately not implemented; the engine only ever asks "is this the
    /// node I started with".
    pub fn same(a: &Node, b: &Node) -> bool {
        Rc::ptr_eq(&a.data, &b.data)
    }

    /// Render this subtree back to source text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    pub fn render_into(&self, out: &mut String) {
        match &self.data.content {
            Content::Leaf { leading, token } => {
                out.push_str(leading);
                out.push_str(token);
            }
            Content::Internal(children) => {
                for child in children {
                    child.render_into(out);
                }
            }
        }
    }

    /// Return a new node with the child at `index` replaced.
    ///
    /// The receiver is untouched; siblings are shared between old and new
    /// trees. If the replacement is pointer-identical to the existing child,
    /// the receiver itself is returned (identity preserved).
    ///
    /// # Panics
    ///
    /// Panics if the node is a leaf or `index` is out of bounds.
    pub fn replace_child(&self, index: usize, new_child: Node) -> Node {
        let children = match &self.data.content {
            Content::Internal(children) => children,
            Content::Leaf { .. } => panic!("replace_child on leaf node '{}'", self.kind()),
        };
        assert!(
            index < children.len(),
            "child index {index} out of bounds for '{}' with {} children",
            self.kind(),
            children.len()
        );

        if Node::same(&children[index], &new_child) {
            return self.clone();
        }

        let mut new_children = children.clone();
        new_children[index] = new_child;
        Node {
            data: Rc::new(NodeData {
                kind: self.data.kind.clone(),
                field: self.data.field.clone(),
                content: Content::Internal(new_children),
            }),
        }
    }

    /// Return a new internal node with the same kind and field but the given
    /// children.
    pub fn with_children(&self, children: Vec<Node>) -> Node {
        Node {
            data: Rc::new(NodeData {
                kind: self.data.kind.clone(),
                field: self.data.field.clone(),
                content: Content::Internal(children),
            }),
        }
    }

    /// Return a leaf with the same kind, field, and leading trivia but a new
    /// token. Identity-preserving when the token is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the node is internal.
    pub fn with_token(&self, new_token: &str) -> Node {
        let (leading, token) = match &self.data.content {
            Content::Leaf { leading, token } => (leading, token),
            Content::Internal(_) => panic!("with_token on internal node '{}'", self.kind()),
        };
        if &**token == new_token {
            return self.clone();
        }
        Node {
            data: Rc::new(NodeData {
                kind: self.data.kind.clone(),
                field: self.data.field.clone(),
                content: Content::Leaf {
                    leading: leading.clone(),
                    token: new_token.into(),
                },
            }),
        }
    }

    /// Follow a child-index path down from this node.
    pub fn descendant(&self, path: &[usize]) -> Option<&Node> {
        let mut cur = self;
        for &index in path {
            cur = cur.child(index)?;
        }
        Some(cur)
    }

    /// Return a new tree with the node at `path` replaced, rebuilding only
    /// the spine from here down to the replacement.
    ///
    /// # Panics
    ///
    /// Panics if the path does not resolve (same conditions as
    /// [`Node::replace_child`]).
    pub fn replace_descendant(&self, path: &[usize], replacement: Node) -> Node {
        match path.split_first() {
            None => replacement,
            Some((&index, rest)) => {
                let child = self
                    .child(index)
                    .unwrap_or_else(|| {
                        panic!("path index {index} out of bounds for '{}'", self.kind())
                    })
                    .clone();
                let new_child = child.replace_descendant(rest, replacement);
                self.replace_child(index, new_child)
            }
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data.content {
            Content::Leaf { token, .. } => {
                write!(f, "({} {:?})", self.kind(), token)
            }
            Content::Internal(children) => {
                write!(f, "({}", self.kind())?;
                for child in children {
                    write!(f, " {child:?}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(leading: &str, token: &str) -> Node {
        Node::leaf("identifier", Some("name"), leading, token)
    }

    fn sample_decl() -> Node {
        Node::internal(
            "method_declaration",
            None,
            vec![
                Node::leaf("void", None, "", "void"),
                ident(" ", "OldCompute"),
                Node::leaf("(", None, "", "("),
                Node::leaf(")", None, "", ")"),
                Node::leaf("{", None, " ", "{"),
                Node::leaf("}", None, "", "}"),
            ],
        )
    }

    #[test]
    fn render_concatenates_leaves() {
        assert_eq!(sample_decl().render(), "void OldCompute() {}");
    }

    #[test]
    fn clone_preserves_identity() {
        let node = sample_decl();
        let copy = node.clone();
        assert!(Node::same(&node, &copy));
    }

    #[test]
    fn replace_child_shares_siblings() {
        let old = sample_decl();
        let new = old.replace_child(1, ident(" ", "NewCompute"));

        assert!(!Node::same(&old, &new));
        // Untouched siblings are the same allocations
        for i in [0, 2, 3, 4, 5] {
            assert!(Node::same(old.child(i).unwrap(), new.child(i).unwrap()));
        }
        // Original is untouched
        assert_eq!(old.render(), "void OldCompute() {}");
        assert_eq!(new.render(), "void NewCompute() {}");
    }

    #[test]
    fn replace_child_with_same_node_is_identity() {
        let node = sample_decl();
        let child = node.child(1).unwrap().clone();
        let replaced = node.replace_child(1, child);
        assert!(Node::same(&node, &replaced));
    }

    #[test]
    fn with_token_keeps_leading_trivia() {
        let leaf = ident("  \n", "OldCompute");
        let renamed = leaf.with_token("NewCompute");
        assert_eq!(renamed.leading(), Some("  \n"));
        assert_eq!(renamed.token(), Some("NewCompute"));
        assert_eq!(renamed.render(), "  \nNewCompute");
    }

    #[test]
    fn with_token_unchanged_is_identity() {
        let leaf = ident(" ", "Compute");
        let same = leaf.with_token("Compute");
        assert!(Node::same(&leaf, &same));
    }

    #[test]
    fn child_by_field_finds_name() {
        let node = sample_decl();
        let (index, child) = node.child_by_field("name").unwrap();
        assert_eq!(index, 1);
        assert_eq!(child.token(), Some("OldCompute"));
    }

    #[test]
    fn replace_descendant_rebuilds_spine_only() {
        let inner = sample_decl();
        let root = Node::internal("compilation_unit", None, vec![inner.clone(), sample_decl()]);

        let path = [0usize, 1];
        let target = root.descendant(&path).unwrap().clone();
        let new_root = root.replace_descendant(&path, target.with_token("NewCompute"));

        assert!(!Node::same(&root, &new_root));
        // Sibling subtree outside the spine is shared
        assert!(Node::same(root.child(1).unwrap(), new_root.child(1).unwrap()));
        assert_eq!(
            new_root.render(),
            "void NewCompute() {}void OldCompute() {}"
        );
    }
}
