//! Conversion from a tree-sitter parse tree into the persistent [`Node`]
//! model.
//!
//! tree-sitter tokens do not cover the whitespace and comments between them.
//! The converter tracks a running byte offset through the source and attaches
//! each inter-token gap to the following leaf as leading trivia, so the
//! resulting tree renders back to the original text byte-for-byte.

use crate::tree::Node;
use tree_sitter::{Tree, TreeCursor};

/// Synthetic leaf kind used for text the grammar assigns to no token
/// (trailing trivia at end of file, gaps inside zero-width nodes).
pub const TRIVIA_KIND: &str = "trivia";

/// Build a persistent [`Node`] tree from a tree-sitter tree and its source.
///
/// The returned root is always an internal node whose leaves concatenate to
/// exactly `source`.
pub fn tree_to_node(tree: &Tree, source: &str) -> Node {
    let mut cursor = tree.walk();
    let mut offset = 0usize;
    let root = build(&mut cursor, source, &mut offset);

    // The root must be internal so trailing trivia has somewhere to live
    // (and so the structural-completeness invariant holds at the top).
    let mut children = if root.is_leaf() {
        vec![root.clone()]
    } else {
        root.children().to_vec()
    };

    if offset < source.len() {
        children.push(Node::leaf(TRIVIA_KIND, None, &source[offset..], ""));
    }

    Node::internal(root.kind(), None, children)
}

fn build(cursor: &mut TreeCursor<'_>, source: &str, offset: &mut usize) -> Node {
    let ts_node = cursor.node();
    let kind = ts_node.kind();
    let field = cursor.field_name();

    if cursor.goto_first_child() {
        let mut children = Vec::new();
        loop {
            children.push(build(cursor, source, offset));
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();

        // Text claimed by this node but by none of its tokens (zero-width
        // MISSING children leave gaps). Keep it so rendering stays exact.
        let end = ts_node.end_byte();
        if *offset < end {
            children.push(Node::leaf(TRIVIA_KIND, None, &source[*offset..end], ""));
            *offset = end;
        }

        Node::internal(kind, field, children)
    } else {
        // Zero-width nodes can report a start before the running offset.
        let start = ts_node.start_byte().max(*offset);
        let end = ts_node.end_byte().max(start);
        let leading = &source[*offset..start];
        let token = &source[start..end];
        *offset = end;
        Node::leaf(kind, field, leading, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast_grep_language::{LanguageExt, SupportLang};
    use tree_sitter::Parser;

    fn parse_rust(source: &str) -> Node {
        let mut parser = Parser::new();
        parser
            .set_language(&SupportLang::Rust.get_ts_language())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();
        tree_to_node(&tree, source)
    }

    #[test]
    fn round_trips_simple_source() {
        let source = "fn main() { println!(\"hello\"); }\n";
        assert_eq!(parse_rust(source).render(), source);
    }

    #[test]
    fn round_trips_comments_and_odd_whitespace() {
        let source = "// header\n\nfn  main( )\t{\n    // body\n}\n\n\n";
        assert_eq!(parse_rust(source).render(), source);
    }

    #[test]
    fn round_trips_whitespace_only_source() {
        let source = "  \n\t\n";
        assert_eq!(parse_rust(source).render(), source);
    }

    #[test]
    fn round_trips_empty_source() {
        assert_eq!(parse_rust("").render(), "");
    }

    #[test]
    fn preserves_field_names() {
        let root = parse_rust("fn compute() {}");
        let item = root
            .children()
            .iter()
            .find(|c| c.kind() == "function_item")
            .unwrap();
        let (_, name) = item.child_by_field("name").unwrap();
        assert_eq!(name.token(), Some("compute"));
    }

    #[test]
    fn leading_trivia_attaches_to_following_leaf() {
        let root = parse_rust("fn a() {}\n\n// gap\nfn b() {}");
        let second = root
            .children()
            .iter()
            .filter(|c| c.kind() == "function_item")
            .nth(1)
            .unwrap();
        let fn_keyword = &second.children()[0];
        assert_eq!(fn_keyword.leading(), Some("\n\n// gap\n"));
    }
}
