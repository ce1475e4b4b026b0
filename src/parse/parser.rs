use crate::parse::errors::ParseError;
use crate::tree::{tree_to_node, Node};
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::Parser;

/// Tree-sitter parser wrapper producing persistent [`Node`] trees.
///
/// Parsing is strict: a tree containing ERROR or MISSING nodes is rejected
/// with [`ParseError::Syntax`] rather than handed to the rewrite stage, so a
/// malformed document is isolated instead of being half-transformed.
pub struct SourceParser {
    parser: Parser,
    lang: SupportLang,
}

impl SourceParser {
    /// Create a parser for the given language.
    pub fn new(lang: SupportLang) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        // Get the tree-sitter Language from ast-grep-language
        let ts_lang = lang.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| ParseError::LanguageSet)?;

        Ok(Self { parser, lang })
    }

    /// Get the configured language.
    pub fn lang(&self) -> SupportLang {
        self.lang
    }

    /// Parse source text into a persistent root node.
    ///
    /// Round-trip fidelity holds for every accepted input:
    /// `parse(text)?.render() == text`.
    pub fn parse(&mut self, source: &str) -> Result<Node, ParseError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed)?;

        if let Some((byte_start, byte_end)) = first_error_span(tree.root_node()) {
            return Err(ParseError::Syntax {
                byte_start,
                byte_end,
            });
        }

        Ok(tree_to_node(&tree, source))
    }
}

fn first_error_span(node: tree_sitter::Node<'_>) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        return Some((node.start_byte(), node.end_byte()));
    }

    // Cheap subtree check before descending
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(span) = first_error_span(child) {
            return Some(span);
        }
    }

    None
}
