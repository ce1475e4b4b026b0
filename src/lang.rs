//! Language registry: file-extension detection and declaration-kind tables.
//!
//! We use the built-in `SupportLang` grammars from ast-grep-language instead
//! of maintaining our own tree-sitter Language bindings. The engine itself is
//! grammar-agnostic; everything language-specific lives in this module's
//! tables.

use std::path::Path;

pub use ast_grep_language::SupportLang;

/// Node kinds that declare a name, across the supported grammars.
///
/// Kind names are distinct enough across tree-sitter grammars that a single
/// union table works: "method_declaration" means the same thing in C# and Go,
/// "function_definition" in C and Python, and so on. Rename rules default to
/// this set; callers can narrow it per rule.
pub const DECLARATION_KINDS: &[&str] = &[
    // Rust
    "function_item",
    "struct_item",
    "enum_item",
    "trait_item",
    // C# (local_function_statement also covers C# 9 top-level functions)
    "method_declaration",
    "local_function_statement",
    "class_declaration",
    "struct_declaration",
    "interface_declaration",
    "enum_declaration",
    // C / Python
    "function_definition",
    "class_definition",
    // JavaScript / Go
    "function_declaration",
];

/// Map a file extension to its language.
pub fn extension_language(ext: &str) -> Option<SupportLang> {
    match ext {
        "rs" => Some(SupportLang::Rust),
        "cs" => Some(SupportLang::CSharp),
        "c" | "h" => Some(SupportLang::C),
        "js" | "mjs" => Some(SupportLang::JavaScript),
        "py" => Some(SupportLang::Python),
        "go" => Some(SupportLang::Go),
        _ => None,
    }
}

/// Detect the language of a source file from its path.
pub fn detect(path: &Path) -> Option<SupportLang> {
    let ext = path.extension()?.to_str()?;
    extension_language(ext)
}
