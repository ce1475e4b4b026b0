//! Thread-local parser pooling for performance optimization.
//!
//! Eliminates redundant parser creation by maintaining a thread-local pool
//! of reusable parsers, one per language. Creates a new parser on first use
//! per (thread, language) pair, reuses it for subsequent operations.

use crate::lang::SupportLang;
use crate::parse::{ParseError, SourceParser};
use crate::tree::Node;
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    // Keyed by the language's Debug form so the pool never collides across
    // languages without requiring Hash on SupportLang.
    static PARSERS: RefCell<HashMap<String, SourceParser>> =
        RefCell::new(HashMap::new());
}

/// Execute a function with a pooled parser for the given language.
///
/// On first call per thread and language, creates a new parser. Subsequent
/// calls reuse the same instance, avoiding grammar setup overhead.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use treewright::lang::SupportLang;
/// use treewright::pool::with_parser;
///
/// let root = with_parser(SupportLang::Rust, |parser| {
///     parser.parse("fn main() {}")
/// })??;
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(lang: SupportLang, f: F) -> Result<R, ParseError>
where
    F: FnOnce(&mut SourceParser) -> R,
{
    let key = format!("{lang:?}");
    PARSERS.with(|cell| {
        let mut pool = cell.borrow_mut();
        if !pool.contains_key(&key) {
            pool.insert(key.clone(), SourceParser::new(lang)?);
        }
        let parser = pool
            .get_mut(&key)
            .expect("parser was just inserted above");
        Ok(f(parser))
    })
}

/// Parse source text with a pooled parser.
pub fn parse(lang: SupportLang, source: &str) -> Result<Node, ParseError> {
    with_parser(lang, |parser| parser.parse(source))?
}
