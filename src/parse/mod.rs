//! Parser front-end: raw source text to persistent trees.

mod errors;
mod parser;

pub use errors::ParseError;
pub use parser::SourceParser;
