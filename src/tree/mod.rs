//! Persistent, structurally-shared syntax tree model.

mod convert;
mod node;

pub use convert::{tree_to_node, TRIVIA_KIND};
pub use node::Node;
