//! Query construction and rendering.
//!
//! Queries are assembled as a [`QueryTree`] of selections, either directly or
//! through the schema-aware [`QueryBuilder`], and rendered to GraphQL text
//! with a sorted variable header.
//!
//! # Overview
//!
//! - [`QueryBuilder`]: fluent, schema-resolved selection cursor
//! - [`QueryTree`], [`NodeId`], [`Node`], [`NodeKind`], [`Child`]: the arena tree
//! - [`ArgumentValue`]: argument values and their literal syntax
//! - [`VariableTypes`]: `(field, argument)` to declared variable type
//!
//! # Rendering rules
//!
//! - Entering the same field twice with the same kind reuses the node and
//!   merges arguments
//! - Typed nodes with nothing selected beneath them are omitted
//! - Only variables bound directly on the root's immediate children are
//!   declared in the header; unregistered pairs declare `String!`
//!
//! # Example
//!
//! ```rust
//! use rcsb_query::query::{NodeId, QueryTree, VariableTypes};
//!
//! let mut tree = QueryTree::new();
//! let entries = tree.enter(NodeId::ROOT, "entries", [("entry_ids", "$ids")]);
//! tree.add_token(entries, "rcsb_id");
//!
//! let text = tree.render(entries, "batch", &VariableTypes::default());
//! assert!(text.starts_with("query batch($ids: [String!]!) {"));
//! ```

mod argument;
mod builder;
mod render;
mod tree;
mod variables;

pub use argument::ArgumentValue;
pub use builder::QueryBuilder;
pub use tree::{Child, Node, NodeId, NodeKind, QueryTree};
pub use variables::{VariableTypes, DEFAULT_VARIABLE_TYPE};
