//! Schema index for dynamic, schema-driven field resolution.
//!
//! A [`SchemaIndex`] is built once from a GraphQL introspection document and
//! passed explicitly to the builders that need it. It indexes types by name,
//! resolves `(type, field)` pairs to their unwrapped target type, and lists
//! fields for discovery.
//!
//! # Overview
//!
//! - [`SchemaIndex`]: the immutable index
//! - [`FieldTarget`]: leaf vs. composite target of a resolved field
//! - [`TypeDef`], [`FieldDef`], [`InputValue`], [`TypeRef`], [`TypeKind`]: introspection model
//! - [`SchemaError`], [`SchemaLookupError`]: loading and lookup failures
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rcsb_query::schema::SchemaIndex;
//!
//! let schema = Arc::new(SchemaIndex::from_path("data_api_schema.json")?);
//!
//! for field in schema.list_fields("CoreEntry")? {
//!     println!("{}: {}", field.name, field.type_ref.to_type_string());
//! }
//! ```

mod errors;
mod index;
mod types;

pub use errors::{SchemaError, SchemaLookupError};
pub use index::{FieldTarget, ResolvedField, SchemaIndex};
pub use types::{FieldDef, InputValue, TypeDef, TypeKind, TypeRef};

#[cfg(test)]
pub(crate) fn fixture() -> SchemaIndex {
    SchemaIndex::from_json_str(include_str!("../../tests/fixtures/data_api_schema.json"))
        .expect("fixture schema must parse")
}
