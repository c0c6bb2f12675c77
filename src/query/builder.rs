//! Schema-aware fluent query builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::{GraphqlClient, GraphqlError};
use crate::query::argument::ArgumentValue;
use crate::query::tree::{NodeId, QueryTree};
use crate::query::variables::VariableTypes;
use crate::schema::{FieldDef, FieldTarget, SchemaIndex, SchemaLookupError};

/// A cursor over a [`QueryTree`] whose field accesses are resolved against a
/// [`SchemaIndex`].
///
/// Selecting a scalar or enum field adds it to the current node and keeps the
/// cursor in place. Selecting an object field enters a child node typed with
/// the field's target type and moves the cursor into it. [`end`](Self::end)
/// moves the cursor back up.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use rcsb_query::{QueryBuilder, SchemaIndex};
///
/// let schema = Arc::new(SchemaIndex::from_path("data_api_schema.json")?);
///
/// let query = QueryBuilder::new(schema)
///     .field_with("entry", [("entry_id", "4HHB")])?
///     .field("rcsb_id")?
///     .field("rcsb_entry_info")?
///     .field("deposited_atom_count")?
///     .end()
///     .render("structure");
/// ```
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    schema: Arc<SchemaIndex>,
    variable_types: Arc<VariableTypes>,
    tree: QueryTree,
    cursor: NodeId,
}

// Verify QueryBuilder is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<QueryBuilder>();
};

impl QueryBuilder {
    /// Creates a builder positioned at the schema's query root.
    #[must_use]
    pub fn new(schema: Arc<SchemaIndex>) -> Self {
        let tree = QueryTree::with_root_type(schema.query_type());
        Self {
            schema,
            variable_types: Arc::new(VariableTypes::default()),
            tree,
            cursor: NodeId::ROOT,
        }
    }

    /// Replaces the variable type table used when rendering.
    #[must_use]
    pub fn with_variable_types(mut self, types: VariableTypes) -> Self {
        self.variable_types = Arc::new(types);
        self
    }

    /// Selects a field on the current node.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaLookupError`] if the current type has no such field.
    pub fn field(self, name: &str) -> Result<Self, SchemaLookupError> {
        self.field_with(name, std::iter::empty::<(String, ArgumentValue)>())
    }

    /// Selects a field on the current node with arguments.
    ///
    /// A scalar or enum field becomes a leaf node and the cursor stays on the
    /// current node. Selecting the same leaf again merges its arguments.
    ///
    /// # Errors
    ///
    /// - [`SchemaLookupError::UnknownField`] if the current type has no such field
    /// - [`SchemaLookupError::UntypedNode`] if the cursor carries no schema type
    pub fn field_with<I, K, V>(mut self, name: &str, args: I) -> Result<Self, SchemaLookupError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ArgumentValue>,
    {
        let schema = Arc::clone(&self.schema);
        let type_name = self
            .current_type()
            .ok_or_else(|| SchemaLookupError::UntypedNode {
                field_name: name.to_string(),
            })?
            .to_string();
        let resolved = schema.get_field(&type_name, name)?;

        match resolved.target {
            FieldTarget::Leaf { .. } => {
                self.tree.enter(self.cursor, name, args);
            }
            FieldTarget::Composite { type_name } => {
                self.cursor = self.tree.enter_typed(self.cursor, name, type_name, args);
            }
        }
        Ok(self)
    }

    /// Merges arguments into the current node (last write wins per key).
    #[must_use]
    pub fn args<I, K, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ArgumentValue>,
    {
        self.tree.merge_arguments(self.cursor, args);
        self
    }

    /// Moves the cursor to the parent node. A no-op at the root.
    #[must_use]
    pub fn end(mut self) -> Self {
        self.cursor = self.tree.end(self.cursor);
        self
    }

    /// Returns the schema type of the current node.
    #[must_use]
    pub fn current_type(&self) -> Option<&str> {
        self.tree.node(self.cursor).schema_type()
    }

    /// Lists the fields selectable on the current node.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaLookupError`] if the cursor carries no schema type.
    pub fn list_fields(&self) -> Result<Vec<&FieldDef>, SchemaLookupError> {
        let type_name = self
            .current_type()
            .ok_or_else(|| SchemaLookupError::UntypedNode {
                field_name: String::new(),
            })?;
        self.schema.list_fields(type_name)
    }

    /// Deep-copies the subtree at the cursor into an independent builder.
    ///
    /// The copy's cursor is on the copied node.
    #[must_use]
    pub fn clone_subtree(&self) -> Self {
        let (tree, cursor) = self.tree.clone_subtree(self.cursor);
        Self {
            schema: Arc::clone(&self.schema),
            variable_types: Arc::clone(&self.variable_types),
            tree,
            cursor,
        }
    }

    #[must_use]
    pub const fn cursor(&self) -> NodeId {
        self.cursor
    }

    #[must_use]
    pub const fn tree(&self) -> &QueryTree {
        &self.tree
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<SchemaIndex> {
        &self.schema
    }

    #[must_use]
    pub fn variable_types(&self) -> &VariableTypes {
        &self.variable_types
    }

    /// Renders the whole tree as a named query document.
    #[must_use]
    pub fn render(&self, query_name: &str) -> String {
        self.tree
            .render(self.cursor, query_name, &self.variable_types)
    }

    /// Returns the variable declarations the rendered header would carry.
    #[must_use]
    pub fn variables(&self) -> BTreeMap<String, String> {
        self.tree.variables(self.cursor, &self.variable_types)
    }

    /// Renders the tree and executes it.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphqlError`] if the request fails or the response
    /// carries errors.
    pub async fn submit(
        &self,
        client: &GraphqlClient,
        query_name: &str,
        variables: Option<Value>,
    ) -> Result<Map<String, Value>, GraphqlError> {
        let query = self.render(query_name);
        client.execute(&query, variables).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> QueryBuilder {
        QueryBuilder::new(Arc::new(crate::schema::fixture()))
    }

    // === Resolution ===

    #[test]
    fn test_scalar_field_keeps_cursor() {
        let query = builder()
            .field_with("entry", [("entry_id", "4HHB")])
            .unwrap();
        let cursor = query.cursor();
        let query = query.field("rcsb_id").unwrap();

        assert_eq!(query.cursor(), cursor);
        assert_eq!(query.current_type(), Some("CoreEntry"));
    }

    #[test]
    fn test_object_field_moves_cursor_to_typed_child() {
        let query = builder()
            .field("entry")
            .unwrap()
            .field("rcsb_entry_info")
            .unwrap();
        assert_eq!(query.current_type(), Some("RcsbEntryInfo"));

        let query = query.end();
        assert_eq!(query.current_type(), Some("CoreEntry"));
        let query = query.end().end();
        assert_eq!(query.current_type(), Some("Query"));
        assert_eq!(query.cursor(), NodeId::ROOT);
    }

    #[test]
    fn test_unknown_field_reports_type_and_field() {
        let error = builder()
            .field("entry")
            .unwrap()
            .field("nonexistent")
            .unwrap_err();

        assert_eq!(
            error,
            SchemaLookupError::UnknownField {
                type_name: "CoreEntry".to_string(),
                field_name: "nonexistent".to_string(),
            }
        );
    }

    #[test]
    fn test_list_fields_for_current_type() {
        let query = builder().field("entry").unwrap().field("struct").unwrap();
        let names: Vec<&str> = query
            .list_fields()
            .unwrap()
            .into_iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["title", "pdbx_descriptor"]);
    }

    // === Rendering ===

    #[test]
    fn test_render_entry_structure() {
        let text = builder()
            .field("entry")
            .unwrap()
            .args([("entry_id", "4HHB")])
            .field("rcsb_id")
            .unwrap()
            .render("structure");

        assert_eq!(
            text,
            "query structure {\n  entry(entry_id: \"4HHB\") {\n    rcsb_id\n  }\n}"
        );
    }

    #[test]
    fn test_repeated_access_is_idempotent() {
        let query = builder()
            .field_with("entry", [("entry_id", "1ABC")])
            .unwrap()
            .field("rcsb_id")
            .unwrap()
            .end()
            .field_with("entry", [("entry_id", "4HHB")])
            .unwrap()
            .field("rcsb_id")
            .unwrap();

        assert_eq!(
            query.render("q"),
            "query q {\n  entry(entry_id: \"4HHB\") {\n    rcsb_id\n  }\n}"
        );
    }

    #[test]
    fn test_leaf_selected_with_and_without_arguments_renders_once() {
        let text = builder()
            .field_with("entry", [("entry_id", "4HHB")])
            .unwrap()
            .field("rcsb_id")
            .unwrap()
            .field_with("rcsb_id", [("format", ArgumentValue::enum_value("SHORT"))])
            .unwrap()
            .field("rcsb_id")
            .unwrap()
            .render("q");

        assert_eq!(
            text,
            "query q {\n  entry(entry_id: \"4HHB\") {\n    rcsb_id(format: SHORT)\n  }\n}"
        );
    }

    #[test]
    fn test_untouched_object_field_is_pruned() {
        let text = builder()
            .field("entry")
            .unwrap()
            .field("rcsb_id")
            .unwrap()
            .field("struct")
            .unwrap()
            .render("q");

        assert!(!text.contains("struct"));
    }

    #[test]
    fn test_variables_from_bound_root_field() {
        let query = builder()
            .field_with("entries", [("entry_ids", "$ids")])
            .unwrap()
            .field("rcsb_id")
            .unwrap();

        assert_eq!(query.variables()["ids"], "[String!]!");
        assert!(query.render("batch").starts_with("query batch($ids: [String!]!) {"));
    }

    // === Copies ===

    #[test]
    fn test_clone_subtree_is_independent() {
        let original = builder()
            .field_with("entry", [("entry_id", "4HHB")])
            .unwrap()
            .field("rcsb_id")
            .unwrap();
        let before = original.render("q");

        let copy = original
            .clone_subtree()
            .args([("entry_id", "1TUP")])
            .field("struct")
            .unwrap()
            .field("title")
            .unwrap();

        assert_eq!(original.render("q"), before);
        let copied = copy.render("q");
        assert!(copied.contains("entry(entry_id: \"1TUP\")"));
        assert!(copied.contains("title"));
    }
}
