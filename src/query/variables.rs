//! Variable declarations for the rendered query header.

use std::collections::{BTreeMap, HashMap};

use crate::query::tree::{Child, Node, NodeId, QueryTree};
use crate::schema::SchemaIndex;

/// Type declared for a variable whose `(field, argument)` pair is not
/// registered.
pub const DEFAULT_VARIABLE_TYPE: &str = "String!";

/// Argument types of the Data API's query root, keyed by
/// `(field, argument)`.
const KNOWN_ARGUMENT_TYPES: &[(&str, &str, &str)] = &[
    ("entry", "entry_id", "String!"),
    ("entries", "entry_ids", "[String!]!"),
    ("polymer_entity", "entry_id", "String!"),
    ("polymer_entity", "entity_id", "String!"),
    ("polymer_entities", "entity_ids", "[String!]!"),
    ("branched_entity", "entry_id", "String!"),
    ("branched_entity", "entity_id", "String!"),
    ("branched_entities", "entity_ids", "[String!]!"),
    ("nonpolymer_entity", "entry_id", "String!"),
    ("nonpolymer_entity", "entity_id", "String!"),
    ("nonpolymer_entities", "entity_ids", "[String!]!"),
    ("polymer_entity_instance", "entry_id", "String!"),
    ("polymer_entity_instance", "asym_id", "String!"),
    ("polymer_entity_instances", "instance_ids", "[String]!"),
    ("branched_entity_instance", "entry_id", "String!"),
    ("branched_entity_instance", "asym_id", "String!"),
    ("branched_entity_instances", "instance_ids", "[String]!"),
    ("nonpolymer_entity_instance", "entry_id", "String!"),
    ("nonpolymer_entity_instance", "asym_id", "String!"),
    ("nonpolymer_entity_instances", "instance_ids", "[String]!"),
    ("assembly", "entry_id", "String!"),
    ("assembly", "assembly_id", "String!"),
    ("assemblies", "assembly_ids", "[String]!"),
    ("interface", "entry_id", "String!"),
    ("interface", "assembly_id", "String!"),
    ("interface", "interface_id", "String!"),
    ("interfaces", "interface_ids", "[String]!"),
    ("chem_comp", "comp_id", "String!"),
    ("chem_comps", "comp_ids", "[String]!"),
    ("entry_group", "group_id", "String!"),
    ("entry_groups", "group_ids", "[String]!"),
    ("polymer_entity_group", "group_id", "String!"),
    ("polymer_entity_groups", "group_ids", "[String]!"),
    ("group_provenance", "group_provenance_id", "String!"),
    ("uniprot", "uniprot_id", "String!"),
    ("pubmed", "pubmed_id", "Int!"),
];

/// Lookup table from `(field, argument)` to a declared GraphQL type.
///
/// The default table covers the Data API's query root. Unregistered pairs
/// declare [`DEFAULT_VARIABLE_TYPE`].
///
/// # Example
///
/// ```rust
/// use rcsb_query::query::VariableTypes;
///
/// let mut types = VariableTypes::default();
/// assert_eq!(types.get("entries", "entry_ids"), "[String!]!");
/// assert_eq!(types.get("entries", "unknown"), "String!");
///
/// types.insert("entries", "unknown", "Int");
/// assert_eq!(types.get("entries", "unknown"), "Int");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableTypes {
    types: HashMap<String, HashMap<String, String>>,
}

impl Default for VariableTypes {
    fn default() -> Self {
        let mut types = Self::empty();
        for &(field, argument, type_string) in KNOWN_ARGUMENT_TYPES {
            types.insert(field, argument, type_string);
        }
        types
    }
}

impl VariableTypes {
    /// Creates a table with no registered pairs.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Creates the default table extended with every argument declared on
    /// the schema's query root. Schema types take precedence.
    #[must_use]
    pub fn from_schema(schema: &SchemaIndex) -> Self {
        let mut types = Self::default();
        if let Ok(fields) = schema.list_fields(schema.query_type()) {
            for field in fields {
                for argument in &field.args {
                    types.insert(
                        &field.name,
                        &argument.name,
                        argument.type_ref.to_type_string(),
                    );
                }
            }
        }
        types
    }

    /// Registers (or replaces) the type for a `(field, argument)` pair.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        argument: impl Into<String>,
        type_string: impl Into<String>,
    ) {
        self.types
            .entry(field.into())
            .or_default()
            .insert(argument.into(), type_string.into());
    }

    /// Returns the declared type for a pair, or [`DEFAULT_VARIABLE_TYPE`].
    #[must_use]
    pub fn get(&self, field: &str, argument: &str) -> &str {
        self.types
            .get(field)
            .and_then(|arguments| arguments.get(argument))
            .map_or(DEFAULT_VARIABLE_TYPE, String::as_str)
    }

    /// Returns the number of registered pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Node {
    /// Returns `(argument, variable)` pairs for arguments bound directly to
    /// a variable, in argument order.
    #[must_use]
    pub fn bound_variables(&self) -> Vec<(&str, &str)> {
        self.arguments()
            .iter()
            .filter_map(|(argument, value)| {
                value
                    .as_variable()
                    .map(|variable| (argument.as_str(), variable))
            })
            .collect()
    }
}

impl QueryTree {
    /// Collects the variable declarations of the tree containing `from`.
    ///
    /// Only arguments of the root's immediate child nodes are scanned, and
    /// only values that are themselves variable references. Children that
    /// render empty are skipped, so every declaration is used in the body.
    /// Declarations are deduplicated by name (first binding wins) and
    /// sorted by name.
    #[must_use]
    pub fn variables(&self, from: NodeId, types: &VariableTypes) -> BTreeMap<String, String> {
        let root = self.root_of(from);
        let mut declarations = BTreeMap::new();

        for child in self.node(root).children() {
            let Child::Node(id) = child else { continue };
            if !self.has_selection(*id) {
                continue;
            }
            let node = self.node(*id);
            let field = node.name().unwrap_or_default();

            for (argument, variable) in node.bound_variables() {
                declarations
                    .entry(variable.to_string())
                    .or_insert_with(|| types.get(field, argument).to_string());
            }
        }

        declarations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::argument::ArgumentValue;

    // === VariableTypes ===

    #[test]
    fn test_default_table_and_fallback() {
        let types = VariableTypes::default();
        assert_eq!(types.get("entry", "entry_id"), "String!");
        assert_eq!(types.get("polymer_entities", "entity_ids"), "[String!]!");
        assert_eq!(types.get("pubmed", "pubmed_id"), "Int!");
        assert_eq!(types.get("made_up", "field"), DEFAULT_VARIABLE_TYPE);
        assert!(VariableTypes::empty().is_empty());
    }

    #[test]
    fn test_from_schema_uses_declared_argument_types() {
        let schema = crate::schema::fixture();
        let types = VariableTypes::from_schema(&schema);

        assert_eq!(types.get("chem_comps", "comp_ids"), "[String]!");
        assert_eq!(types.get("polymer_entity", "entity_id"), "String!");
        assert!(types.len() >= VariableTypes::default().len());
    }

    // === Collection ===

    #[test]
    fn test_variables_sorted_and_deduplicated() {
        let mut tree = QueryTree::new();
        tree.enter(
            NodeId::ROOT,
            "polymer_entity",
            [("entry_id", "$entry"), ("entity_id", "$entity")],
        );
        tree.enter(NodeId::ROOT, "entry", [("entry_id", "$entry")]);

        let variables = tree.variables(NodeId::ROOT, &VariableTypes::default());
        assert_eq!(
            variables.into_iter().collect::<Vec<_>>(),
            vec![
                ("entity".to_string(), "String!".to_string()),
                ("entry".to_string(), "String!".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_bindings_are_not_hoisted() {
        let mut tree = QueryTree::new();
        let entries = tree.enter(NodeId::ROOT, "entries", [("entry_ids", "$ids")]);
        tree.enter(entries, "polymer_entities", [("filter", "$deep")]);

        let variables = tree.variables(entries, &VariableTypes::default());
        assert_eq!(variables.len(), 1);
        assert_eq!(variables["ids"], "[String!]!");
    }

    #[test]
    fn test_bindings_on_empty_selections_are_not_declared() {
        let mut tree = QueryTree::with_root_type("Query");
        tree.enter_typed(NodeId::ROOT, "entries", "CoreEntry", [("entry_ids", "$ids")]);
        let entry = tree.enter_typed(NodeId::ROOT, "entry", "CoreEntry", [("entry_id", "$id")]);
        tree.add_token(entry, "rcsb_id");

        let variables = tree.variables(NodeId::ROOT, &VariableTypes::default());
        assert_eq!(variables.keys().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_variables_inside_composite_values_are_not_declared() {
        let mut tree = QueryTree::new();
        tree.enter(
            NodeId::ROOT,
            "entries",
            [("entry_ids", ArgumentValue::from(vec!["$inner"]))],
        );

        assert!(tree
            .variables(NodeId::ROOT, &VariableTypes::default())
            .is_empty());
    }

    #[test]
    fn test_bound_variables_in_argument_order() {
        let mut tree = QueryTree::new();
        let id = tree.enter(
            NodeId::ROOT,
            "polymer_entity",
            [("entry_id", "$e"), ("literal", "x"), ("entity_id", "$n")],
        );
        assert_eq!(
            tree.node(id).bound_variables(),
            vec![("entry_id", "e"), ("entity_id", "n")]
        );
    }
}
