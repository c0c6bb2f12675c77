//! The loaded, immutable schema index.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::schema::errors::{SchemaError, SchemaLookupError};
use crate::schema::types::{FieldDef, TypeDef, TypeKind};

/// The resolved target of a field: a leaf selected by name, or a composite
/// type that needs its own sub-selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldTarget<'a> {
    /// A `SCALAR` or `ENUM` target.
    Leaf {
        /// Unwrapped target type name.
        type_name: &'a str,
    },
    /// An `OBJECT`, `INTERFACE` or `UNION` target.
    Composite {
        /// Unwrapped target type name.
        type_name: &'a str,
    },
}

impl<'a> FieldTarget<'a> {
    /// Returns the unwrapped target type name.
    #[must_use]
    pub const fn type_name(&self) -> &'a str {
        match *self {
            Self::Leaf { type_name } | Self::Composite { type_name } => type_name,
        }
    }

    /// Returns `true` if the target is selected without a sub-selection.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}

/// A field resolved against the schema.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedField<'a> {
    /// The field definition.
    pub field: &'a FieldDef,
    /// The field's unwrapped target.
    pub target: FieldTarget<'a>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Response { data: SchemaEnvelope },
    Bare(SchemaEnvelope),
}

#[derive(Deserialize)]
struct SchemaEnvelope {
    #[serde(rename = "__schema")]
    schema: RawSchema,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    #[serde(default)]
    query_type: Option<NamedType>,
    types: Vec<TypeDef>,
}

#[derive(Deserialize)]
struct NamedType {
    name: String,
}

/// An in-memory index over a GraphQL introspection document.
///
/// The index is immutable after construction. Share it between builders and
/// tasks behind an [`Arc`](std::sync::Arc); concurrent reads need no locking.
///
/// # Example
///
/// ```rust
/// use rcsb_query::schema::SchemaIndex;
///
/// let schema = SchemaIndex::from_json_str(r#"{"__schema": {
///     "queryType": {"name": "Query"},
///     "types": [
///         {"kind": "OBJECT", "name": "Query", "fields": [
///             {"name": "entry", "args": [], "type": {"kind": "OBJECT", "name": "CoreEntry"}}
///         ]},
///         {"kind": "OBJECT", "name": "CoreEntry", "fields": [
///             {"name": "rcsb_id", "args": [], "type": {"kind": "SCALAR", "name": "String"}}
///         ]},
///         {"kind": "SCALAR", "name": "String", "fields": null}
///     ]
/// }}"#).unwrap();
///
/// let resolved = schema.get_field("Query", "entry").unwrap();
/// assert_eq!(resolved.target.type_name(), "CoreEntry");
/// assert!(schema.get_field("CoreEntry", "rcsb_id").unwrap().target.is_leaf());
/// ```
#[derive(Clone, Debug)]
pub struct SchemaIndex {
    query_type: String,
    types: HashMap<String, TypeDef>,
}

// Verify SchemaIndex is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SchemaIndex>();
};

impl SchemaIndex {
    /// Parses an introspection document from a JSON string.
    ///
    /// Both the raw response form (`{"data": {"__schema": ...}}`) and the
    /// bare form (`{"__schema": ...}`) are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] for malformed documents and
    /// [`SchemaError::MissingQueryType`] when no query root can be found.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Self::from_envelope(serde_json::from_str(json)?)
    }

    /// Parses an introspection document from raw bytes.
    ///
    /// # Errors
    ///
    /// See [`from_json_str`](Self::from_json_str).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        Self::from_envelope(serde_json::from_slice(bytes)?)
    }

    /// Reads and parses an introspection document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`] if the file cannot be read, otherwise
    /// see [`from_json_str`](Self::from_json_str).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    fn from_envelope(envelope: Envelope) -> Result<Self, SchemaError> {
        let (Envelope::Response { data: envelope } | Envelope::Bare(envelope)) = envelope;
        let raw = envelope.schema;

        let types: HashMap<String, TypeDef> = raw
            .types
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();

        let query_type = match raw.query_type {
            Some(named) => named.name,
            None if types.contains_key("Query") => "Query".to_string(),
            None => return Err(SchemaError::MissingQueryType),
        };
        if !types.contains_key(&query_type) {
            return Err(SchemaError::MissingQueryType);
        }

        tracing::debug!(
            "Loaded schema index with {} types (query root '{}')",
            types.len(),
            query_type
        );

        Ok(Self { query_type, types })
    }

    /// Returns the name of the query root type.
    #[must_use]
    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    /// Returns the number of indexed types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the index holds no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Looks up a type by name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaLookupError::UnknownType`] if the type is not indexed.
    pub fn get_type(&self, type_name: &str) -> Result<&TypeDef, SchemaLookupError> {
        self.types
            .get(type_name)
            .ok_or_else(|| SchemaLookupError::UnknownType {
                type_name: type_name.to_string(),
            })
    }

    /// Resolves `(type_name, field_name)` to the field definition and its
    /// unwrapped target type.
    ///
    /// # Errors
    ///
    /// - [`SchemaLookupError::UnknownType`] if `type_name` (or the field's
    ///   target type) is not indexed
    /// - [`SchemaLookupError::UnknownField`] if the type has no such field
    pub fn get_field(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Result<ResolvedField<'_>, SchemaLookupError> {
        let field = self.get_type(type_name)?.field(field_name).ok_or_else(|| {
            SchemaLookupError::UnknownField {
                type_name: type_name.to_string(),
                field_name: field_name.to_string(),
            }
        })?;

        let target_name = field.type_ref.named_type().unwrap_or_default();
        let target = self.get_type(target_name)?;
        let target = if target.kind.is_composite() {
            FieldTarget::Composite {
                type_name: &target.name,
            }
        } else {
            FieldTarget::Leaf {
                type_name: &target.name,
            }
        };

        Ok(ResolvedField { field, target })
    }

    /// Lists the fields declared on a type, in schema order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaLookupError::UnknownType`] if the type is not indexed.
    pub fn list_fields(&self, type_name: &str) -> Result<Vec<&FieldDef>, SchemaLookupError> {
        Ok(self.get_type(type_name)?.fields.iter().collect())
    }

    /// Returns `true` if `field_name` can be selected on the query root.
    #[must_use]
    pub fn is_root_field(&self, field_name: &str) -> bool {
        self.types
            .get(&self.query_type)
            .is_some_and(|root| root.field(field_name).is_some())
    }

    /// Returns every type of the given kind, sorted by name.
    #[must_use]
    pub fn types_of_kind(&self, kind: TypeKind) -> Vec<&TypeDef> {
        let mut types: Vec<&TypeDef> = self.types.values().filter(|t| t.kind == kind).collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }
}
