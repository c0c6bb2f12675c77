//! Introspection model: the subset of `__schema` the query builder reads.

use serde::{Deserialize, Serialize};

/// The kind of a GraphQL type, as reported by introspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    /// A built-in or custom scalar.
    Scalar,
    /// An object type with fields.
    Object,
    /// An interface type.
    Interface,
    /// A union of object types.
    Union,
    /// An enumeration.
    Enum,
    /// An input object (argument-only).
    InputObject,
    /// A list wrapper.
    List,
    /// A non-null wrapper.
    NonNull,
}

impl TypeKind {
    /// Returns `true` for kinds that are selected without a sub-selection.
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        matches!(self, Self::Scalar | Self::Enum)
    }

    /// Returns `true` for kinds that require a sub-selection.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Object | Self::Interface | Self::Union)
    }
}

/// A (possibly wrapped) reference to a named type.
///
/// `NON_NULL` and `LIST` wrappers carry no name and point at the wrapped
/// type through `of_type`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    /// Kind of this reference.
    pub kind: TypeKind,
    /// Name of the type; `None` for wrappers.
    #[serde(default)]
    pub name: Option<String>,
    /// The wrapped type, for `NON_NULL` and `LIST`.
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// Unwraps `NON_NULL`/`LIST` wrappers and returns the innermost named type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rcsb_query::schema::{TypeKind, TypeRef};
    ///
    /// let ids: TypeRef = serde_json::from_value(serde_json::json!({
    ///     "kind": "NON_NULL",
    ///     "ofType": {"kind": "LIST", "ofType": {"kind": "SCALAR", "name": "String"}}
    /// })).unwrap();
    ///
    /// assert_eq!(ids.named_type(), Some("String"));
    /// assert_eq!(ids.to_type_string(), "[String]!");
    /// ```
    #[must_use]
    pub fn named_type(&self) -> Option<&str> {
        match (&self.name, &self.of_type) {
            (Some(name), _) => Some(name.as_str()),
            (None, Some(inner)) => inner.named_type(),
            (None, None) => None,
        }
    }

    /// Returns the kind of the innermost named type.
    #[must_use]
    pub fn named_kind(&self) -> TypeKind {
        match (self.kind, &self.of_type) {
            (TypeKind::List | TypeKind::NonNull, Some(inner)) => inner.named_kind(),
            (kind, _) => kind,
        }
    }

    /// Renders the reference in GraphQL type syntax (e.g. `[String!]!`).
    #[must_use]
    pub fn to_type_string(&self) -> String {
        let inner = || {
            self.of_type
                .as_deref()
                .map_or_else(String::new, Self::to_type_string)
        };
        match self.kind {
            TypeKind::NonNull => format!("{}!", inner()),
            TypeKind::List => format!("[{}]", inner()),
            _ => self.name.clone().unwrap_or_default(),
        }
    }
}

/// An argument (input value) declared on a field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValue {
    /// Argument name.
    pub name: String,
    /// Argument type.
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Default value, as GraphQL literal text.
    #[serde(default)]
    pub default_value: Option<String>,
}

/// A field declared on an object or interface type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Field description, if documented.
    #[serde(default)]
    pub description: Option<String>,
    /// Declared arguments.
    #[serde(default)]
    pub args: Vec<InputValue>,
    /// The field's (possibly wrapped) type.
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

impl FieldDef {
    /// Looks up a declared argument by name.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&InputValue> {
        self.args.iter().find(|a| a.name == name)
    }
}

/// A named type from the introspection document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDef {
    /// Kind of the type.
    pub kind: TypeKind,
    /// Type name.
    pub name: String,
    /// Type description, if documented.
    #[serde(default)]
    pub description: Option<String>,
    /// Fields, for objects and interfaces (`null` in introspection otherwise).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields: Vec<FieldDef>,
}

impl TypeDef {
    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<FieldDef>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<FieldDef>>::deserialize(deserializer)?.unwrap_or_default())
}
