//! Schema loading and lookup errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading an introspection document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema file could not be read.
    #[error("Failed to read schema file '{}': {source}", .path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not a valid introspection result.
    #[error("Invalid introspection document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document names no query root and has no `Query` type.
    #[error("Introspection document has no query root type. Expected '__schema.queryType' or a type named 'Query'.")]
    MissingQueryType,
}

/// Error raised when a field or type cannot be resolved against the schema.
///
/// The message names the type and field that were attempted so callers can
/// correct typos; [`SchemaIndex::list_fields`](crate::schema::SchemaIndex::list_fields)
/// enumerates the valid choices.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaLookupError {
    /// The type is not present in the schema.
    #[error("Unknown type '{type_name}' in schema.")]
    UnknownType {
        /// The type name that was looked up.
        type_name: String,
    },

    /// The type has no field with this name.
    #[error("Type '{type_name}' has no field '{field_name}'.")]
    UnknownField {
        /// The type the field was looked up on.
        type_name: String,
        /// The field name that was attempted.
        field_name: String,
    },

    /// The current node carries no schema type, so fields cannot be resolved.
    #[error("Cannot resolve field '{field_name}': the current node has no schema type.")]
    UntypedNode {
        /// The field name that was attempted.
        field_name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_message_names_type_and_field() {
        let error = SchemaLookupError::UnknownField {
            type_name: "CoreEntry".to_string(),
            field_name: "rcsb_idd".to_string(),
        };
        assert_eq!(error.to_string(), "Type 'CoreEntry' has no field 'rcsb_idd'.");
    }

    #[test]
    fn test_io_error_message_includes_path() {
        let error = SchemaError::Io {
            path: PathBuf::from("/tmp/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(error.to_string().contains("/tmp/missing.json"));
    }
}
