//! Batch precondition and task errors.

use thiserror::Error;

use crate::clients::GraphqlError;
use crate::error::ConfigError;

/// Errors detected before any batch request is sent.
///
/// Every variant is raised eagerly: when [`BatchProcessor::run`](crate::batch::BatchProcessor::run)
/// returns one of these, no network activity has taken place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The query selects nothing at its root.
    #[error("The query has no top-level field. Verify that `.end()` was called to return to the query root before batching.")]
    MissingRootField,

    /// The top-level field is not selectable on the query root.
    #[error("'{field}' is not a recognized query root field. Verify that `.end()` was called to return to the query root before batching.")]
    UnrecognizedField {
        /// The field that was found at the top level.
        field: String,
    },

    /// No argument of the top-level field is bound to a variable.
    #[error("No variable is bound on '{field}'. Bind the batched argument to a variable (e.g., `entry_ids: \"$ids\"`).")]
    NoBoundVariable {
        /// The top-level field.
        field: String,
    },

    /// Plain id inputs were given for a field bound to several variables.
    #[error("'{field}' binds {} variables ({}); pass one record per input instead of plain ids.", .variables.len(), .variables.join(", "))]
    AmbiguousVariable {
        /// The top-level field.
        field: String,
        /// Every bound variable name.
        variables: Vec<String>,
    },

    /// A record input lacks a value for a bound variable.
    #[error("Input record {index} has no value for variable '{variable}'.")]
    MissingRecordVariable {
        /// Position of the record in the inputs.
        index: usize,
        /// The missing variable name.
        variable: String,
    },

    /// An `iter_kwargs` array does not line up with the inputs.
    #[error("iter_kwargs '{name}' has {actual} values but there are {expected} inputs.")]
    IterKwargsLength {
        /// The `iter_kwargs` key.
        name: String,
        /// Number of inputs.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// There is nothing to batch.
    #[error("No inputs to batch.")]
    EmptyInputs,

    /// A batch size or worker count override is invalid.
    #[error(transparent)]
    InvalidOptions(#[from] ConfigError),
}

/// A failure of one dispatched batch.
///
/// Task errors never reach the caller: they are logged with the batch's
/// starting index and the batch's results are dropped.
#[derive(Debug, Error)]
#[error("Batch starting at input {start} failed: {source}")]
pub struct BatchTaskError {
    /// Index of the batch's first input.
    pub start: usize,
    /// The request failure.
    #[source]
    pub source: GraphqlError,
}
