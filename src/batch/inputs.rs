//! Batch inputs and per-run options.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// The collection a batch run fans out over.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchInputs {
    /// Plain ids, bound as one list to the field's single variable.
    Ids(Vec<Value>),
    /// One record per input, holding a value for every bound variable.
    Records(Vec<Map<String, Value>>),
}

impl BatchInputs {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Records(records) => records.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds the `variables` object for `start..end`.
    ///
    /// Callers must have checked that every record carries every variable.
    pub(crate) fn variables_for(&self, variables: &[String], start: usize, end: usize) -> Value {
        let mut bound = Map::new();
        match self {
            Self::Ids(ids) => {
                if let Some(variable) = variables.first() {
                    bound.insert(variable.clone(), Value::Array(ids[start..end].to_vec()));
                }
            }
            Self::Records(records) => {
                for variable in variables {
                    let values = records[start..end]
                        .iter()
                        .map(|record| record.get(variable).cloned().unwrap_or(Value::Null))
                        .collect();
                    bound.insert(variable.clone(), Value::Array(values));
                }
            }
        }
        Value::Object(bound)
    }
}

impl From<Vec<Value>> for BatchInputs {
    fn from(ids: Vec<Value>) -> Self {
        Self::Ids(ids)
    }
}

impl From<Vec<String>> for BatchInputs {
    fn from(ids: Vec<String>) -> Self {
        Self::Ids(ids.into_iter().map(Value::String).collect())
    }
}

impl From<Vec<&str>> for BatchInputs {
    fn from(ids: Vec<&str>) -> Self {
        Self::Ids(ids.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<Map<String, Value>>> for BatchInputs {
    fn from(records: Vec<Map<String, Value>>) -> Self {
        Self::Records(records)
    }
}

/// Per-run overrides and callback arguments.
///
/// # Example
///
/// ```rust
/// use rcsb_query::batch::BatchOptions;
/// use serde_json::json;
///
/// let options = BatchOptions::new()
///     .batch_size(50)
///     .max_workers(4)
///     .const_kwarg("source", json!("rcsb"))
///     .iter_kwarg("label", vec![json!("a"), json!("b")]);
///
/// assert_eq!(options.get_batch_size(), Some(50));
/// ```
#[derive(Clone, Debug, Default)]
pub struct BatchOptions {
    batch_size: Option<usize>,
    max_workers: Option<usize>,
    query_name: Option<String>,
    const_kwargs: Map<String, Value>,
    iter_kwargs: IndexMap<String, Vec<Value>>,
}

impl BatchOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of inputs per request. Defaults to the configured
    /// batch size; never exceeds the number of inputs.
    #[must_use]
    pub const fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Caps the number of requests in flight.
    #[must_use]
    pub const fn max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }

    /// Sets the operation name of the rendered query. Defaults to the
    /// top-level field name.
    #[must_use]
    pub fn query_name(mut self, name: impl Into<String>) -> Self {
        self.query_name = Some(name.into());
        self
    }

    /// Adds an argument passed unchanged to every callback invocation.
    #[must_use]
    pub fn const_kwarg(mut self, name: impl Into<String>, value: Value) -> Self {
        self.const_kwargs.insert(name.into(), value);
        self
    }

    /// Adds a per-input argument; the i-th value accompanies the i-th result.
    #[must_use]
    pub fn iter_kwarg(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        self.iter_kwargs.insert(name.into(), values);
        self
    }

    #[must_use]
    pub const fn get_batch_size(&self) -> Option<usize> {
        self.batch_size
    }

    #[must_use]
    pub const fn get_max_workers(&self) -> Option<usize> {
        self.max_workers
    }

    #[must_use]
    pub fn get_query_name(&self) -> Option<&str> {
        self.query_name.as_deref()
    }

    #[must_use]
    pub const fn const_kwargs(&self) -> &Map<String, Value> {
        &self.const_kwargs
    }

    #[must_use]
    pub const fn iter_kwargs(&self) -> &IndexMap<String, Vec<Value>> {
        &self.iter_kwargs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(entry: &str, entity: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("entry".to_string(), json!(entry));
        map.insert("entity".to_string(), json!(entity));
        map
    }

    #[test]
    fn test_ids_bind_one_list() {
        let inputs = BatchInputs::from(vec!["1ABC", "2DEF", "3GHI"]);
        assert_eq!(
            inputs.variables_for(&["ids".to_string()], 1, 3),
            json!({"ids": ["2DEF", "3GHI"]})
        );
    }

    #[test]
    fn test_records_bind_one_list_per_variable() {
        let inputs = BatchInputs::from(vec![record("4HHB", "1"), record("1TUP", "2")]);
        let variables = inputs.variables_for(&["entry".to_string(), "entity".to_string()], 0, 2);
        assert_eq!(
            variables,
            json!({"entry": ["4HHB", "1TUP"], "entity": ["1", "2"]})
        );
    }

    #[test]
    fn test_options_accumulate_kwargs() {
        let options = BatchOptions::new()
            .const_kwarg("a", json!(1))
            .const_kwarg("a", json!(2))
            .iter_kwarg("z", vec![json!(0)])
            .iter_kwarg("b", vec![json!(1)]);

        assert_eq!(options.const_kwargs()["a"], json!(2));
        assert_eq!(options.iter_kwargs().keys().collect::<Vec<_>>(), vec!["z", "b"]);
        assert!(options.get_batch_size().is_none());
    }
}
