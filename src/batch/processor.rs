//! Concurrent batch execution.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tokio::task::JoinSet;

use crate::batch::errors::{BatchError, BatchTaskError};
use crate::batch::inputs::{BatchInputs, BatchOptions};
use crate::clients::{GraphqlClient, GraphqlError};
use crate::config::{default_max_workers, DataApiConfig};
use crate::error::ConfigError;
use crate::query::{NodeId, QueryBuilder};

/// Runs one query over many inputs by splitting them into batches and
/// executing the batches concurrently.
///
/// The query's top-level field must bind the batched argument to a variable
/// (for example `entries(entry_ids: $ids)`). Each batch binds its slice of
/// the inputs to that variable, and the callback is invoked once per entry
/// returned under the field.
///
/// Results are collected as batches complete, so their overall order is not
/// the input order; within a batch, entry order is kept. A batch that fails
/// is logged with its starting index and its results are dropped.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use rcsb_query::{BatchOptions, BatchProcessor, DataApiConfig, QueryBuilder, SchemaIndex};
///
/// let schema = Arc::new(SchemaIndex::from_path("data_api_schema.json")?);
/// let query = QueryBuilder::new(schema)
///     .field_with("entries", [("entry_ids", "$ids")])?
///     .field("rcsb_id")?
///     .end();
///
/// let processor = BatchProcessor::new(&DataApiConfig::default())?;
/// let ids: Vec<String> = load_ids();
///
/// let rcsb_ids = processor
///     .run(&query, ids, |entry, _kwargs| entry["rcsb_id"].clone(), BatchOptions::new())
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct BatchProcessor {
    client: Arc<GraphqlClient>,
    batch_size: usize,
    max_workers: Option<usize>,
}

// Verify BatchProcessor is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BatchProcessor>();
};

impl BatchProcessor {
    /// Creates a processor with its own client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphqlError`] if the HTTP client cannot be created.
    pub fn new(config: &DataApiConfig) -> Result<Self, GraphqlError> {
        Ok(Self::with_client(Arc::new(GraphqlClient::new(config)?), config))
    }

    /// Creates a processor sharing an existing client.
    #[must_use]
    pub fn with_client(client: Arc<GraphqlClient>, config: &DataApiConfig) -> Self {
        Self {
            client,
            batch_size: config.batch_size(),
            max_workers: config.max_workers(),
        }
    }

    /// Executes `query` once per batch of `inputs` and returns the callback
    /// results.
    ///
    /// `func` receives each returned entry together with the merged keyword
    /// arguments: the options' constant arguments plus, for the entry at
    /// absolute input position `i`, the i-th value of every per-input
    /// argument.
    ///
    /// # Errors
    ///
    /// Returns a [`BatchError`] if a precondition fails. Preconditions are
    /// checked before any request is sent. Failures of individual batches are
    /// not returned.
    pub async fn run<F, R>(
        &self,
        query: &QueryBuilder,
        inputs: impl Into<BatchInputs>,
        func: F,
        options: BatchOptions,
    ) -> Result<Vec<R>, BatchError>
    where
        F: Fn(Value, &Map<String, Value>) -> R + Send + Sync + 'static,
        R: Send + 'static,
    {
        let inputs = inputs.into();
        let plan = self.plan(query, &inputs, &options)?;

        tracing::debug!(
            "Dispatching {} batches of up to {} inputs over {} workers for '{}'",
            plan.ranges.len(),
            plan.batch_size,
            plan.max_workers,
            plan.field
        );

        let query_name = options
            .get_query_name()
            .map_or_else(|| plan.field.clone(), str::to_string);
        let job = BatchJob {
            client: Arc::clone(&self.client),
            query: Arc::from(query.render(&query_name)),
            field: Arc::from(plan.field.as_str()),
            func: Arc::new(func),
            const_kwargs: Arc::new(options.const_kwargs().clone()),
        };

        let mut pending = plan.ranges.into_iter();
        let mut tasks = JoinSet::new();
        for (start, end) in pending.by_ref().take(plan.max_workers) {
            job.spawn(&mut tasks, &inputs, &plan.variables, options.iter_kwargs(), start, end);
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(batch)) => results.extend(batch),
                Ok(Err(error)) => {
                    tracing::error!(
                        start = error.start,
                        "Batch starting at input {} failed; dropping its results: {}",
                        error.start,
                        error.source
                    );
                }
                Err(error) => {
                    tracing::warn!("Batch task did not complete: {error}");
                }
            }

            if let Some((start, end)) = pending.next() {
                job.spawn(&mut tasks, &inputs, &plan.variables, options.iter_kwargs(), start, end);
            }
        }

        Ok(results)
    }

    fn plan(
        &self,
        query: &QueryBuilder,
        inputs: &BatchInputs,
        options: &BatchOptions,
    ) -> Result<BatchPlan, BatchError> {
        let tree = query.tree();
        let root_field = tree
            .child_nodes(NodeId::ROOT)
            .next()
            .ok_or(BatchError::MissingRootField)?;
        let node = tree.node(root_field);
        let field = node.name().unwrap_or_default().to_string();

        if !query.schema().is_root_field(&field) {
            return Err(BatchError::UnrecognizedField { field });
        }

        let mut variables: Vec<String> = Vec::new();
        for (_, variable) in node.bound_variables() {
            if !variables.iter().any(|v| v == variable) {
                variables.push(variable.to_string());
            }
        }
        if variables.is_empty() {
            return Err(BatchError::NoBoundVariable { field });
        }

        match inputs {
            BatchInputs::Ids(_) if variables.len() > 1 => {
                return Err(BatchError::AmbiguousVariable { field, variables });
            }
            BatchInputs::Ids(_) => {}
            BatchInputs::Records(records) => {
                for (index, record) in records.iter().enumerate() {
                    if let Some(variable) = variables.iter().find(|v| !record.contains_key(*v)) {
                        return Err(BatchError::MissingRecordVariable {
                            index,
                            variable: variable.clone(),
                        });
                    }
                }
            }
        }

        let expected = inputs.len();
        for (name, values) in options.iter_kwargs() {
            if values.len() != expected {
                return Err(BatchError::IterKwargsLength {
                    name: name.clone(),
                    expected,
                    actual: values.len(),
                });
            }
        }

        if inputs.is_empty() {
            return Err(BatchError::EmptyInputs);
        }

        let batch_size = match options.get_batch_size() {
            Some(0) => return Err(ConfigError::InvalidBatchSize.into()),
            Some(size) => size,
            None => self.batch_size,
        }
        .min(expected);
        let max_workers = match options.get_max_workers().or(self.max_workers) {
            Some(0) => return Err(ConfigError::InvalidMaxWorkers.into()),
            Some(workers) => workers,
            None => default_max_workers(),
        };

        let ranges = (0..expected)
            .step_by(batch_size)
            .map(|start| (start, (start + batch_size).min(expected)))
            .collect();

        Ok(BatchPlan {
            field,
            variables,
            batch_size,
            max_workers,
            ranges,
        })
    }
}

/// Validated layout of one run.
#[derive(Debug)]
struct BatchPlan {
    field: String,
    variables: Vec<String>,
    batch_size: usize,
    max_workers: usize,
    ranges: Vec<(usize, usize)>,
}

/// State shared read-only by every batch task of one run.
struct BatchJob<F> {
    client: Arc<GraphqlClient>,
    query: Arc<str>,
    field: Arc<str>,
    func: Arc<F>,
    const_kwargs: Arc<Map<String, Value>>,
}

impl<F, R> BatchJob<F>
where
    F: Fn(Value, &Map<String, Value>) -> R + Send + Sync + 'static,
    R: Send + 'static,
{
    fn spawn(
        &self,
        tasks: &mut JoinSet<Result<Vec<R>, BatchTaskError>>,
        inputs: &BatchInputs,
        variables: &[String],
        iter_kwargs: &IndexMap<String, Vec<Value>>,
        start: usize,
        end: usize,
    ) {
        let bound = inputs.variables_for(variables, start, end);
        let iter_kwargs: Vec<(String, Vec<Value>)> = iter_kwargs
            .iter()
            .map(|(name, values)| (name.clone(), values[start..end].to_vec()))
            .collect();

        let client = Arc::clone(&self.client);
        let query = Arc::clone(&self.query);
        let field = Arc::clone(&self.field);
        let func = Arc::clone(&self.func);
        let const_kwargs = Arc::clone(&self.const_kwargs);

        tasks.spawn(async move {
            let mut data = client
                .execute(&query, Some(bound))
                .await
                .map_err(|source| BatchTaskError { start, source })?;

            let entries = match data.remove(&*field) {
                Some(Value::Array(entries)) => entries,
                Some(Value::Null) | None => Vec::new(),
                Some(entry) => vec![entry],
            };

            Ok(entries
                .into_iter()
                .enumerate()
                .map(|(i, entry)| {
                    let mut kwargs = (*const_kwargs).clone();
                    for (name, values) in &iter_kwargs {
                        if let Some(value) = values.get(i) {
                            kwargs.insert(name.clone(), value.clone());
                        }
                    }
                    (*func)(entry, &kwargs)
                })
                .collect())
        });
    }
}
