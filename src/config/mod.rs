//! Configuration types for the Data API client.
//!
//! # Overview
//!
//! - [`DataApiConfig`]: endpoint, user agent, and batch defaults
//! - [`DataApiConfigBuilder`]: a builder for constructing [`DataApiConfig`] instances
//! - [`EndpointUrl`]: a validated GraphQL endpoint URL
//!
//! # Example
//!
//! ```rust
//! use rcsb_query::{DataApiConfig, EndpointUrl};
//!
//! let config = DataApiConfig::builder()
//!     .endpoint(EndpointUrl::new("https://data.rcsb.org/graphql").unwrap())
//!     .batch_size(100)
//!     .max_workers(8)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.batch_size(), 100);
//! ```

mod newtypes;

pub use newtypes::{EndpointUrl, DEFAULT_ENDPOINT};

use crate::error::ConfigError;

/// Largest number of inputs bound into a single batch request by default.
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Configuration for the Data API client and batch processor.
///
/// # Thread Safety
///
/// `DataApiConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct DataApiConfig {
    endpoint: EndpointUrl,
    user_agent_prefix: Option<String>,
    batch_size: usize,
    max_workers: Option<usize>,
}

impl DataApiConfig {
    /// Creates a new builder for constructing a `DataApiConfig`.
    #[must_use]
    pub fn builder() -> DataApiConfigBuilder {
        DataApiConfigBuilder::new()
    }

    /// Returns the GraphQL endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &EndpointUrl {
        &self.endpoint
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the maximum number of inputs bound into one batch request.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the configured worker count, if any.
    ///
    /// When `None`, batch processing uses [`default_max_workers`].
    #[must_use]
    pub const fn max_workers(&self) -> Option<usize> {
        self.max_workers
    }
}

impl Default for DataApiConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointUrl::default(),
            user_agent_prefix: None,
            batch_size: DEFAULT_BATCH_SIZE,
            max_workers: None,
        }
    }
}

// Verify DataApiConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DataApiConfig>();
};

/// Returns the worker count used when none is configured: `min(32, cpus + 4)`.
#[must_use]
pub fn default_max_workers() -> usize {
    let cpus = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    (cpus + 4).min(32)
}

/// Builder for constructing [`DataApiConfig`] instances.
///
/// # Defaults
///
/// - `endpoint`: [`DEFAULT_ENDPOINT`]
/// - `batch_size`: [`DEFAULT_BATCH_SIZE`]
/// - `max_workers`: `None` (see [`default_max_workers`])
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct DataApiConfigBuilder {
    endpoint: Option<EndpointUrl>,
    user_agent_prefix: Option<String>,
    batch_size: Option<usize>,
    max_workers: Option<usize>,
}

impl DataApiConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the GraphQL endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: EndpointUrl) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the default batch size cap.
    #[must_use]
    pub const fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Sets the number of concurrently executing batch requests.
    #[must_use]
    pub const fn max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }

    /// Builds the [`DataApiConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBatchSize`] or
    /// [`ConfigError::InvalidMaxWorkers`] when either is set to zero.
    pub fn build(self) -> Result<DataApiConfig, ConfigError> {
        let batch_size = self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if self.max_workers == Some(0) {
            return Err(ConfigError::InvalidMaxWorkers);
        }

        Ok(DataApiConfig {
            endpoint: self.endpoint.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
            batch_size,
            max_workers: self.max_workers,
        })
    }
}
