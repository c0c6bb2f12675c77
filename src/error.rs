//! Configuration error types for the query builder.
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use rcsb_query::{ConfigError, EndpointUrl};
//!
//! let result = EndpointUrl::new("data.rcsb.org/graphql");
//! assert!(matches!(result, Err(ConfigError::InvalidEndpointUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while building a [`DataApiConfig`](crate::DataApiConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Endpoint URL is invalid.
    #[error("Invalid endpoint URL '{url}'. Expected an http(s) URL with a host (e.g., 'https://data.rcsb.org/graphql').")]
    InvalidEndpointUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Batch size must be positive.
    #[error("Invalid batch size 0. The batch size must be at least 1.")]
    InvalidBatchSize,

    /// Worker count must be positive.
    #[error("Invalid max_workers 0. At least one worker is required to dispatch batches.")]
    InvalidMaxWorkers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_endpoint_url_error_message() {
        let error = ConfigError::InvalidEndpointUrl {
            url: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("https://data.rcsb.org/graphql"));
    }

    #[test]
    fn test_invalid_batch_size_error_message() {
        let message = ConfigError::InvalidBatchSize.to_string();
        assert!(message.contains("at least 1"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::InvalidMaxWorkers;
        let _: &dyn std::error::Error = &error;
    }
}
