//! GraphQL-specific error types.
//!
//! - [`GraphqlError::Http`]: wraps transport-level errors (network, non-2xx)
//! - [`GraphqlError::Response`]: a successful HTTP response whose body
//!   carries a non-empty `errors` array
//!
//! # Example
//!
//! ```rust,ignore
//! use rcsb_query::clients::graphql::{GraphqlClient, GraphqlError};
//!
//! match client.execute("query { entry(entry_id: \"4HHB\") { rcsb_id } }", None).await {
//!     Ok(data) => println!("Data: {:?}", data),
//!     Err(GraphqlError::Response { errors }) => {
//!         println!("GraphQL errors: {:?}", errors);
//!     }
//!     Err(GraphqlError::Http(e)) => {
//!         println!("HTTP error: {}", e);
//!     }
//! }
//! ```

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for GraphQL API operations.
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// An HTTP-level error occurred.
    ///
    /// This variant wraps [`HttpError`] for unified error handling.
    /// It includes network errors, non-2xx responses, and invalid requests.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The server answered with GraphQL errors.
    #[error("GraphQL request returned {} error(s): {}", .errors.len(), summarize(.errors))]
    Response {
        /// The `errors` array from the response body, as returned.
        errors: Vec<serde_json::Value>,
    },
}

impl GraphqlError {
    /// Returns the `message` of every GraphQL error, if this is a response error.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        match self {
            Self::Http(_) => Vec::new(),
            Self::Response { errors } => errors
                .iter()
                .filter_map(|e| e.get("message").and_then(serde_json::Value::as_str))
                .collect(),
        }
    }
}

fn summarize(errors: &[serde_json::Value]) -> String {
    errors
        .iter()
        .map(|e| {
            e.get("message")
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| e.to_string(), String::from)
        })
        .collect::<Vec<_>>()
        .join("; ")
}
