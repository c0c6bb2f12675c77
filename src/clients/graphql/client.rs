//! GraphQL client implementation for the Data API.
//!
//! This module provides the [`GraphqlClient`] type for executing GraphQL
//! documents and unwrapping their `data`.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::clients::graphql::GraphqlError;
use crate::clients::{HttpClient, HttpRequest};
use crate::config::DataApiConfig;

/// GraphQL API client.
///
/// Sends `{"query": ..., "variables": ...}` to the configured endpoint and
/// returns the response's `data` object.
///
/// # Thread Safety
///
/// `GraphqlClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use rcsb_query::{DataApiConfig, GraphqlClient};
/// use serde_json::json;
///
/// let client = GraphqlClient::new(&DataApiConfig::default())?;
///
/// let data = client.execute(
///     "query structure($id: String!) { entry(entry_id: $id) { rcsb_id } }",
///     Some(json!({ "id": "4HHB" })),
/// ).await?;
///
/// println!("{}", data["entry"]["rcsb_id"]);
/// ```
#[derive(Debug)]
pub struct GraphqlClient {
    http_client: HttpClient,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates a new GraphQL client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GraphqlError::Http`] if the HTTP client cannot be created.
    pub fn new(config: &DataApiConfig) -> Result<Self, GraphqlError> {
        Ok(Self {
            http_client: HttpClient::new(config)?,
        })
    }

    /// Returns the endpoint URL requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.http_client.endpoint()
    }

    /// Executes a GraphQL document and returns its `data` object.
    ///
    /// A missing or `null` `data` member yields an empty map.
    ///
    /// # Errors
    ///
    /// - [`GraphqlError::Http`] for network errors and non-2xx responses
    /// - [`GraphqlError::Response`] when the body carries a non-empty `errors` array
    pub async fn execute(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Map<String, Value>, GraphqlError> {
        self.execute_with_headers(query, variables, None).await
    }

    /// Executes a GraphQL document with extra request headers.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn execute_with_headers(
        &self,
        query: &str,
        variables: Option<Value>,
        headers: Option<HashMap<String, String>>,
    ) -> Result<Map<String, Value>, GraphqlError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables.unwrap_or_else(|| Value::Object(Map::new())),
        });

        let mut builder = HttpRequest::builder(body);
        if let Some(extra_headers) = headers {
            builder = builder.extra_headers(extra_headers);
        }
        let request = builder.build().map_err(|e| GraphqlError::Http(e.into()))?;

        tracing::debug!(
            "Executing GraphQL query ({} bytes) against {}",
            query.len(),
            self.endpoint()
        );

        let response = self.http_client.request(request).await?;
        Self::unwrap_data(response.body)
    }

    fn unwrap_data(body: Value) -> Result<Map<String, Value>, GraphqlError> {
        let Value::Object(mut body) = body else {
            tracing::warn!("GraphQL response body is not an object; treating as empty data");
            return Ok(Map::new());
        };

        if let Some(Value::Array(errors)) = body.remove("errors") {
            if !errors.is_empty() {
                return Err(GraphqlError::Response { errors });
            }
        }

        match body.remove("data") {
            Some(Value::Object(data)) => Ok(data),
            _ => {
                tracing::warn!("GraphQL response carries no data object");
                Ok(Map::new())
            }
        }
    }
}
