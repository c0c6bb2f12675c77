//! HTTP request types.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing POST requests to the GraphQL endpoint.

use std::collections::HashMap;

use reqwest::header::{HeaderName, HeaderValue};

use crate::clients::errors::InvalidHttpRequestError;

/// A POST request to be sent to the GraphQL endpoint.
///
/// Use [`HttpRequest::builder`] to construct requests with the builder pattern.
///
/// # Example
///
/// ```rust
/// use rcsb_query::clients::HttpRequest;
/// use serde_json::json;
///
/// let request = HttpRequest::builder(json!({"query": "{ entry(entry_id: \"4HHB\") { rcsb_id } }"}))
///     .header("X-Trace-Id", "pipeline-42")
///     .build()
///     .unwrap();
///
/// assert!(request.extra_headers.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The JSON request body.
    pub body: serde_json::Value,
    /// Additional headers to include in the request.
    pub extra_headers: Option<HashMap<String, String>>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(body: impl Into<serde_json::Value>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(body)
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `body` is not a JSON object
    /// - an extra header name or value cannot be sent over HTTP
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if !self.body.is_object() {
            return Err(InvalidHttpRequestError::BodyNotObject {
                found: json_kind(&self.body),
            });
        }

        if let Some(headers) = &self.extra_headers {
            for (name, value) in headers {
                if HeaderName::from_bytes(name.as_bytes()).is_err()
                    || HeaderValue::from_str(value).is_err()
                {
                    return Err(InvalidHttpRequestError::InvalidHeader { name: name.clone() });
                }
            }
        }

        Ok(())
    }
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    body: serde_json::Value,
    extra_headers: Option<HashMap<String, String>>,
}

impl HttpRequestBuilder {
    fn new(body: impl Into<serde_json::Value>) -> Self {
        Self {
            body: body.into(),
            extra_headers: None,
        }
    }

    /// Sets all extra headers at once.
    #[must_use]
    pub fn extra_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.extra_headers = Some(headers);
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            body: self.body,
            extra_headers: self.extra_headers,
        };
        request.verify()?;
        Ok(request)
    }
}
