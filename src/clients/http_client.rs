//! HTTP client for the GraphQL endpoint.
//!
//! This module provides the [`HttpClient`] type for POSTing JSON requests
//! to the configured endpoint and parsing the responses.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;
use crate::config::DataApiConfig;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the GraphQL endpoint.
///
/// The client handles:
/// - Default headers including User-Agent, Accept and Content-Type
/// - Response body parsing (JSON, with raw fallback for 5xx bodies)
/// - Mapping non-2xx responses to [`HttpResponseError`]
///
/// Requests are attempted exactly once.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use rcsb_query::{DataApiConfig, HttpClient, HttpRequest};
/// use serde_json::json;
///
/// let client = HttpClient::new(&DataApiConfig::default())?;
///
/// let request = HttpRequest::builder(json!({"query": "{ entry(entry_id: \"4HHB\") { rcsb_id } }"}))
///     .build()?;
///
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Full endpoint URL (e.g., `https://data.rcsb.org/graphql`).
    endpoint: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client
    /// cannot be created (e.g., TLS initialization failure).
    pub fn new(config: &DataApiConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}rcsb-data-query v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
            default_headers,
        })
    }

    /// Returns the endpoint URL for this client.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends a POST request to the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let mut headers = self.default_headers.clone();
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut req_builder = self.client.post(&self.endpoint);
        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }
        req_builder = req_builder.body(request.body.to_string());

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        let body = if body_text.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&body_text).unwrap_or_else(|_| {
                // Keep unparseable error bodies visible in the error message
                if code >= 400 {
                    serde_json::json!({ "raw_body": body_text })
                } else {
                    serde_json::json!({})
                }
            })
        };

        let response = HttpResponse::new(code, res_headers, body);

        if response.is_ok() {
            return Ok(response);
        }

        tracing::debug!(
            "Request to {} failed with status {}",
            self.endpoint,
            response.code
        );

        Err(HttpError::Response(HttpResponseError {
            code,
            message: Self::serialize_error(&response),
            error_reference: response.request_id().map(String::from),
        }))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Serializes an error response body to a compact JSON summary.
    fn serialize_error(response: &HttpResponse) -> String {
        let mut error_body = serde_json::Map::new();

        for key in ["errors", "error", "raw_body"] {
            if let Some(value) = response.body.get(key) {
                error_body.insert(key.to_string(), value.clone());
            }
        }

        if let Some(request_id) = response.request_id() {
            error_body.insert(
                "error_reference".to_string(),
                serde_json::json!(format!(
                    "If you report this error, please include this id: {request_id}."
                )),
            );
        }

        serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointUrl;
    use crate::clients::{HttpError, InvalidHttpRequestError};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> DataApiConfig {
        DataApiConfig::builder()
            .endpoint(EndpointUrl::new(format!("{}/graphql", server.uri())).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_construction_uses_config_endpoint() {
        let client = HttpClient::new(&DataApiConfig::default()).unwrap();
        assert_eq!(client.endpoint(), "https://data.rcsb.org/graphql");
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&DataApiConfig::default()).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("rcsb-data-query v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = DataApiConfig::builder()
            .user_agent_prefix("MyPipeline/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyPipeline/1.0 | "));
    }

    #[test]
    fn test_json_headers_are_defaults() {
        let client = HttpClient::new(&DataApiConfig::default()).unwrap();

        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
        assert_eq!(
            client.default_headers().get("Content-Type"),
            Some(&"application/json".to_string())
        );
    }

    #[tokio::test]
    async fn test_request_posts_body_and_parses_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"query": "{ a }", "variables": {}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"a": 1}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config_for(&server)).unwrap();
        let request = HttpRequest::builder(json!({"query": "{ a }", "variables": {}}))
            .build()
            .unwrap();

        let response = client.request(request).await.unwrap();
        assert_eq!(response.code, 200);
        assert_eq!(response.body["data"]["a"], 1);
    }

    #[tokio::test]
    async fn test_non_2xx_response_is_returned_as_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(502)
                    .insert_header("x-request-id", "req-99")
                    .set_body_string("<html>Bad Gateway</html>"),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(&config_for(&server)).unwrap();
        let request = HttpRequest::builder(json!({})).build().unwrap();

        match client.request(request).await {
            Err(HttpError::Response(e)) => {
                assert_eq!(e.code, 502);
                assert!(e.message.contains("Bad Gateway"));
                assert_eq!(e.error_reference.as_deref(), Some("req-99"));
            }
            other => panic!("Expected HttpError::Response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config_for(&server)).unwrap();
        let request = HttpRequest {
            body: json!("query"),
            extra_headers: None,
        };

        let result = client.request(request).await;
        assert!(matches!(
            result,
            Err(HttpError::InvalidRequest(
                InvalidHttpRequestError::BodyNotObject { .. }
            ))
        ));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
