//! HTTP response types.

use std::collections::HashMap;

/// An HTTP response from the GraphQL endpoint.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercase name (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the request ID from the `X-Request-Id` header, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_with(code: u16, headers: &[(&str, &str)]) -> HttpResponse {
        let headers = headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect();
        HttpResponse::new(code, headers, json!({}))
    }

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        assert!(response_with(200, &[]).is_ok());
        assert!(response_with(204, &[]).is_ok());
        assert!(response_with(299, &[]).is_ok());
    }

    #[test]
    fn test_is_ok_returns_false_for_4xx_and_5xx() {
        assert!(!response_with(199, &[]).is_ok());
        assert!(!response_with(400, &[]).is_ok());
        assert!(!response_with(502, &[]).is_ok());
    }

    #[test]
    fn test_request_id_extraction() {
        let response = response_with(500, &[("x-request-id", "req-7f3a")]);
        assert_eq!(response.request_id(), Some("req-7f3a"));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = response_with(200, &[("content-type", "application/json")]);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("X-Missing"), None);
    }
}
