//! HTTP and GraphQL client types.
//!
//! # Overview
//!
//! - [`HttpClient`]: the async HTTP client that POSTs to the endpoint
//! - [`HttpRequest`]: a JSON request to be sent
//! - [`HttpResponse`]: a parsed response
//! - [`graphql::GraphqlClient`]: the GraphQL executor
//! - [`graphql::GraphqlError`]: GraphQL-specific error types
//!
//! Requests are never retried; a non-2xx status is reported immediately.

mod errors;
pub mod graphql;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;

pub use graphql::{GraphqlClient, GraphqlError};
