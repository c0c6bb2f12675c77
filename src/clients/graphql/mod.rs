//! GraphQL executor for the Data API.
//!
//! This module provides a GraphQL client built on top of the
//! [`HttpClient`](crate::clients::HttpClient) that sends a query document
//! with its variables and unwraps the response.
//!
//! # Overview
//!
//! - [`GraphqlClient`]: executes documents with `execute()`
//! - [`GraphqlError`]: transport and GraphQL-level failures
//!
//! # Response Handling
//!
//! - non-2xx status: [`GraphqlError::Http`]
//! - non-empty `errors` array: [`GraphqlError::Response`], carrying the array
//! - otherwise: the `data` object, or an empty map if absent

mod client;
mod errors;

pub use client::GraphqlClient;
pub use errors::GraphqlError;
