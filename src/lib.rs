//! # RCSB Data API query builder
//!
//! A Rust library for building and executing GraphQL queries against the
//! RCSB PDB Data API, with schema-driven field resolution and concurrent
//! batch execution.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`DataApiConfig`] and [`DataApiConfigBuilder`]
//! - A [`SchemaIndex`] over the API's introspection schema
//! - A fluent, schema-resolved [`QueryBuilder`] over an arena [`QueryTree`]
//! - Deterministic rendering with a sorted variable header
//! - An async [`GraphqlClient`] that unwraps `data` and surfaces `errors`
//! - A [`BatchProcessor`] that fans one query out over many inputs
//!
//! ## Quick Start
//!
//! ```rust
//! use rcsb_query::query::{NodeId, QueryTree, VariableTypes};
//!
//! let mut tree = QueryTree::new();
//! let entry = tree.enter(NodeId::ROOT, "entry", [("entry_id", "4HHB")]);
//! tree.add_token(entry, "rcsb_id");
//!
//! let text = tree.render(entry, "structure", &VariableTypes::default());
//! assert_eq!(
//!     text,
//!     "query structure {\n  entry(entry_id: \"4HHB\") {\n    rcsb_id\n  }\n}"
//! );
//! ```
//!
//! ## Schema-Driven Queries
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rcsb_query::{DataApiConfig, GraphqlClient, QueryBuilder, SchemaIndex};
//! use serde_json::json;
//!
//! let schema = Arc::new(SchemaIndex::from_path("data_api_schema.json")?);
//! let client = GraphqlClient::new(&DataApiConfig::default())?;
//!
//! let data = QueryBuilder::new(schema)
//!     .field_with("entry", [("entry_id", "$id")])?
//!     .field("rcsb_id")?
//!     .field("exptl")?
//!     .field("method")?
//!     .submit(&client, "structure", Some(json!({ "id": "4HHB" })))
//!     .await?;
//! ```
//!
//! ## Batch Execution
//!
//! ```rust,ignore
//! use rcsb_query::{BatchOptions, BatchProcessor, DataApiConfig};
//!
//! let query = QueryBuilder::new(schema)
//!     .field_with("entries", [("entry_ids", "$ids")])?
//!     .field("rcsb_id")?
//!     .end();
//!
//! let processor = BatchProcessor::new(&DataApiConfig::default())?;
//! let ids = processor
//!     .run(&query, entry_ids, |entry, _| entry["rcsb_id"].clone(), BatchOptions::new())
//!     .await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration and schema are passed explicitly
//! - **Fail-fast validation**: Configuration and batch preconditions are checked before any request
//! - **Thread-safe**: Shared types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime

pub mod batch;
pub mod clients;
pub mod config;
pub mod error;
pub mod query;
pub mod schema;

// Re-export public types at crate root for convenience
pub use config::{DataApiConfig, DataApiConfigBuilder, EndpointUrl};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    GraphqlClient, GraphqlError, HttpClient, HttpError, HttpRequest, HttpRequestBuilder,
    HttpResponse, HttpResponseError, InvalidHttpRequestError,
};

// Re-export query and schema types
pub use query::{ArgumentValue, QueryBuilder, QueryTree, VariableTypes};
pub use schema::{SchemaError, SchemaIndex, SchemaLookupError};

pub use batch::{BatchError, BatchInputs, BatchOptions, BatchProcessor};
