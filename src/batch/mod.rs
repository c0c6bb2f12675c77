//! Batched, concurrent execution of one query over many inputs.
//!
//! A [`BatchProcessor`] splits inputs into contiguous batches, binds each
//! batch to the variable(s) of the query's top-level field, executes the
//! batches with a bounded number of requests in flight, and hands every
//! returned entry to a caller-supplied callback.
//!
//! # Overview
//!
//! - [`BatchProcessor`]: validates, dispatches and collects
//! - [`BatchInputs`]: plain ids (one variable) or records (several variables)
//! - [`BatchOptions`]: batch size, worker count and callback arguments
//! - [`BatchError`]: precondition failures, raised before any request
//! - [`BatchTaskError`]: a failed batch, logged and dropped
//!
//! # Ordering
//!
//! Batches are collected as they complete. Entries keep their order within a
//! batch, but batches may arrive in any order.

mod errors;
mod inputs;
mod processor;

pub use errors::{BatchError, BatchTaskError};
pub use inputs::{BatchInputs, BatchOptions};
pub use processor::BatchProcessor;
