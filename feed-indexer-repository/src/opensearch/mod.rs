//! OpenSearch implementation of the bulk gateway.
//!
//! This module provides a concrete implementation of `BulkGateway` using the
//! OpenSearch Rust client and the `_bulk` endpoint.

mod gateway;

pub use gateway::OpenSearchGateway;
