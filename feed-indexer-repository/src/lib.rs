//! # Feed Indexer Repository
//!
//! This crate provides the gateway trait for submitting bulk indexing
//! operations to a search backend, together with a concrete implementation
//! for OpenSearch. Transport, authentication and cluster topology are
//! entirely this crate's concern; the ingestion pipeline only sees the
//! [`BulkGateway`] contract.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
mod types;

pub use errors::GatewayError;
pub use interfaces::BulkGateway;
pub use opensearch::OpenSearchGateway;
pub use types::{BulkItemFailure, BulkOperation, BulkReport};
