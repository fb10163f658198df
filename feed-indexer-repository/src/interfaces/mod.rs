//! Abstract interfaces for the feed indexer backend.

mod bulk_gateway;

pub use bulk_gateway::BulkGateway;
