//! Bulk gateway trait definition.
//!
//! This module defines the abstract interface for submitting batches of
//! indexing operations, allowing for different backend implementations
//! (OpenSearch, Elasticsearch, etc.) and mock implementations in tests.

use async_trait::async_trait;

use crate::errors::GatewayError;
use crate::types::{BulkOperation, BulkReport};

/// Abstracts the search backend that executes bulk operation batches.
///
/// Implementations are injected into the batching stage to enable dependency
/// injection and easy testing with mocks.
///
/// A batch either succeeds as a whole or fails as a whole from the caller's
/// viewpoint: implementations must report any per-item failure through
/// [`GatewayError::ItemFailures`] rather than silently dropping items, and
/// must never retry on the caller's behalf.
#[async_trait]
pub trait BulkGateway: Send + Sync {
    /// Execute an ordered batch of operations against the target index.
    ///
    /// Operations must be applied in the order given; no reordering across
    /// action kinds.
    ///
    /// # Arguments
    ///
    /// * `index` - The target index (collection) name
    /// * `operations` - The ordered operations to execute
    ///
    /// # Returns
    ///
    /// * `Ok(BulkReport)` - Every operation succeeded
    /// * `Err(GatewayError::ItemFailures)` - One or more operations failed;
    ///   the failure description lists each failed operation and why
    /// * `Err(GatewayError)` - The submission failed as a whole
    async fn execute(
        &self,
        index: &str,
        operations: &[BulkOperation],
    ) -> Result<BulkReport, GatewayError>;
}
