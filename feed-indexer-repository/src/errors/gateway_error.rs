//! Gateway error types.
//!
//! This module defines the error types that can occur while submitting bulk
//! operations to the search backend.

use thiserror::Error;

use crate::types::BulkItemFailure;

/// Errors that can occur during bulk gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Failed to establish a connection to the search backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to serialize operations for the backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The backend rejected the request as a whole, or returned a response
    /// that could not be interpreted.
    #[error("Response error: {0}")]
    ResponseError(String),

    /// One or more operations within a bulk submission failed. Every failed
    /// item is carried verbatim.
    #[error("Bulk submission had {} failed operation(s): {}", .0.len(), format_failures(.0))]
    ItemFailures(Vec<BulkItemFailure>),
}

impl GatewayError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a response error.
    pub fn response(msg: impl Into<String>) -> Self {
        Self::ResponseError(msg.into())
    }
}

fn format_failures(failures: &[BulkItemFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
