//! Error types for gateway operations.

mod gateway_error;

pub use gateway_error::GatewayError;
