//! # Feed Indexer Shared
//!
//! Shared data types for the feed indexer system. These types are consumed
//! by both the ingestion pipeline and the backend repository crates.

mod action;
mod document;

pub use action::DocumentAction;
pub use document::{GeoPoint, IndexDocument, Metadata};
