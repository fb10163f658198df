//! # Feed Indexer Pipeline
//!
//! This crate provides the ingestion path that turns delimited input records
//! into bulk indexing operations against a search backend.
//!
//! ## Architecture
//!
//! The pipeline follows the Builder-Extractor-Batcher pattern:
//!
//! 1. **Builder**: Parses an input stream into a lazy sequence of documents
//! 2. **Extractor**: Resolves the operation kind for each document
//! 3. **Batcher**: Groups operations into bounded batches and submits them
//!    through the backend gateway
//!
//! Evaluation is pull-based and sequential: documents are consumed lazily by
//! the batcher and the only blocking point is batch submission.

pub mod action;
pub mod batcher;
pub mod builder;
pub mod errors;

pub use errors::PipelineError;
