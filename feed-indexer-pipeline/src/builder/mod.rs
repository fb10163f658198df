//! Builder module for the feed indexer pipeline.
//!
//! Document builders turn one readable input stream into a lazy, finite,
//! single-pass sequence of documents.

mod csv_builder;
mod field_name;
mod geopoint_builder;
mod simple_builder;

pub use csv_builder::{CsvDocumentBuilder, CsvFormat};
pub use field_name::FieldNameMapper;
pub use geopoint_builder::CsvGeoPointBuilder;
pub use simple_builder::SimpleDocumentBuilder;

use std::io::Read;

use crate::errors::PipelineError;
use feed_indexer_shared::IndexDocument;

/// A lazy, finite, single-pass sequence of documents.
///
/// The iterator owns the underlying reader, so dropping it releases the
/// input resource on every exit path (success, early termination, or error).
/// A record-level failure surfaces as an `Err` item and terminates the
/// sequence; there are no partial or skip semantics.
///
/// The stream is `Send` so that processing futures holding one can run on a
/// multi-threaded runtime.
pub type DocumentStream = Box<dyn Iterator<Item = Result<IndexDocument, PipelineError>> + Send>;

/// Produces a document sequence from one input stream.
///
/// A builder is restartable only by invoking [`build`](Self::build) again on
/// a fresh input stream, never mid-iteration.
pub trait DocumentBuilder {
    /// Build a lazy document sequence over the given input.
    ///
    /// # Arguments
    ///
    /// * `input` - The readable character stream containing the records
    ///
    /// # Returns
    ///
    /// * `Ok(DocumentStream)` - The document sequence
    /// * `Err(PipelineError)` - If the stream cannot be opened or the header
    ///   record cannot be parsed
    fn build(&self, input: Box<dyn Read + Send>) -> Result<DocumentStream, PipelineError>;
}
