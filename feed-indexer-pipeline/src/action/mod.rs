//! Action extraction module for the feed indexer pipeline.
//!
//! Action extractors resolve the operation kind for one document.

mod configured;
mod delta_status;
mod json_path;
mod mapped;
mod metadata;

pub use configured::ConfiguredAction;
pub use delta_status::DeltaStatusAction;
pub use json_path::JsonPathAction;
pub use mapped::MappedAction;
pub use metadata::MetadataAction;

use crate::errors::PipelineError;
use feed_indexer_shared::{IndexDocument, Metadata};

/// Resolves the action label for one document.
///
/// `Ok(None)` means the extractor has no opinion and the caller must keep
/// the document's current action (default `Index`). Returned labels are
/// validated downstream against the case-sensitive set
/// `{INDEX, UPDATE, DELETE}`.
pub trait ActionExtractor: Send + Sync {
    /// Extract the action label for a document.
    ///
    /// # Arguments
    ///
    /// * `metadata` - Out-of-band context of the enclosing unit of work
    /// * `document` - The document being resolved
    ///
    /// # Returns
    ///
    /// * `Ok(Some(label))` - The extracted label
    /// * `Ok(None)` - No opinion; use the document's current action
    /// * `Err(PipelineError)` - Extraction failed for this document
    fn extract(
        &self,
        metadata: &Metadata,
        document: &IndexDocument,
    ) -> Result<Option<String>, PipelineError>;
}
