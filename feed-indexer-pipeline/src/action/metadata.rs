//! Metadata-lookup action extractor.

use crate::action::ActionExtractor;
use crate::errors::PipelineError;
use feed_indexer_shared::{IndexDocument, Metadata};

/// Reads the action label from the metadata of the enclosing unit of work.
///
/// A missing key is a deliberate non-error: the extractor yields `Ok(None)`
/// and the caller falls back to the document's current action.
#[derive(Debug, Clone)]
pub struct MetadataAction {
    metadata_key: String,
}

impl MetadataAction {
    pub fn new(metadata_key: impl Into<String>) -> Self {
        Self {
            metadata_key: metadata_key.into(),
        }
    }
}

impl Default for MetadataAction {
    fn default() -> Self {
        Self::new("action")
    }
}

impl ActionExtractor for MetadataAction {
    fn extract(
        &self,
        metadata: &Metadata,
        _document: &IndexDocument,
    ) -> Result<Option<String>, PipelineError> {
        Ok(metadata.get(&self.metadata_key).cloned())
    }
}
