//! Remapping action extractor.

use std::collections::HashMap;

use crate::action::ActionExtractor;
use crate::errors::PipelineError;
use feed_indexer_shared::{IndexDocument, Metadata};

/// Delegates to an inner extractor, then substitutes the returned label via
/// a static mapping. Unmapped labels pass through unchanged.
pub struct MappedAction {
    inner: Box<dyn ActionExtractor>,
    mappings: HashMap<String, String>,
}

impl MappedAction {
    pub fn new(inner: Box<dyn ActionExtractor>, mappings: HashMap<String, String>) -> Self {
        Self { inner, mappings }
    }
}

impl ActionExtractor for MappedAction {
    fn extract(
        &self,
        metadata: &Metadata,
        document: &IndexDocument,
    ) -> Result<Option<String>, PipelineError> {
        let label = self.inner.extract(metadata, document)?;
        Ok(label.map(|label| match self.mappings.get(&label) {
            Some(mapped) => mapped.clone(),
            None => label,
        }))
    }
}
