//! Builder-assigned action extractor.

use crate::action::ActionExtractor;
use crate::errors::PipelineError;
use feed_indexer_shared::{IndexDocument, Metadata};

/// Returns the action the document builder already assigned.
///
/// Used with the delta-status CSV builders, where the action is resolved
/// from a status column at build time; no further lookup is needed per
/// document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaStatusAction;

impl DeltaStatusAction {
    pub fn new() -> Self {
        Self
    }
}

impl ActionExtractor for DeltaStatusAction {
    fn extract(
        &self,
        _metadata: &Metadata,
        document: &IndexDocument,
    ) -> Result<Option<String>, PipelineError> {
        Ok(Some(document.action.as_label().to_string()))
    }
}
