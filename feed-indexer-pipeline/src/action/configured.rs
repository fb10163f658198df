//! Fixed-action extractor.

use crate::action::ActionExtractor;
use crate::errors::PipelineError;
use feed_indexer_shared::{DocumentAction, IndexDocument, Metadata};

/// Always returns one configured action, ignoring the document.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredAction {
    action: DocumentAction,
}

impl ConfiguredAction {
    pub fn new(action: DocumentAction) -> Self {
        Self { action }
    }
}

impl Default for ConfiguredAction {
    fn default() -> Self {
        Self::new(DocumentAction::Index)
    }
}

impl ActionExtractor for ConfiguredAction {
    fn extract(
        &self,
        _metadata: &Metadata,
        _document: &IndexDocument,
    ) -> Result<Option<String>, PipelineError> {
        Ok(Some(self.action.as_label().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn test_returns_configured_action() {
        let extractor = ConfiguredAction::new(DocumentAction::Delete);
        let doc = IndexDocument::new("id-1", Map::new());
        let label = extractor.extract(&Metadata::new(), &doc).unwrap();
        assert_eq!(label.as_deref(), Some("DELETE"));
    }

    #[test]
    fn test_default_is_index() {
        let extractor = ConfiguredAction::default();
        let doc = IndexDocument::new("id-1", Map::new());
        let label = extractor.extract(&Metadata::new(), &doc).unwrap();
        assert_eq!(label.as_deref(), Some("INDEX"));
    }
}
