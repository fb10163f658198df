//! JSONPath action extractor.

use std::str::FromStr;

use jsonpath_rust::{JsonPath, JsonPathValue};
use serde_json::Value;

use crate::action::ActionExtractor;
use crate::errors::PipelineError;
use feed_indexer_shared::{IndexDocument, Metadata};

/// Evaluates a JSONPath query against the document content and returns the
/// matched scalar as the action label.
///
/// Unlike metadata lookup, a missing path is an extraction error rather than
/// a silent default: a document routed through this extractor is expected to
/// carry its action in-band.
pub struct JsonPathAction {
    path: JsonPath,
    raw_path: String,
}

impl JsonPathAction {
    /// Compile an extractor for the given query path.
    pub fn new(path: &str) -> Result<Self, PipelineError> {
        let compiled = JsonPath::from_str(path)
            .map_err(|e| PipelineError::parse(format!("invalid JSONPath '{}': {}", path, e)))?;
        Ok(Self {
            path: compiled,
            raw_path: path.to_string(),
        })
    }
}

impl Default for JsonPathAction {
    fn default() -> Self {
        // The default path is a constant, so compilation cannot fail.
        Self::new("$.action").unwrap()
    }
}

impl ActionExtractor for JsonPathAction {
    fn extract(
        &self,
        _metadata: &Metadata,
        document: &IndexDocument,
    ) -> Result<Option<String>, PipelineError> {
        let content = Value::Object(document.content.clone());
        let matched = self
            .path
            .find_slice(&content)
            .into_iter()
            .find_map(|entry| match entry {
                JsonPathValue::Slice(value, _) => Some(value.clone()),
                JsonPathValue::NewValue(value) => Some(value),
                JsonPathValue::NoValue => None,
            });

        match matched {
            Some(Value::String(label)) => Ok(Some(label)),
            Some(other) => Err(PipelineError::action_extraction(
                &document.unique_id,
                format!("path '{}' matched a non-string value: {}", self.raw_path, other),
            )),
            None => Err(PipelineError::action_extraction(
                &document.unique_id,
                format!("no match for path '{}'", self.raw_path),
            )),
        }
    }
}
