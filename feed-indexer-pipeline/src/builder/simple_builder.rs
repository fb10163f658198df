//! Single-document builder.

use std::io::Read;

use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::builder::{DocumentBuilder, DocumentStream};
use crate::errors::PipelineError;
use feed_indexer_shared::{IndexDocument, Metadata};

/// Wraps the entire input as one document.
///
/// The unique id is supplied externally (the enclosing message's id). The
/// content carries the raw payload under `content`, the message metadata
/// under `metadata` (keys containing `.` are dropped since the backend
/// treats dots as path separators), and a `date` field with epoch
/// milliseconds at build time.
#[derive(Debug, Clone)]
pub struct SimpleDocumentBuilder {
    unique_id: String,
    metadata: Metadata,
}

impl SimpleDocumentBuilder {
    /// Create a builder producing documents under the given id.
    pub fn new(unique_id: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
            metadata: Metadata::new(),
        }
    }

    /// Attach message metadata to be embedded in the document.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    fn metadata_value(&self) -> Value {
        let mut entries: Vec<(&String, &String)> = self
            .metadata
            .iter()
            .filter(|(key, _)| !key.contains('.'))
            .collect();
        // Deterministic ordering for an otherwise unordered map.
        entries.sort_by_key(|(key, _)| key.as_str());

        let mut map = Map::new();
        for (key, value) in entries {
            map.insert(key.clone(), Value::String(value.clone()));
        }
        Value::Object(map)
    }
}

impl DocumentBuilder for SimpleDocumentBuilder {
    fn build(&self, mut input: Box<dyn Read + Send>) -> Result<DocumentStream, PipelineError> {
        let mut payload = String::new();
        input.read_to_string(&mut payload)?;

        let mut content = Map::new();
        content.insert("content".to_string(), Value::String(payload));
        content.insert("metadata".to_string(), self.metadata_value());
        content.insert("date".to_string(), json!(Utc::now().timestamp_millis()));

        let document = IndexDocument::new(self.unique_id.clone(), content);
        Ok(Box::new(std::iter::once(Ok(document))))
    }
}
