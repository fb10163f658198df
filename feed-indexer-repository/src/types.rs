//! Request and response types for bulk gateway operations.

use serde_json::{Map, Value};
use std::fmt;

use feed_indexer_shared::DocumentAction;

/// One pending operation in a bulk submission.
///
/// Operations are built by the batching stage and handed to the gateway in
/// input order. Delete operations carry no body.
#[derive(Debug, Clone)]
pub struct BulkOperation {
    /// The operation kind.
    pub action: DocumentAction,
    /// Backend document id.
    pub unique_id: String,
    /// The serialized body; `None` for deletes.
    pub content: Option<Map<String, Value>>,
}

impl BulkOperation {
    /// Build an operation from a resolved action and document parts.
    ///
    /// The body is dropped for deletes since the backend identifies the
    /// document by id alone.
    pub fn new(action: DocumentAction, unique_id: String, content: Map<String, Value>) -> Self {
        let content = match action {
            DocumentAction::Delete => None,
            _ => Some(content),
        };
        Self {
            action,
            unique_id,
            content,
        }
    }
}

/// Outcome of a fully successful bulk submission.
#[derive(Debug, Clone)]
pub struct BulkReport {
    /// Number of operations the backend acknowledged.
    pub operations: usize,
    /// Backend-reported processing time, when available.
    pub took_ms: Option<u64>,
}

/// Failure description for a single operation within a bulk submission.
///
/// These are surfaced to the caller verbatim; the gateway never summarizes
/// or retries failed items.
#[derive(Debug, Clone)]
pub struct BulkItemFailure {
    /// Zero-based position of the operation within the submitted batch.
    pub position: usize,
    /// Document id of the failed operation.
    pub unique_id: String,
    /// The operation kind that failed.
    pub action: DocumentAction,
    /// HTTP status the backend reported for the item.
    pub status: u16,
    /// Backend-provided reason.
    pub reason: String,
}

impl fmt::Display for BulkItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} id={} status={}: {}",
            self.position, self.action, self.unique_id, self.status, self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delete_operation_drops_body() {
        let mut content = Map::new();
        content.insert("val".to_string(), json!("1"));

        let op = BulkOperation::new(DocumentAction::Delete, "id-1".to_string(), content.clone());
        assert!(op.content.is_none());

        let op = BulkOperation::new(DocumentAction::Index, "id-1".to_string(), content.clone());
        assert_eq!(op.content, Some(content.clone()));

        let op = BulkOperation::new(DocumentAction::Update, "id-1".to_string(), content.clone());
        assert_eq!(op.content, Some(content));
    }

    #[test]
    fn test_item_failure_display_carries_context() {
        let failure = BulkItemFailure {
            position: 3,
            unique_id: "UID-4".to_string(),
            action: DocumentAction::Update,
            status: 404,
            reason: "document missing".to_string(),
        };
        let rendered = failure.to_string();
        assert!(rendered.contains("UID-4"));
        assert!(rendered.contains("UPDATE"));
        assert!(rendered.contains("404"));
        assert!(rendered.contains("document missing"));
    }
}
