//! Document types produced by the ingestion pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::action::DocumentAction;

/// Out-of-band key/value context associated with the unit of work being
/// ingested (the enclosing message's metadata).
pub type Metadata = HashMap<String, String>;

/// A two-component coordinate derived from separate latitude/longitude
/// columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Render as the `{"lat": .., "lon": ..}` object the backend expects.
    pub fn to_value(&self) -> Value {
        serde_json::json!({ "lat": self.lat, "lon": self.lon })
    }
}

/// One unit of work derived from one input record.
///
/// Documents are created once by a document builder, consumed exactly once by
/// the batching stage, and never mutated in between. Builders that learn the
/// action from the record itself (delta-status columns) assign it at
/// construction; everything else defaults to [`DocumentAction::Index`].
#[derive(Debug, Clone)]
pub struct IndexDocument {
    /// Unique identifier, non-empty. Uniqueness is the caller's
    /// responsibility; duplicates silently overwrite in the backend.
    pub unique_id: String,
    /// The operation to apply when this document reaches the backend.
    pub action: DocumentAction,
    /// Ordered field-name to value mapping forming the serialized body.
    pub content: Map<String, Value>,
}

impl IndexDocument {
    /// Create a document with the default `Index` action.
    pub fn new(unique_id: impl Into<String>, content: Map<String, Value>) -> Self {
        Self {
            unique_id: unique_id.into(),
            action: DocumentAction::Index,
            content,
        }
    }

    /// Create a document with an explicit action.
    pub fn with_action(
        unique_id: impl Into<String>,
        action: DocumentAction,
        content: Map<String, Value>,
    ) -> Self {
        Self {
            unique_id: unique_id.into(),
            action,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_action_is_index() {
        let doc = IndexDocument::new("id-1", Map::new());
        assert_eq!(doc.action, DocumentAction::Index);
    }

    #[test]
    fn test_geo_point_value_shape() {
        let point = GeoPoint::new(53.379, -0.183);
        let value = point.to_value();
        assert_eq!(value, json!({"lat": 53.379, "lon": -0.183}));
    }

    #[test]
    fn test_content_preserves_field_order() {
        let mut content = Map::new();
        content.insert("zeta".to_string(), json!("1"));
        content.insert("alpha".to_string(), json!("2"));
        let doc = IndexDocument::new("id-1", content);
        let keys: Vec<&String> = doc.content.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
