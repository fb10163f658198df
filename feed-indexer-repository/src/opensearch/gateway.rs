//! OpenSearch gateway implementation.
//!
//! This module provides the concrete implementation of `BulkGateway` using
//! the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    BulkParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::errors::GatewayError;
use crate::interfaces::BulkGateway;
use crate::types::{BulkItemFailure, BulkOperation, BulkReport};
use feed_indexer_shared::DocumentAction;

/// OpenSearch gateway implementation.
///
/// Submits batches through the `_bulk` endpoint: one action line per
/// operation, followed by a body line for index and update operations.
///
/// # Example
///
/// ```ignore
/// let gateway = OpenSearchGateway::new("http://localhost:9200")?;
/// let report = gateway.execute("products", &operations).await?;
/// ```
pub struct OpenSearchGateway {
    client: OpenSearch,
}

impl OpenSearchGateway {
    /// Create a new gateway connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchGateway)` - A new gateway instance
    /// * `Err(GatewayError)` - If connection setup fails
    pub fn new(url: &str) -> Result<Self, GatewayError> {
        let parsed_url = Url::parse(url).map_err(|e| GatewayError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| GatewayError::connection(e.to_string()))?;

        info!(url = %url, "Created OpenSearch gateway");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Render the ndjson request body for a batch of operations.
    fn build_body(operations: &[BulkOperation]) -> Result<Vec<JsonBody<Value>>, GatewayError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(operations.len() * 2);

        for op in operations {
            match op.action {
                DocumentAction::Index => {
                    body.push(json!({"index": {"_id": op.unique_id.as_str()}}).into());
                    body.push(Value::Object(op.content.clone().ok_or_else(|| {
                        GatewayError::serialization(format!(
                            "index operation for {} has no body",
                            op.unique_id
                        ))
                    })?)
                    .into());
                }
                DocumentAction::Update => {
                    body.push(json!({"update": {"_id": op.unique_id.as_str()}}).into());
                    let doc = op.content.clone().ok_or_else(|| {
                        GatewayError::serialization(format!(
                            "update operation for {} has no body",
                            op.unique_id
                        ))
                    })?;
                    body.push(json!({ "doc": doc }).into());
                }
                DocumentAction::Delete => {
                    body.push(json!({"delete": {"_id": op.unique_id.as_str()}}).into());
                }
            }
        }

        Ok(body)
    }

    /// Collect per-item failures from a bulk response body.
    fn collect_failures(
        operations: &[BulkOperation],
        response: &Value,
    ) -> Vec<BulkItemFailure> {
        let items = match response["items"].as_array() {
            Some(items) => items,
            None => return Vec::new(),
        };

        let mut failures = Vec::new();
        for (position, item) in items.iter().enumerate() {
            // Each item is keyed by the operation verb it echoes back.
            let result = item
                .as_object()
                .and_then(|obj| obj.values().next())
                .cloned()
                .unwrap_or(Value::Null);

            if result["error"].is_null() {
                continue;
            }

            let action = operations
                .get(position)
                .map(|op| op.action)
                .unwrap_or(DocumentAction::Index);
            let unique_id = result["_id"]
                .as_str()
                .map(str::to_string)
                .or_else(|| operations.get(position).map(|op| op.unique_id.clone()))
                .unwrap_or_default();
            let reason = result["error"]["reason"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| result["error"].to_string());

            failures.push(BulkItemFailure {
                position,
                unique_id,
                action,
                status: result["status"].as_u64().unwrap_or(0) as u16,
                reason,
            });
        }

        failures
    }
}

#[async_trait]
impl BulkGateway for OpenSearchGateway {
    #[instrument(skip(self, operations), fields(index = %index, operation_count = operations.len()))]
    async fn execute(
        &self,
        index: &str,
        operations: &[BulkOperation],
    ) -> Result<BulkReport, GatewayError> {
        let body = Self::build_body(operations)?;

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| GatewayError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(GatewayError::response(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::response(e.to_string()))?;

        if response_body["errors"].as_bool().unwrap_or(false) {
            let failures = Self::collect_failures(operations, &response_body);
            error!(
                failed = failures.len(),
                total = operations.len(),
                "Bulk submission had item failures"
            );
            return Err(GatewayError::ItemFailures(failures));
        }

        let took_ms = response_body["took"].as_u64();
        debug!(operation_count = operations.len(), took_ms = ?took_ms, "Bulk batch acknowledged");

        Ok(BulkReport {
            operations: operations.len(),
            took_ms,
        })
    }
}
