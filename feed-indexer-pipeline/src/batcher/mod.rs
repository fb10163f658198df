//! Batcher module for the feed indexer pipeline.
//!
//! Accumulates resolved operations into bounded batches and submits them
//! through the backend gateway.

use std::sync::Arc;

use tracing::{debug, error, instrument};

use crate::action::ActionExtractor;
use crate::builder::DocumentStream;
use crate::errors::PipelineError;
use feed_indexer_repository::{BulkGateway, BulkOperation};
use feed_indexer_shared::{DocumentAction, IndexDocument, Metadata};

const DEFAULT_BATCH_WINDOW: usize = 10_000;

/// Outcome of a fully successful `process` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkSummary {
    /// Number of documents consumed from the stream.
    pub documents: usize,
    /// Number of batches submitted to the gateway.
    pub batches: usize,
}

/// Consumes a document stream, resolves each document's action, and submits
/// operations in size-bounded batches.
///
/// Submission is sequential and fail-fast: batches go out in document order,
/// the batcher never retries or partially resubmits, and any gateway failure
/// aborts the remaining stream immediately. For `M` documents and a window
/// of `W`, the gateway receives `ceil(M / W)` batches; a window of `0`
/// flushes after every document.
pub struct BulkBatcher {
    gateway: Arc<dyn BulkGateway>,
    index: String,
    batch_window: usize,
}

impl BulkBatcher {
    /// Create a batcher with the default window of 10000 operations.
    pub fn new(gateway: Arc<dyn BulkGateway>, index: impl Into<String>) -> Self {
        Self {
            gateway,
            index: index.into(),
            batch_window: DEFAULT_BATCH_WINDOW,
        }
    }

    /// Override the batch window.
    pub fn with_batch_window(mut self, batch_window: usize) -> Self {
        self.batch_window = batch_window;
        self
    }

    /// Process a document stream to completion.
    ///
    /// Documents are consumed lazily and in order; the only blocking point
    /// is batch submission, which is awaited before the next document is
    /// pulled.
    ///
    /// # Arguments
    ///
    /// * `documents` - The document sequence to consume
    /// * `extractor` - Resolves the action label per document
    /// * `metadata` - Out-of-band context for metadata-based extraction
    ///
    /// # Returns
    ///
    /// * `Ok(BulkSummary)` - Every batch was acknowledged
    /// * `Err(PipelineError)` - A build, extraction, or submission failure;
    ///   documents after the failure are never consumed
    #[instrument(skip(self, documents, extractor, metadata), fields(index = %self.index, batch_window = self.batch_window))]
    pub async fn process(
        &self,
        documents: DocumentStream,
        extractor: &dyn ActionExtractor,
        metadata: &Metadata,
    ) -> Result<BulkSummary, PipelineError> {
        let mut batch: Vec<BulkOperation> = Vec::new();
        let mut summary = BulkSummary {
            documents: 0,
            batches: 0,
        };

        for item in documents {
            let document = item?;
            let action = self.resolve_action(extractor, metadata, &document)?;
            batch.push(BulkOperation::new(
                action,
                document.unique_id,
                document.content,
            ));
            summary.documents += 1;

            if batch.len() >= self.batch_window {
                self.submit(&mut batch, &mut summary).await?;
            }
        }

        if !batch.is_empty() {
            self.submit(&mut batch, &mut summary).await?;
        }

        debug!(
            documents = summary.documents,
            batches = summary.batches,
            "Document stream processed"
        );
        Ok(summary)
    }

    fn resolve_action(
        &self,
        extractor: &dyn ActionExtractor,
        metadata: &Metadata,
        document: &IndexDocument,
    ) -> Result<DocumentAction, PipelineError> {
        match extractor.extract(metadata, document)? {
            // No opinion from the extractor: keep the document's own action.
            None => Ok(document.action),
            Some(label) => DocumentAction::parse_label(&label)
                .ok_or_else(|| PipelineError::unrecognized_action(&document.unique_id, &label)),
        }
    }

    /// Submit the current batch and reset it, regardless of outcome.
    async fn submit(
        &self,
        batch: &mut Vec<BulkOperation>,
        summary: &mut BulkSummary,
    ) -> Result<(), PipelineError> {
        let operations = std::mem::take(batch);
        let batch_number = summary.batches;
        summary.batches += 1;

        match self.gateway.execute(&self.index, &operations).await {
            Ok(report) => {
                debug!(
                    batch = batch_number,
                    operations = report.operations,
                    took_ms = ?report.took_ms,
                    "Batch acknowledged"
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    batch = batch_number,
                    operations = operations.len(),
                    error = %source,
                    "Batch submission failed"
                );
                Err(PipelineError::SubmissionFailure {
                    batch: batch_number,
                    operations: operations.len(),
                    source,
                })
            }
        }
    }
}
