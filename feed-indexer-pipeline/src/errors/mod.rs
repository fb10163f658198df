//! Error types for the feed indexer pipeline.

use feed_indexer_repository::GatewayError;
use thiserror::Error;

/// Errors that can occur in the feed indexer pipeline.
///
/// There are no internal retries anywhere in the pipeline: every failure is
/// wrapped with enough context to diagnose (document id, batch position) and
/// re-raised to the caller.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Malformed input record; aborts the whole build.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The configured unique-id field position exceeds the record's field
    /// count.
    #[error("unique-id field {index} out of range for record with {fields} field(s)")]
    FieldIndexOutOfRange { index: usize, fields: usize },

    /// An action label outside `INDEX`/`UPDATE`/`DELETE`; aborts the batch
    /// containing it.
    #[error("Unrecognized action '{label}' for document {unique_id}")]
    UnrecognizedAction { unique_id: String, label: String },

    /// Underlying query or lookup failure while resolving a document's
    /// action.
    #[error("Action extraction failed for document {unique_id}: {reason}")]
    ActionExtractionFailure { unique_id: String, reason: String },

    /// The backend reported one or more failed operations in a batch. The
    /// gateway's failure description is carried verbatim.
    #[error("Submission of batch {batch} ({operations} operation(s)) failed: {source}")]
    SubmissionFailure {
        batch: usize,
        operations: usize,
        #[source]
        source: GatewayError,
    },

    /// Error reading the input stream.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an unrecognized-action error.
    pub fn unrecognized_action(unique_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::UnrecognizedAction {
            unique_id: unique_id.into(),
            label: label.into(),
        }
    }

    /// Create an action-extraction error.
    pub fn action_extraction(unique_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ActionExtractionFailure {
            unique_id: unique_id.into(),
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}
