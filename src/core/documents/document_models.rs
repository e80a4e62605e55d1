// Document domain models - what the core layer knows about a remote document.
//
// No HTTP types here. The infra layer maps the Google Docs JSON onto these.

use serde::Serialize;
use thiserror::Error;

use crate::core::markdown::{CompileError, EditOperation, IndexRange, OperationBatch};

/// Index of the first character of a document body.
pub const BODY_START_INDEX: i64 = 1;

/// Everything that can go wrong while turning Markdown into a remote document.
///
/// Gateway errors are passed through untouched so callers see exactly what
/// the remote service reported.
#[derive(Debug, Error)]
pub enum DocsError {
    #[error("Missing required parameter(s): {}", .0.join(", "))]
    MissingParameters(Vec<String>),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Google Docs request failed: {0}")]
    Transport(String),
    #[error("Google Docs API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Unexpected Google Docs response: {0}")]
    Decode(String),
    #[error("Could not encode Google Docs request: {0}")]
    Encode(String),
}

/// Metadata returned when a document is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub document_id: String,
    pub title: String,
    pub revision_id: Option<String>,
}

/// The parts of a fetched document the service needs to address its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub document_id: String,
    pub title: String,
    pub revision_id: Option<String>,
    /// End index of the last structural element in the body.
    pub end_index: usize,
}

impl DocumentSnapshot {
    /// Paragraph break that has to go in before appending so the first new
    /// block starts its own paragraph. An empty body needs none.
    pub fn paragraph_break(&self) -> Option<EditOperation> {
        self.clearable_range().map(|range| EditOperation::InsertText {
            at: range.end,
            text: "\n".to_string(),
        })
    }

    /// Where appended blocks start, after any paragraph break.
    pub fn append_index(&self) -> usize {
        match self.clearable_range() {
            Some(_) => self.end_index,
            None => BODY_START_INDEX as usize,
        }
    }

    /// The deletable body content. The final newline can never be removed, so
    /// an empty document has nothing to clear.
    pub fn clearable_range(&self) -> Option<IndexRange> {
        let start = BODY_START_INDEX as usize;
        let end = self.end_index.saturating_sub(1);
        (end > start).then(|| IndexRange::new(start, end))
    }
}

/// One entry of a batch submitted to the document service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentRequest {
    DeleteContentRange { range: IndexRange },
    Edit(EditOperation),
}

impl From<EditOperation> for DocumentRequest {
    fn from(operation: EditOperation) -> Self {
        DocumentRequest::Edit(operation)
    }
}

/// What the service sent back for a batch update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchUpdateResult {
    pub document_id: String,
    pub replies: Vec<serde_json::Value>,
}

/// Markdown compiled without touching a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownPreview {
    /// The input as it reads back after parsing.
    pub normalized_markdown: String,
    pub operations: OperationBatch,
    /// Exactly what a batch update would send.
    pub batch_update: serde_json::Value,
}

/// Result of a Markdown write, shaped for the tool response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownWriteOutcome {
    pub document_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<String>,
    pub request_count: usize,
    pub replies: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(end_index: usize) -> DocumentSnapshot {
        DocumentSnapshot {
            document_id: "doc".to_string(),
            title: "Doc".to_string(),
            revision_id: None,
            end_index,
        }
    }

    #[test]
    fn test_empty_document_has_nothing_to_clear() {
        let empty = snapshot(2);
        assert_eq!(empty.clearable_range(), None);
        assert_eq!(empty.paragraph_break(), None);
        assert_eq!(empty.append_index(), 1);
    }

    #[test]
    fn test_clearable_range_keeps_final_newline() {
        let doc = snapshot(20);
        assert_eq!(doc.clearable_range(), Some(IndexRange::new(1, 19)));
    }

    #[test]
    fn test_append_starts_a_new_paragraph_after_existing_text() {
        let doc = snapshot(20);
        assert_eq!(
            doc.paragraph_break(),
            Some(EditOperation::InsertText {
                at: 19,
                text: "\n".to_string()
            })
        );
        assert_eq!(doc.append_index(), 20);
    }

    #[test]
    fn test_missing_parameters_message_lists_every_name() {
        let err = DocsError::MissingParameters(vec!["title".into(), "markdown_text".into()]);
        assert_eq!(
            err.to_string(),
            "Missing required parameter(s): title, markdown_text"
        );
    }
}
