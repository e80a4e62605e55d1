// This is the document service - it turns Markdown into remote document edits.
// It knows nothing about HTTP or MCP: the gateway does the I/O and the tool
// layer does the request/response translation.

use super::document_gateway::DocumentGateway;
use super::document_models::{
    DocsError, DocumentRequest, MarkdownPreview, MarkdownWriteOutcome, BODY_START_INDEX,
};
use crate::core::markdown::{compile, compile_markdown, parse, render_markdown, OperationBatch};

/// Extracts the document ID from a Google Docs URL, or accepts a bare ID.
pub fn extract_document_id(url_or_id: &str) -> Option<String> {
    let url_or_id = url_or_id.trim();
    if url_or_id.contains("docs.google.com") {
        let start = url_or_id.find("/document/d/")?;
        let after_d = &url_or_id[start + "/document/d/".len()..];
        let end = after_d.find(&['/', '?', '#'][..]).unwrap_or(after_d.len());
        let id = &after_d[..end];
        if !id.is_empty() {
            return Some(id.to_string());
        }
    } else if !url_or_id.is_empty() && !url_or_id.contains('/') && !url_or_id.contains(' ') {
        return Some(url_or_id.to_string());
    }
    None
}

/// Reports every blank or whitespace-only parameter at once.
pub fn validate_required(params: &[(&str, &str)]) -> Result<(), DocsError> {
    let missing: Vec<String> = params
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DocsError::MissingParameters(missing))
    }
}

fn resolve_document_id(document: &str) -> Result<String, DocsError> {
    extract_document_id(document).ok_or_else(|| {
        DocsError::InvalidArgument(format!("Could not extract document ID from: {}", document))
    })
}

pub struct DocumentService<G: DocumentGateway> {
    gateway: G,
}

impl<G: DocumentGateway> DocumentService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Creates a new document and fills it with the compiled Markdown.
    pub async fn create_document_from_markdown(
        &self,
        title: &str,
        markdown: &str,
    ) -> Result<MarkdownWriteOutcome, DocsError> {
        validate_required(&[("title", title), ("markdown_text", markdown)])?;

        // Compile first so a bad input never leaves an empty document behind.
        let batch = compile_markdown(markdown, BODY_START_INDEX)?;
        let metadata = self.gateway.create_document(title.trim()).await?;

        tracing::info!(
            document_id = %metadata.document_id,
            operations = batch.len(),
            "Created document from markdown"
        );

        let requests = into_requests(batch);
        let request_count = requests.len();
        let replies = self.submit(&metadata.document_id, requests).await?;

        Ok(MarkdownWriteOutcome {
            document_id: metadata.document_id,
            title: Some(metadata.title),
            revision_id: metadata.revision_id,
            request_count,
            replies,
        })
    }

    /// Replaces the whole body of an existing document with the compiled Markdown.
    /// The deletion and the new content go out in the same batch.
    pub async fn replace_document_markdown(
        &self,
        document: &str,
        markdown: &str,
    ) -> Result<MarkdownWriteOutcome, DocsError> {
        validate_required(&[("document_id", document), ("new_markdown_text", markdown)])?;
        let document_id = resolve_document_id(document)?;

        let batch = compile_markdown(markdown, BODY_START_INDEX)?;
        let snapshot = self.gateway.get_document(&document_id).await?;

        let mut requests = Vec::with_capacity(batch.len() + 1);
        if let Some(range) = snapshot.clearable_range() {
            tracing::debug!(document_id = %document_id, %range, "Clearing existing body");
            requests.push(DocumentRequest::DeleteContentRange { range });
        }
        requests.extend(into_requests(batch));

        let request_count = requests.len();
        let replies = self.submit(&document_id, requests).await?;

        tracing::info!(
            document_id = %document_id,
            requests = request_count,
            "Replaced document body with markdown"
        );

        Ok(MarkdownWriteOutcome {
            document_id,
            title: Some(snapshot.title),
            revision_id: snapshot.revision_id,
            request_count,
            replies,
        })
    }

    /// Inserts compiled Markdown at `start_index`, or appends it to the end of
    /// the body when no index is given. Appended blocks always start a new
    /// paragraph; the existing last paragraph keeps its text and style.
    pub async fn insert_markdown(
        &self,
        document: &str,
        markdown: &str,
        start_index: Option<i64>,
    ) -> Result<MarkdownWriteOutcome, DocsError> {
        validate_required(&[("document_id", document), ("markdown_text", markdown)])?;
        let document_id = resolve_document_id(document)?;

        let (start, paragraph_break) = match start_index {
            Some(index) => (index, None),
            None => {
                let snapshot = self.gateway.get_document(&document_id).await?;
                (snapshot.append_index() as i64, snapshot.paragraph_break())
            }
        };

        let batch = compile_markdown(markdown, start)?;
        let mut requests = Vec::with_capacity(batch.len() + 1);
        if !batch.is_empty() {
            requests.extend(paragraph_break.map(DocumentRequest::from));
        }
        requests.extend(into_requests(batch));
        let request_count = requests.len();
        let replies = self.submit(&document_id, requests).await?;

        tracing::info!(
            document_id = %document_id,
            start_index = start,
            requests = request_count,
            "Inserted markdown"
        );

        Ok(MarkdownWriteOutcome {
            document_id,
            title: None,
            revision_id: None,
            request_count,
            replies,
        })
    }

    /// Compiles Markdown without touching any document. Alongside the
    /// operations it returns the normalized Markdown and the exact batch body
    /// the gateway would send.
    pub fn preview_markdown(
        &self,
        markdown: &str,
        start_index: Option<i64>,
    ) -> Result<MarkdownPreview, DocsError> {
        let blocks = parse(markdown);
        let operations = compile(&blocks, start_index.unwrap_or(BODY_START_INDEX))?;
        let requests: Vec<DocumentRequest> =
            operations.iter().cloned().map(DocumentRequest::from).collect();
        let batch_update = self.gateway.batch_update_body(&requests)?;

        Ok(MarkdownPreview {
            normalized_markdown: render_markdown(&blocks),
            operations,
            batch_update,
        })
    }

    async fn submit(
        &self,
        document_id: &str,
        requests: Vec<DocumentRequest>,
    ) -> Result<Vec<serde_json::Value>, DocsError> {
        if requests.is_empty() {
            tracing::debug!(document_id = %document_id, "Nothing to submit");
            return Ok(Vec::new());
        }
        let result = self.gateway.batch_update(document_id, &requests).await?;
        tracing::debug!(
            document_id = %result.document_id,
            replies = result.replies.len(),
            "Batch update applied"
        );
        Ok(result.replies)
    }
}

fn into_requests(batch: OperationBatch) -> Vec<DocumentRequest> {
    batch.into_iter().map(DocumentRequest::from).collect()
}
