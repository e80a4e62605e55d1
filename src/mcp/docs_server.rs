// MCP tools for writing Markdown into Google Docs.
//
// **Notice the pattern:**
// 1. Deserialize the tool arguments
// 2. Call the core document service
// 3. Wrap the result in the `{ data, error, successful }` envelope
//
// This layer is THIN - no business logic, just translation.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::Serialize;
use serde_json::json;

use super::tool_models::{
    CreateDocumentMarkdownRequest, InsertMarkdownRequest, PreviewMarkdownRequest,
    UpdateDocumentMarkdownRequest,
};
use crate::core::documents::{DocsError, DocumentGateway, DocumentService};

pub type SharedDocumentService = Arc<DocumentService<Box<dyn DocumentGateway>>>;

/// Builds the tool response envelope shared by every tool.
fn envelope<T: Serialize>(tool: &str, result: Result<T, DocsError>) -> String {
    let value = match result {
        Ok(data) => json!({ "data": data, "error": "", "successful": true }),
        Err(err) => {
            tracing::warn!(tool = tool, error = %err, "Tool call failed");
            json!({ "data": {}, "error": err.to_string(), "successful": false })
        }
    };
    value.to_string()
}

/// MCP server exposing the Markdown-to-Docs tools.
#[derive(Clone)]
pub struct DocsMcpServer {
    service: SharedDocumentService,
    tool_router: ToolRouter<Self>,
}

impl DocsMcpServer {
    pub fn new(service: SharedDocumentService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl DocsMcpServer {
    #[tool(
        name = "GOOGLEDOCS_CREATE_DOCUMENT_MARKDOWN",
        description = "Create Document (Markdown). Creates a new Google Doc and fills it with the given markdown converted to formatted content (headings 1-3, paragraphs, bullet lists, bold, italic). Returns { data: {documentId, title, revisionId, requestCount, replies}, error, successful }."
    )]
    async fn create_document_markdown(
        &self,
        Parameters(req): Parameters<CreateDocumentMarkdownRequest>,
    ) -> String {
        let result = self
            .service
            .create_document_from_markdown(&req.title, &req.markdown_text)
            .await;
        envelope("GOOGLEDOCS_CREATE_DOCUMENT_MARKDOWN", result)
    }

    #[tool(
        name = "GOOGLEDOCS_UPDATE_DOCUMENT_MARKDOWN",
        description = "Update Document Markdown. Replaces the entire body of an existing Google Doc with the given markdown, converted to formatted content in one atomic batch. Requires edit permission. Returns { data: {documentId, title, revisionId, requestCount, replies}, error, successful }."
    )]
    async fn update_document_markdown(
        &self,
        Parameters(req): Parameters<UpdateDocumentMarkdownRequest>,
    ) -> String {
        let result = self
            .service
            .replace_document_markdown(&req.document_id, &req.new_markdown_text)
            .await;
        envelope("GOOGLEDOCS_UPDATE_DOCUMENT_MARKDOWN", result)
    }

    #[tool(
        name = "GOOGLEDOCS_INSERT_MARKDOWN",
        description = "Insert Markdown. Inserts formatted markdown into an existing Google Doc at start_index, or appends it to the end of the body when start_index is omitted. Returns { data: {documentId, requestCount, replies}, error, successful }."
    )]
    async fn insert_markdown(&self, Parameters(req): Parameters<InsertMarkdownRequest>) -> String {
        let result = self
            .service
            .insert_markdown(&req.document_id, &req.markdown_text, req.start_index)
            .await;
        envelope("GOOGLEDOCS_INSERT_MARKDOWN", result)
    }

    #[tool(
        name = "GOOGLEDOCS_PREVIEW_MARKDOWN_REQUESTS",
        description = "Preview Markdown Requests. Compiles markdown into the ordered edit operations and the Google Docs batchUpdate body without contacting Google. Returns { data: {normalizedMarkdown, operations, batchUpdate}, error, successful }."
    )]
    async fn preview_markdown_requests(
        &self,
        Parameters(req): Parameters<PreviewMarkdownRequest>,
    ) -> String {
        let result = self
            .service
            .preview_markdown(&req.markdown_text, req.start_index);
        envelope("GOOGLEDOCS_PREVIEW_MARKDOWN_REQUESTS", result)
    }
}

#[tool_handler]
impl ServerHandler for DocsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build()).with_instructions(
            "Google Docs markdown server. Converts markdown (headings, paragraphs, bullet lists, bold, italic) into Google Docs edits and applies them as one atomic batch.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::documents::{
        BatchUpdateResult, DocumentMetadata, DocumentRequest, DocumentSnapshot,
    };
    use async_trait::async_trait;
    use serde_json::Value;

    struct StubGateway;

    #[async_trait]
    impl DocumentGateway for StubGateway {
        async fn create_document(&self, title: &str) -> Result<DocumentMetadata, DocsError> {
            Ok(DocumentMetadata {
                document_id: "doc-1".to_string(),
                title: title.to_string(),
                revision_id: None,
            })
        }

        async fn get_document(&self, _: &str) -> Result<DocumentSnapshot, DocsError> {
            Err(DocsError::Api {
                status: 404,
                message: "Requested entity was not found.".to_string(),
            })
        }

        async fn batch_update(
            &self,
            document_id: &str,
            requests: &[DocumentRequest],
        ) -> Result<BatchUpdateResult, DocsError> {
            Ok(BatchUpdateResult {
                document_id: document_id.to_string(),
                replies: requests.iter().map(|_| json!({})).collect(),
            })
        }

        fn batch_update_body(&self, requests: &[DocumentRequest]) -> Result<Value, DocsError> {
            Ok(json!({ "requests": requests.len() }))
        }
    }

    fn server() -> DocsMcpServer {
        let gateway: Box<dyn DocumentGateway> = Box::new(StubGateway);
        DocsMcpServer::new(Arc::new(DocumentService::new(gateway)))
    }

    fn parse_envelope(response: String) -> Value {
        serde_json::from_str(&response).unwrap()
    }

    #[tokio::test]
    async fn test_create_tool_returns_success_envelope() {
        let response = server()
            .create_document_markdown(Parameters(CreateDocumentMarkdownRequest {
                title: "Plan".to_string(),
                markdown_text: "# Plan\n\n- ship it".to_string(),
            }))
            .await;
        let value = parse_envelope(response);

        assert_eq!(value["successful"], true);
        assert_eq!(value["error"], "");
        assert_eq!(value["data"]["documentId"], "doc-1");
        assert_eq!(value["data"]["title"], "Plan");
        assert_eq!(value["data"]["requestCount"], 5);
    }

    #[tokio::test]
    async fn test_missing_parameters_return_error_envelope() {
        let response = server()
            .create_document_markdown(Parameters(CreateDocumentMarkdownRequest {
                title: String::new(),
                markdown_text: "text".to_string(),
            }))
            .await;
        let value = parse_envelope(response);

        assert_eq!(value["successful"], false);
        assert_eq!(value["data"], json!({}));
        assert_eq!(value["error"], "Missing required parameter(s): title");
    }

    #[tokio::test]
    async fn test_gateway_error_is_surfaced_verbatim() {
        let response = server()
            .update_document_markdown(Parameters(UpdateDocumentMarkdownRequest {
                document_id: "missing".to_string(),
                new_markdown_text: "hello".to_string(),
            }))
            .await;
        let value = parse_envelope(response);

        assert_eq!(value["successful"], false);
        assert_eq!(
            value["error"],
            "Google Docs API error (404): Requested entity was not found."
        );
    }

    #[tokio::test]
    async fn test_insert_tool_with_explicit_index() {
        let response = server()
            .insert_markdown(Parameters(InsertMarkdownRequest {
                document_id: "doc-1".to_string(),
                markdown_text: "*note*".to_string(),
                start_index: Some(10),
            }))
            .await;
        let value = parse_envelope(response);

        assert_eq!(value["successful"], true);
        assert_eq!(value["data"]["requestCount"], 3);
        assert_eq!(value["data"]["replies"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_preview_tool_shows_operations_and_batch_body() {
        let response = server()
            .preview_markdown_requests(Parameters(PreviewMarkdownRequest {
                markdown_text: "# Title".to_string(),
                start_index: None,
            }))
            .await;
        let value = parse_envelope(response);

        assert_eq!(value["successful"], true);
        assert_eq!(value["data"]["normalizedMarkdown"], "# Title");
        assert_eq!(
            value["data"]["operations"][0],
            json!({ "kind": "insert_text", "at": 1, "text": "Title\n" })
        );
        assert_eq!(value["data"]["batchUpdate"], json!({ "requests": 2 }));
    }

    #[tokio::test]
    async fn test_preview_rejects_negative_index() {
        let response = server()
            .preview_markdown_requests(Parameters(PreviewMarkdownRequest {
                markdown_text: "x".to_string(),
                start_index: Some(-1),
            }))
            .await;
        let value = parse_envelope(response);

        assert_eq!(value["successful"], false);
        assert_eq!(
            value["error"],
            "Start index must be a non-negative integer, got -1"
        );
    }
}
