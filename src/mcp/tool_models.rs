//! MCP request types for the Markdown document tools.
//!
//! String parameters default to empty so a missing value reaches the service's
//! required-parameter check and comes back in the normal error envelope.

use schemars::JsonSchema;
use serde::Deserialize;

/// Create a new document from Markdown.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateDocumentMarkdownRequest {
    #[serde(default)]
    #[schemars(description = "The title of the document to create.")]
    pub title: String,
    #[serde(default)]
    #[schemars(description = "The markdown content to convert and insert into the document.")]
    pub markdown_text: String,
}

/// Replace the body of an existing document with Markdown.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateDocumentMarkdownRequest {
    #[serde(default)]
    #[schemars(description = "Google Docs document ID or full document URL.")]
    pub document_id: String,
    #[serde(default)]
    #[schemars(description = "Markdown text to replace the entire document body.")]
    pub new_markdown_text: String,
}

/// Insert Markdown into an existing document.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct InsertMarkdownRequest {
    #[serde(default)]
    #[schemars(description = "Google Docs document ID or full document URL.")]
    pub document_id: String,
    #[serde(default)]
    #[schemars(description = "Markdown text to insert.")]
    pub markdown_text: String,
    #[schemars(
        description = "Document index to insert at (non-negative). Omit to append to the end of the body."
    )]
    pub start_index: Option<i64>,
}

/// Compile Markdown without touching any document.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PreviewMarkdownRequest {
    #[serde(default)]
    #[schemars(description = "Markdown text to compile.")]
    pub markdown_text: String,
    #[schemars(description = "Index the first block would be inserted at. Defaults to 1.")]
    pub start_index: Option<i64>,
}
