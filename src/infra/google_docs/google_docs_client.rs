// =============================================================================
// GOOGLE DOCS CLIENT
// =============================================================================
//
// reqwest implementation of the core `DocumentGateway` trait. Three endpoints
// are used:
//
// - `POST /documents` - create an empty document
// - `GET /documents/{id}` - read the body extent
// - `POST /documents/{id}:batchUpdate` - apply a batch atomically
//
// **Environment Variables:**
// - `GOOGLE_SERVICE_ACCOUNT_KEY` / `GOOGLE_SERVICE_ACCOUNT_JSON` - credentials
// - `GOOGLE_DOCS_API_BASE` - optional API base URL override

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use super::request_schema::BatchUpdateBody;
use super::service_account::ServiceAccountAuth;
use crate::core::documents::{
    BatchUpdateResult, DocsError, DocumentGateway, DocumentMetadata, DocumentRequest,
    DocumentSnapshot,
};

const DEFAULT_API_BASE: &str = "https://docs.googleapis.com/v1";

// =============================================================================
// GOOGLE DOCS API RESPONSE STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiDocument {
    document_id: String,
    #[serde(default)]
    title: String,
    revision_id: Option<String>,
    body: Option<Body>,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    content: Vec<StructuralElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuralElement {
    end_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateResponse {
    document_id: Option<String>,
    #[serde(default)]
    replies: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl From<ApiDocument> for DocumentMetadata {
    fn from(doc: ApiDocument) -> Self {
        Self {
            document_id: doc.document_id,
            title: doc.title,
            revision_id: doc.revision_id,
        }
    }
}

impl From<ApiDocument> for DocumentSnapshot {
    fn from(doc: ApiDocument) -> Self {
        let end_index = doc
            .body
            .as_ref()
            .and_then(|body| body.content.iter().filter_map(|e| e.end_index).max())
            .unwrap_or(1);

        Self {
            document_id: doc.document_id,
            title: doc.title,
            revision_id: doc.revision_id,
            end_index,
        }
    }
}

/// Pulls the human-readable message out of a Google API error body, falling
/// back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

async fn check_status(response: Response) -> Result<Response, DocsError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    Err(DocsError::Api {
        status: status.as_u16(),
        message: api_error_message(&text),
    })
}

// =============================================================================
// CLIENT
// =============================================================================

/// Google Docs REST client authenticated as a service account.
pub struct GoogleDocsClient {
    client: Client,
    auth: ServiceAccountAuth,
    base_url: String,
}

impl GoogleDocsClient {
    pub fn new(auth: ServiceAccountAuth) -> Self {
        Self::with_base_url(auth, DEFAULT_API_BASE)
    }

    pub fn with_base_url(auth: ServiceAccountAuth, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            auth,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client with service account credentials from environment variables.
    pub async fn from_env() -> Result<Self, DocsError> {
        let auth = ServiceAccountAuth::from_env().await?;
        let base_url =
            std::env::var("GOOGLE_DOCS_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        tracing::info!(
            client_email = %auth.client_email(),
            base_url = %base_url,
            "Google Docs client configured"
        );
        Ok(Self::with_base_url(auth, base_url))
    }

    fn document_url(&self, document_id: &str) -> String {
        format!("{}/documents/{}", self.base_url, document_id)
    }

    async fn bearer(&self) -> Result<String, DocsError> {
        Ok(format!("Bearer {}", self.auth.get_access_token().await?))
    }
}

#[async_trait]
impl DocumentGateway for GoogleDocsClient {
    async fn create_document(&self, title: &str) -> Result<DocumentMetadata, DocsError> {
        let url = format!("{}/documents", self.base_url);
        tracing::debug!("Creating Google Doc '{}'", title);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer().await?)
            .json(&json!({ "title": title }))
            .send()
            .await
            .map_err(|e| DocsError::Transport(e.to_string()))?;

        let document: ApiDocument = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| DocsError::Decode(e.to_string()))?;

        Ok(document.into())
    }

    async fn get_document(&self, document_id: &str) -> Result<DocumentSnapshot, DocsError> {
        tracing::debug!("Fetching Google Doc: {}", document_id);

        let response = self
            .client
            .get(self.document_url(document_id))
            .header("Authorization", self.bearer().await?)
            .send()
            .await
            .map_err(|e| DocsError::Transport(e.to_string()))?;

        let document: ApiDocument = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| DocsError::Decode(e.to_string()))?;

        Ok(document.into())
    }

    async fn batch_update(
        &self,
        document_id: &str,
        requests: &[DocumentRequest],
    ) -> Result<BatchUpdateResult, DocsError> {
        let url = format!("{}:batchUpdate", self.document_url(document_id));
        let body = BatchUpdateBody::from_requests(requests);

        tracing::debug!(
            document_id = %document_id,
            requests = requests.len(),
            "Submitting batch update"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer().await?)
            .json(&body)
            .send()
            .await
            .map_err(|e| DocsError::Transport(e.to_string()))?;

        let reply: BatchUpdateResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| DocsError::Decode(e.to_string()))?;

        Ok(BatchUpdateResult {
            document_id: reply.document_id.unwrap_or_else(|| document_id.to_string()),
            replies: reply.replies,
        })
    }

    fn batch_update_body(&self, requests: &[DocumentRequest]) -> Result<Value, DocsError> {
        serde_json::to_value(BatchUpdateBody::from_requests(requests))
            .map_err(|e| DocsError::Encode(e.to_string()))
    }
}
