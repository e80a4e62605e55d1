use async_trait::async_trait;
use serde_json::Value;

use super::document_models::{
    BatchUpdateResult, DocsError, DocumentMetadata, DocumentRequest, DocumentSnapshot,
};

/// Access to the remote document service. The core layer never sees HTTP,
/// tokens or request schemas; it only hands over typed requests.
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    /// Creates an empty document with the given title.
    async fn create_document(&self, title: &str) -> Result<DocumentMetadata, DocsError>;

    /// Fetches the document so its current body extent is known.
    async fn get_document(&self, document_id: &str) -> Result<DocumentSnapshot, DocsError>;

    /// Applies all requests as one atomic batch, in order.
    async fn batch_update(
        &self,
        document_id: &str,
        requests: &[DocumentRequest],
    ) -> Result<BatchUpdateResult, DocsError>;

    /// The request body `batch_update` would send for `requests`, without
    /// sending it.
    fn batch_update_body(&self, requests: &[DocumentRequest]) -> Result<Value, DocsError>;
}

// Lets the service hold a boxed gateway so the concrete client can be picked at startup.
#[async_trait]
impl DocumentGateway for Box<dyn DocumentGateway> {
    async fn create_document(&self, title: &str) -> Result<DocumentMetadata, DocsError> {
        (**self).create_document(title).await
    }

    async fn get_document(&self, document_id: &str) -> Result<DocumentSnapshot, DocsError> {
        (**self).get_document(document_id).await
    }

    async fn batch_update(
        &self,
        document_id: &str,
        requests: &[DocumentRequest],
    ) -> Result<BatchUpdateResult, DocsError> {
        (**self).batch_update(document_id, requests).await
    }

    fn batch_update_body(&self, requests: &[DocumentRequest]) -> Result<Value, DocsError> {
        (**self).batch_update_body(requests)
    }
}
