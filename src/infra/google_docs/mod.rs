// =============================================================================
// GOOGLE DOCS MODULE
// =============================================================================
//
// Adapter between the core document service and the Google Docs REST API.
// It lives in the infra layer because it does external I/O (OAuth token
// exchange and HTTP requests). The core layer only sees `DocumentGateway`.
//
// **Pieces:**
// - `service_account` - JWT signing and access-token caching
// - `request_schema` - typed requests -> batchUpdate JSON
// - `google_docs_client` - the HTTP client implementing the gateway

pub mod google_docs_client;
pub mod request_schema;
pub mod service_account;

pub use google_docs_client::GoogleDocsClient;
