pub mod document_gateway;
pub mod document_models;
pub mod document_service;

pub use document_gateway::DocumentGateway;
pub use document_models::{
    BatchUpdateResult, DocsError, DocumentMetadata, DocumentRequest, DocumentSnapshot,
};
pub use document_service::DocumentService;
