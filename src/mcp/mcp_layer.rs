// MCP adapter layer: exposes the document service as tools over stdio.

pub mod docs_server;
pub mod tool_models;
