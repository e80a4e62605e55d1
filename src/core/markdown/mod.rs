// Markdown compilation: Markdown text -> blocks -> positional edit operations.

pub mod edit_compiler;
pub mod edit_operations;
pub mod markdown_models;
pub mod markdown_parser;
pub mod style_resolver;

pub use edit_compiler::{compile, compile_markdown, CompileError};
pub use edit_operations::{BulletPreset, EditOperation, IndexRange, NamedStyleType, OperationBatch};
pub use markdown_parser::{parse, render_markdown};
