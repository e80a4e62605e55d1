// =============================================================================
// EDIT COMPILER
// =============================================================================
//
// Walks the block sequence once and emits the positional edit operations that
// rebuild it inside a document. For every block:
//
// 1. InsertText at the cursor (block text + "\n")
// 2. SetParagraphStyle over the block's text
// 3. SetBullet for list items
// 4. SetCharacterStyle for each bold/italic run
//
// Insertions only ever happen at the cursor, which only moves forward, so the
// ranges computed for a block stay valid while later blocks are inserted after it.
//
// Styling ranges are half-open and stop before the block's trailing newline.

use thiserror::Error;

use super::edit_operations::{EditOperation, IndexRange, OperationBatch};
use super::markdown_models::Block;
use super::markdown_parser::parse;
use super::style_resolver::{bullet_preset, paragraph_style};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Start index must be a non-negative integer, got {0}")]
    NegativeStartIndex(i64),
}

/// Length of text in the document's index space (UTF-16 code units).
pub fn document_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// The next insertion point while one batch is being compiled.
#[derive(Debug)]
struct Cursor {
    position: usize,
}

impl Cursor {
    fn new(start_index: i64) -> Result<Self, CompileError> {
        let position =
            usize::try_from(start_index).map_err(|_| CompileError::NegativeStartIndex(start_index))?;
        Ok(Self { position })
    }

    /// Moves past `text` and returns the span it occupies.
    fn advance(&mut self, text: &str) -> IndexRange {
        let start = self.position;
        self.position += document_length(text);
        IndexRange::new(start, self.position)
    }
}

/// Compiles a block sequence into an ordered operation batch starting at `start_index`.
pub fn compile(blocks: &[Block], start_index: i64) -> Result<OperationBatch, CompileError> {
    let mut cursor = Cursor::new(start_index)?;
    let mut operations = Vec::new();

    for block in blocks {
        let mut text = block.text();
        text.push('\n');

        let inserted = cursor.advance(&text);
        operations.push(EditOperation::InsertText {
            at: inserted.start,
            text,
        });

        // Everything but the trailing newline.
        let body = IndexRange::new(inserted.start, inserted.end - 1);

        operations.push(EditOperation::SetParagraphStyle {
            range: body,
            style: paragraph_style(block.kind),
        });

        if let Some(preset) = bullet_preset(block.kind) {
            operations.push(EditOperation::SetBullet {
                range: body,
                preset,
            });
        }

        let mut run_start = body.start;
        for run in &block.runs {
            let run_end = run_start + document_length(&run.text);
            if run.is_styled() {
                operations.push(EditOperation::SetCharacterStyle {
                    range: IndexRange::new(run_start, run_end),
                    bold: run.bold.then_some(true),
                    italic: run.italic.then_some(true),
                });
            }
            run_start = run_end;
        }
    }

    Ok(OperationBatch::from_operations(operations))
}

/// Parses and compiles Markdown in one step.
pub fn compile_markdown(markdown: &str, start_index: i64) -> Result<OperationBatch, CompileError> {
    compile(&parse(markdown), start_index)
}
