// Markdown domain models - the block/inline structure the parser produces.
//
// These are plain data types with no knowledge of Google Docs. The compiler
// turns them into positional edit operations.

/// The structural kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    BulletItem,
}

impl BlockKind {
    /// Heading kind for a `#` marker count, if it is one we support.
    pub fn heading(level: usize) -> Option<Self> {
        match level {
            1 => Some(BlockKind::Heading1),
            2 => Some(BlockKind::Heading2),
            3 => Some(BlockKind::Heading3),
            _ => None,
        }
    }
}

/// A styled fragment of text inside a block. Never empty, never contains a newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl InlineRun {
    #[cfg(test)]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn styled(text: impl Into<String>, bold: bool, italic: bool) -> Self {
        Self {
            text: text.into(),
            bold,
            italic,
        }
    }

    pub fn is_styled(&self) -> bool {
        self.bold || self.italic
    }
}

/// One structural unit of the document: a heading, paragraph or bullet item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub runs: Vec<InlineRun>,
}

impl Block {
    pub fn new(kind: BlockKind, runs: Vec<InlineRun>) -> Self {
        Self { kind, runs }
    }

    /// The rendered text of the block, styling markers stripped.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}
