// Edit operations - the compiler's output vocabulary.
//
// Each operation is addressed against the document index space as it exists
// after every InsertText earlier in the same batch has been applied.

use serde::Serialize;
use std::fmt;

/// Half-open index range `[start, end)` in the target document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// True when `other` lies entirely inside this range.
    #[cfg(test)]
    pub fn contains(&self, other: &IndexRange) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    #[cfg(test)]
    pub fn overlaps(&self, other: &IndexRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Named paragraph styles understood by the document service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NamedStyleType {
    NormalText,
    #[serde(rename = "HEADING_1")]
    Heading1,
    #[serde(rename = "HEADING_2")]
    Heading2,
    #[serde(rename = "HEADING_3")]
    Heading3,
}

/// Bullet glyph presets. Only the disc preset is emitted today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BulletPreset {
    #[serde(rename = "BULLET_DISC_CIRCLE_SQUARE")]
    DiscCircleSquare,
}

/// One positional instruction for the document service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditOperation {
    InsertText {
        at: usize,
        text: String,
    },
    SetParagraphStyle {
        range: IndexRange,
        style: NamedStyleType,
    },
    SetCharacterStyle {
        range: IndexRange,
        #[serde(skip_serializing_if = "Option::is_none")]
        bold: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        italic: Option<bool>,
    },
    SetBullet {
        range: IndexRange,
        preset: BulletPreset,
    },
}

impl EditOperation {
    /// The range a styling operation targets. `None` for insertions.
    #[cfg(test)]
    pub fn range(&self) -> Option<IndexRange> {
        match self {
            EditOperation::InsertText { .. } => None,
            EditOperation::SetParagraphStyle { range, .. }
            | EditOperation::SetCharacterStyle { range, .. }
            | EditOperation::SetBullet { range, .. } => Some(*range),
        }
    }
}

/// The ordered, immutable result of one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OperationBatch {
    operations: Vec<EditOperation>,
}

impl OperationBatch {
    pub(crate) fn from_operations(operations: Vec<EditOperation>) -> Self {
        Self { operations }
    }

    #[cfg(test)]
    pub fn operations(&self) -> &[EditOperation] {
        &self.operations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EditOperation> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<'a> IntoIterator for &'a OperationBatch {
    type Item = &'a EditOperation;
    type IntoIter = std::slice::Iter<'a, EditOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

impl IntoIterator for OperationBatch {
    type Item = EditOperation;
    type IntoIter = std::vec::IntoIter<EditOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}
