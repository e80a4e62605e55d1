// =============================================================================
// GOOGLE DOCS BATCH UPDATE SCHEMA
// =============================================================================
//
// Translates the core's typed requests into the JSON the `documents.batchUpdate`
// endpoint expects. Each request serialises as a single-key object, e.g.
//
// ```text
// { "insertText": { "location": { "index": 1 }, "text": "Title\n" } }
// { "updateParagraphStyle": { "range": {...}, "paragraphStyle": {...}, "fields": "namedStyleType" } }
// ```

use serde::Serialize;

use crate::core::documents::DocumentRequest;
use crate::core::markdown::{BulletPreset, EditOperation, IndexRange, NamedStyleType};

#[derive(Debug, Serialize)]
pub struct BatchUpdateBody<'a> {
    pub requests: Vec<Request<'a>>,
}

impl<'a> BatchUpdateBody<'a> {
    pub fn from_requests(requests: &'a [DocumentRequest]) -> Self {
        Self {
            requests: requests.iter().map(Request::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request<'a> {
    InsertText {
        location: Location,
        text: &'a str,
    },
    UpdateParagraphStyle {
        range: Range,
        paragraph_style: ParagraphStyle,
        fields: &'static str,
    },
    UpdateTextStyle {
        range: Range,
        text_style: TextStyle,
        fields: String,
    },
    CreateParagraphBullets {
        range: Range,
        bullet_preset: BulletPreset,
    },
    DeleteContentRange {
        range: Range,
    },
}

#[derive(Debug, Serialize)]
pub struct Location {
    pub index: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize,
}

impl From<IndexRange> for Range {
    fn from(range: IndexRange) -> Self {
        Self {
            start_index: range.start,
            end_index: range.end,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    pub named_style_type: NamedStyleType,
}

#[derive(Debug, Serialize)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
}

impl TextStyle {
    /// Field mask naming exactly the properties this style sets, so nothing
    /// else on the range is reset.
    fn field_mask(&self) -> String {
        let mut fields = Vec::new();
        if self.bold.is_some() {
            fields.push("bold");
        }
        if self.italic.is_some() {
            fields.push("italic");
        }
        fields.join(",")
    }
}

impl<'a> From<&'a DocumentRequest> for Request<'a> {
    fn from(request: &'a DocumentRequest) -> Self {
        match request {
            DocumentRequest::DeleteContentRange { range } => Request::DeleteContentRange {
                range: (*range).into(),
            },
            DocumentRequest::Edit(operation) => Request::from(operation),
        }
    }
}

impl<'a> From<&'a EditOperation> for Request<'a> {
    fn from(operation: &'a EditOperation) -> Self {
        match operation {
            EditOperation::InsertText { at, text } => Request::InsertText {
                location: Location { index: *at },
                text,
            },
            EditOperation::SetParagraphStyle { range, style } => Request::UpdateParagraphStyle {
                range: (*range).into(),
                paragraph_style: ParagraphStyle {
                    named_style_type: *style,
                },
                fields: "namedStyleType",
            },
            EditOperation::SetCharacterStyle {
                range,
                bold,
                italic,
            } => {
                let text_style = TextStyle {
                    bold: *bold,
                    italic: *italic,
                };
                Request::UpdateTextStyle {
                    range: (*range).into(),
                    fields: text_style.field_mask(),
                    text_style,
                }
            }
            EditOperation::SetBullet { range, preset } => Request::CreateParagraphBullets {
                range: (*range).into(),
                bullet_preset: *preset,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::markdown::compile_markdown;
    use serde_json::json;

    fn to_json(requests: &[DocumentRequest]) -> serde_json::Value {
        serde_json::to_value(BatchUpdateBody::from_requests(requests)).unwrap()
    }

    #[test]
    fn test_heading_and_bold_batch_schema() {
        let requests: Vec<DocumentRequest> = compile_markdown("# Title\n\nSome **bold** text.", 1)
            .unwrap()
            .into_iter()
            .map(DocumentRequest::from)
            .collect();

        assert_eq!(
            to_json(&requests),
            json!({
                "requests": [
                    { "insertText": { "location": { "index": 1 }, "text": "Title\n" } },
                    { "updateParagraphStyle": {
                        "range": { "startIndex": 1, "endIndex": 6 },
                        "paragraphStyle": { "namedStyleType": "HEADING_1" },
                        "fields": "namedStyleType"
                    } },
                    { "insertText": { "location": { "index": 7 }, "text": "Some bold text.\n" } },
                    { "updateParagraphStyle": {
                        "range": { "startIndex": 7, "endIndex": 22 },
                        "paragraphStyle": { "namedStyleType": "NORMAL_TEXT" },
                        "fields": "namedStyleType"
                    } },
                    { "updateTextStyle": {
                        "range": { "startIndex": 12, "endIndex": 16 },
                        "textStyle": { "bold": true },
                        "fields": "bold"
                    } }
                ]
            })
        );
    }

    #[test]
    fn test_bullet_and_bold_italic_schema() {
        let requests: Vec<DocumentRequest> = compile_markdown("- ***both***", 1)
            .unwrap()
            .into_iter()
            .map(DocumentRequest::from)
            .collect();
        let value = to_json(&requests);

        assert_eq!(
            value["requests"][2],
            json!({ "createParagraphBullets": {
                "range": { "startIndex": 1, "endIndex": 5 },
                "bulletPreset": "BULLET_DISC_CIRCLE_SQUARE"
            } })
        );
        assert_eq!(
            value["requests"][3],
            json!({ "updateTextStyle": {
                "range": { "startIndex": 1, "endIndex": 5 },
                "textStyle": { "bold": true, "italic": true },
                "fields": "bold,italic"
            } })
        );
    }

    #[test]
    fn test_delete_content_range_schema() {
        let requests = vec![DocumentRequest::DeleteContentRange {
            range: IndexRange::new(1, 39),
        }];
        assert_eq!(
            to_json(&requests),
            json!({ "requests": [
                { "deleteContentRange": { "range": { "startIndex": 1, "endIndex": 39 } } }
            ] })
        );
    }
}
