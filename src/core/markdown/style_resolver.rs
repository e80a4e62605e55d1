//! Maps block kinds to the document's named paragraph styles and bullet presets.

use super::edit_operations::{BulletPreset, NamedStyleType};
use super::markdown_models::BlockKind;

/// Named paragraph style for a block kind.
pub fn paragraph_style(kind: BlockKind) -> NamedStyleType {
    match kind {
        BlockKind::Heading1 => NamedStyleType::Heading1,
        BlockKind::Heading2 => NamedStyleType::Heading2,
        BlockKind::Heading3 => NamedStyleType::Heading3,
        BlockKind::Paragraph | BlockKind::BulletItem => NamedStyleType::NormalText,
    }
}

/// Bullet preset for a block kind. Every list item gets the same disc preset;
/// nesting is not distinguished.
pub fn bullet_preset(kind: BlockKind) -> Option<BulletPreset> {
    match kind {
        BlockKind::BulletItem => Some(BulletPreset::DiscCircleSquare),
        _ => None,
    }
}
