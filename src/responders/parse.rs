//! Free-text answers become flat item lists here.

use serde_json::Value;

use crate::oracle::response::{self, ContentShape};

/// Split an answer on line breaks and common bullet delimiters, trim each
/// segment, strip hyphen list markers, drop empties. Order is preserved.
pub fn split_items(raw: &str) -> Vec<String> {
    raw.split(|c: char| matches!(c, '\n' | '•' | '–' | '—'))
        .map(|segment| {
            let trimmed = segment.trim();
            trimmed.strip_prefix("- ").unwrap_or(trimmed).trim()
        })
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize any oracle content shape into the same flat item list.
///
/// Structured parts, plain arrays, and plain strings all route through
/// [`split_items`]; an entirely unrecognized shape is stringified whole and
/// split the same way.
pub fn normalize_items(content: &Value) -> Vec<String> {
    match response::shape_of(content) {
        ContentShape::StructuredParts => response::part_texts(content)
            .iter()
            .flat_map(|text| split_items(text))
            .collect(),
        ContentShape::PlainArray | ContentShape::PlainText | ContentShape::Opaque => {
            split_items(&response::flatten_text(content))
        }
    }
}
