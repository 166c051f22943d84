//! Shape handling for the oracle's unstable reply content.
//!
//! The upstream service has shipped at least three content shapes for the
//! same call: structured parts, a plain array, and a plain string. Callers
//! classify the shape once and normalize instead of branching inline.

use serde_json::Value;

/// One variant per observed reply shape, tried in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentShape {
    /// `{ "parts": [ { "text": ... }, ... ] }`
    StructuredParts,
    /// `[ ... ]`
    PlainArray,
    /// `"..."`
    PlainText,
    /// Anything else. Consumers fall back to JSON stringification.
    Opaque,
}

pub fn shape_of(content: &Value) -> ContentShape {
    if content.get("parts").map(Value::is_array).unwrap_or(false) {
        ContentShape::StructuredParts
    } else if content.is_array() {
        ContentShape::PlainArray
    } else if content.is_string() {
        ContentShape::PlainText
    } else {
        ContentShape::Opaque
    }
}

/// Text fields of a structured-parts content, in order, empties dropped.
pub fn part_texts(content: &Value) -> Vec<String> {
    content
        .get("parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Collapse any content shape into one text blob for token scanning.
pub fn flatten_text(content: &Value) -> String {
    match shape_of(content) {
        ContentShape::StructuredParts => part_texts(content).join("\n"),
        ContentShape::PlainArray => content
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(render_item)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default(),
        ContentShape::PlainText => content.as_str().unwrap_or_default().to_string(),
        ContentShape::Opaque => content.to_string(),
    }
}

fn render_item(item: &Value) -> String {
    match item.as_str() {
        Some(s) => s.to_string(),
        None => item.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_structured_parts() {
        let content = json!({ "parts": [ { "text": "hello" } ] });
        assert_eq!(shape_of(&content), ContentShape::StructuredParts);
        assert_eq!(part_texts(&content), vec!["hello"]);
    }

    #[test]
    fn detects_plain_array_and_string() {
        assert_eq!(shape_of(&json!(["a", "b"])), ContentShape::PlainArray);
        assert_eq!(shape_of(&json!("a")), ContentShape::PlainText);
        assert_eq!(shape_of(&json!({ "role": "model" })), ContentShape::Opaque);
    }

    #[test]
    fn flatten_joins_parts_with_newlines() {
        let content = json!({ "parts": [ { "text": "first" }, { "text": " second " } ] });
        assert_eq!(flatten_text(&content), "first\nsecond");
    }

    #[test]
    fn flatten_renders_non_string_array_items() {
        let content = json!(["plain", 7]);
        assert_eq!(flatten_text(&content), "plain\n7");
    }

    #[test]
    fn flatten_stringifies_opaque_content() {
        let content = json!({ "role": "model" });
        assert!(flatten_text(&content).contains("role"));
    }
}
