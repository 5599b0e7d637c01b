//! Emitter: document value → canonical JSON text, plus the small text
//! projections the views show for rows and nodes.

use crate::model::{ContainerKind, JsonNode, Row, RowValue};
use serde_json::{Map, Value};

/// Emit a document as canonical JSON with 2-space indentation.
#[must_use]
pub fn emit_document(doc: &Value) -> String {
    // Serializing a `Value` cannot fail: every map key is already a string.
    serde_json::to_string_pretty(doc).unwrap_or_default()
}

/// Text shown for a row's value: `{N keys}`, `[N items]`, or the literal.
pub fn row_display_text(row: &Row) -> String {
    match &row.value {
        RowValue::Str(s) => s.clone(),
        RowValue::Num(n) => n.to_string(),
        RowValue::Bool(b) => b.to_string(),
        RowValue::Null => "null".to_string(),
        RowValue::Container {
            kind: ContainerKind::Object,
            children,
        } => format!("{{{children} keys}}"),
        RowValue::Container {
            kind: ContainerKind::Array,
            children,
        } => format!("[{children} items]"),
    }
}

/// Inspector content for a node.
///
/// A bare node shows its value; otherwise the keyed leaf rows are printed as
/// a JSON object. Container rows are left out (they live in child nodes).
pub fn node_content(node: &JsonNode) -> String {
    if node.rows.is_empty() {
        return "{}".to_string();
    }
    if node.is_bare() {
        return row_display_text(&node.rows[0]);
    }

    let mut obj = Map::new();
    for row in &node.rows {
        if let (Some(key), Some(value)) = (&row.key, row.value.to_json()) {
            obj.insert(key.clone(), value);
        }
    }
    emit_document(&Value::Object(obj))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::path::JsonPath;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn canonical_two_space_indent() {
        let doc = json!({"user": {"name": "Banana", "tags": [1, 2]}});
        let expected = "{\n  \"user\": {\n    \"name\": \"Banana\",\n    \"tags\": [\n      1,\n      2\n    ]\n  }\n}";
        assert_eq!(emit_document(&doc), expected);
    }

    #[test]
    fn row_text_summaries() {
        let obj = Row::keyed(
            "o",
            RowValue::Container {
                kind: ContainerKind::Object,
                children: 3,
            },
        );
        let arr = Row::keyed(
            "a",
            RowValue::Container {
                kind: ContainerKind::Array,
                children: 0,
            },
        );
        assert_eq!(row_display_text(&obj), "{3 keys}");
        assert_eq!(row_display_text(&arr), "[0 items]");
        assert_eq!(row_display_text(&Row::keyed("n", RowValue::Null)), "null");
    }

    #[test]
    fn content_skips_container_rows() {
        let node = JsonNode::new(
            NodeId::sequential(1),
            JsonPath::root(),
            vec![
                Row::keyed("name", RowValue::Str("Apple".into())),
                Row::keyed(
                    "tags",
                    RowValue::Container {
                        kind: ContainerKind::Array,
                        children: 2,
                    },
                ),
                Row::keyed("price", RowValue::Num(3.into())),
            ],
        );
        assert_eq!(
            node_content(&node),
            "{\n  \"name\": \"Apple\",\n  \"price\": 3\n}"
        );
    }

    #[test]
    fn content_of_bare_and_empty_nodes() {
        let bare = JsonNode::new(
            NodeId::sequential(1),
            JsonPath::root(),
            vec![Row::new(None, RowValue::Str("Widget".into()))],
        );
        assert_eq!(node_content(&bare), "Widget");

        let empty = JsonNode::new(NodeId::sequential(2), JsonPath::root(), Vec::new());
        assert_eq!(node_content(&empty), "{}");
    }
}
