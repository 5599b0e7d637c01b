//! Display identity inference: which name and color a node shows.
//!
//! Name precedence, first match wins:
//! 1. the node's explicit `name`;
//! 2. the first row's value, when that row has a key and a string/number value
//!    (`{"name": "Apple"}` shows `Apple`, not `name`);
//! 3. the first row's key;
//! 4. the node's `parent_key`;
//! 5. the first row's string/number value;
//! 6. the empty string.
//!
//! Color precedence: the first row keyed `color` or holding a hex color,
//! provided its value is a hex color; then the node's explicit `color`; then
//! [`DEFAULT_COLOR`].
//!
//! Everything here is pure and recomputed on demand.

use crate::model::{JsonNode, Row};

/// Fallback display color.
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// The `(name, color)` pair a node is displayed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub color: String,
}

/// Infer a node's display identity.
pub fn infer_identity(node: &JsonNode) -> Identity {
    Identity {
        name: infer_name(node),
        color: infer_color(node),
    }
}

pub fn infer_name(node: &JsonNode) -> String {
    if let Some(name) = &node.name {
        return name.clone();
    }
    let first = node.first_row();
    let first_primitive = first.and_then(first_primitive_text);

    if let Some((_, value)) = first.and_then(keyed_primitive) {
        return value;
    }
    if let Some(key) = first.and_then(Row::key) {
        return key.to_string();
    }
    if let Some(parent_key) = &node.parent_key {
        return parent_key.clone();
    }
    first_primitive.unwrap_or_default()
}

pub fn infer_color(node: &JsonNode) -> String {
    if let Some(value) = color_row(node).and_then(|row| row.value.as_str())
        && is_hex_color(value)
    {
        return value.to_string();
    }
    node.color
        .clone()
        .unwrap_or_else(|| DEFAULT_COLOR.to_string())
}

/// The document key behind an inferred name.
///
/// Only set when rule 2 is what produced `original_name`: the first row has a
/// key and a string/number value equal to it. Any other source of the name
/// has no document field to write back to.
pub fn name_key<'a>(node: &'a JsonNode, original_name: &str) -> Option<&'a str> {
    let first = node.first_row()?;
    let (key, value) = keyed_primitive(first)?;
    (value == original_name).then_some(key)
}

/// The row color inference looks at: the first row keyed `color` or holding
/// a hex color string. Its value is not guaranteed to be a valid color.
pub fn color_row(node: &JsonNode) -> Option<&Row> {
    node.rows.iter().find(|row| {
        row.key() == Some("color") || row.value.as_str().is_some_and(is_hex_color)
    })
}

/// Views draw the explicit name as a label only when it says something the
/// first value does not already say.
pub fn show_label(node: &JsonNode) -> bool {
    match &node.name {
        Some(name) if !name.is_empty() => {
            node.first_row().and_then(first_primitive_text).as_ref() != Some(name)
        }
        _ => false,
    }
}

/// `#` followed by exactly 3 or 6 hex digits.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

fn first_primitive_text(row: &Row) -> Option<String> {
    row.value.primitive_text()
}

/// `(key, value)` when the row has a non-empty key and a non-empty
/// string/number value.
fn keyed_primitive(row: &Row) -> Option<(&str, String)> {
    let key = row.key().filter(|k| !k.is_empty())?;
    let value = row.value.primitive_text().filter(|v| !v.is_empty())?;
    Some((key, value))
}
