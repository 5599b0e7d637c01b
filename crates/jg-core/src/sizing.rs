//! Node measurement.
//!
//! Converts a node's rows into a `width × height` box. There is no text
//! shaping here: widths are estimated from character counts, which keeps the
//! builder pure and deterministic.

use crate::emitter::row_display_text;
use crate::model::{JsonNode, Row};

/// Fixed metrics used when measuring nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeDimensions {
    /// Height of one row in a multi-row node.
    pub row_height: f32,
    /// Height of a single bare-value node.
    pub parent_height: f32,
    /// Estimated advance of one character.
    pub char_width: f32,
    /// Horizontal padding added to the widest row.
    pub padding: f32,
    pub min_width: f32,
    pub max_width: f32,
    /// Side of the square used for image previews.
    pub image_size: f32,
}

impl Default for NodeDimensions {
    fn default() -> Self {
        Self {
            row_height: 24.0,
            parent_height: 36.0,
            char_width: 7.5,
            padding: 20.0,
            min_width: 60.0,
            max_width: 700.0,
            image_size: 80.0,
        }
    }
}

/// Graph build configuration.
#[derive(Debug, Clone, Default)]
pub struct GraphConfig {
    /// Render image URLs as previews (sized as a square).
    pub image_preview: bool,
    pub dimensions: NodeDimensions,
}

/// Compute `(width, height)` for a node.
pub fn measure(node: &JsonNode, config: &GraphConfig) -> (f32, f32) {
    let dims = &config.dimensions;

    if node.is_bare() {
        let row = &node.rows[0];
        if config.image_preview && row.value.as_str().is_some_and(is_image_url) {
            return (dims.image_size, dims.image_size);
        }
        return (line_width(&row_line(row), dims), dims.parent_height);
    }

    let widest = node
        .rows
        .iter()
        .map(|row| line_width(&row_line(row), dims))
        .fold(dims.min_width, f32::max);
    let height = (node.rows.len().max(1) as f32) * dims.row_height;
    (widest, height)
}

/// Fill in `width`/`height` on `node`.
pub fn apply_size(node: &mut JsonNode, config: &GraphConfig) {
    let (width, height) = measure(node, config);
    node.width = width;
    node.height = height;
}

/// Heuristic used by image previews: an http(s) URL naming an image file,
/// or a base64 `data:image/` URI.
pub fn is_image_url(value: &str) -> bool {
    const EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

    if value.starts_with("data:image/") && value.contains("base64") {
        return true;
    }
    let lower = value.to_ascii_lowercase();
    let after_scheme = ["https://", "http://"]
        .iter()
        .find_map(|scheme| lower.find(scheme).map(|pos| &lower[pos + scheme.len()..]));
    match after_scheme {
        Some(rest) => EXTENSIONS.iter().any(|ext| rest.contains(ext)),
        None => false,
    }
}

fn row_line(row: &Row) -> String {
    match &row.key {
        Some(key) => format!("{key}: {}", row_display_text(row)),
        None => row_display_text(row),
    }
}

fn line_width(line: &str, dims: &NodeDimensions) -> f32 {
    let raw = line.chars().count() as f32 * dims.char_width + dims.padding;
    raw.clamp(dims.min_width, dims.max_width)
}
