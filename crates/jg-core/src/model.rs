//! Core graph data model for JSON documents.
//!
//! Every object (and every bare root value) becomes a [`JsonNode`]; every
//! key/value line inside it is a [`Row`]. Rows whose value is an object or
//! array are summarized (`{N keys}` / `[N items]`) and point at child nodes
//! through [`Edge`]s. Nodes are stored in a DAG whose edges go from parent
//! to child, in document order.

use crate::id::NodeId;
use crate::path::JsonPath;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

// ─── Values ──────────────────────────────────────────────────────────────

/// The parser's value taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Null,
    Object,
    Array,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
        };
        f.write_str(s)
    }
}

/// Which kind of container a summarized row stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Object,
    Array,
}

/// The value shown on a row. The variant *is* the type; there is no
/// separate tag to keep in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum RowValue {
    #[serde(rename = "string")]
    Str(String),
    #[serde(rename = "number")]
    Num(Number),
    #[serde(rename = "boolean")]
    Bool(bool),
    Null,
    /// Summary of a nested object or array.
    Container { kind: ContainerKind, children: usize },
}

impl RowValue {
    /// Summarize a JSON value for display on a row.
    pub fn summarize(value: &Value) -> Self {
        match value {
            Value::String(s) => RowValue::Str(s.clone()),
            Value::Number(n) => RowValue::Num(n.clone()),
            Value::Bool(b) => RowValue::Bool(*b),
            Value::Null => RowValue::Null,
            Value::Object(map) => RowValue::Container {
                kind: ContainerKind::Object,
                children: map.len(),
            },
            Value::Array(items) => RowValue::Container {
                kind: ContainerKind::Array,
                children: items.len(),
            },
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            RowValue::Str(_) => ValueKind::String,
            RowValue::Num(_) => ValueKind::Number,
            RowValue::Bool(_) => ValueKind::Boolean,
            RowValue::Null => ValueKind::Null,
            RowValue::Container {
                kind: ContainerKind::Object,
                ..
            } => ValueKind::Object,
            RowValue::Container {
                kind: ContainerKind::Array,
                ..
            } => ValueKind::Array,
        }
    }

    /// Text of a string or number value; `None` for everything else.
    ///
    /// Booleans and null never count as "primitive" for naming purposes.
    pub fn primitive_text(&self) -> Option<String> {
        match self {
            RowValue::Str(s) => Some(s.clone()),
            RowValue::Num(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RowValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Back to a JSON leaf. Containers have no literal value and map to `None`.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            RowValue::Str(s) => Some(Value::String(s.clone())),
            RowValue::Num(n) => Some(Value::Number(n.clone())),
            RowValue::Bool(b) => Some(Value::Bool(*b)),
            RowValue::Null => Some(Value::Null),
            RowValue::Container { .. } => None,
        }
    }
}

// ─── Rows ────────────────────────────────────────────────────────────────

/// One visible field of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// `None` only for a bare value with no containing key.
    pub key: Option<String>,
    #[serde(flatten)]
    pub value: RowValue,
    /// Target nodes of a container row's outgoing edges.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub to: SmallVec<[NodeId; 2]>,
}

impl Row {
    pub fn new(key: Option<String>, value: RowValue) -> Self {
        Self {
            key,
            value,
            to: SmallVec::new(),
        }
    }

    pub fn keyed(key: &str, value: RowValue) -> Self {
        Self::new(Some(key.to_string()), value)
    }

    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Element count for container rows.
    pub fn children_count(&self) -> Option<usize> {
        match self.value {
            RowValue::Container { children, .. } => Some(children),
            _ => None,
        }
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A rendered unit: one JSON object, or one bare value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonNode {
    /// Unique within one graph build only.
    pub id: NodeId,
    /// Rows in document order. Never empty once built.
    #[serde(rename = "text")]
    pub rows: Vec<Row>,
    pub width: f32,
    pub height: f32,
    /// Durable identity across rebuilds.
    pub path: JsonPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<ContainerKind>,
    /// Explicit display name (set by in-memory edits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Explicit display color (set by in-memory edits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl JsonNode {
    pub fn new(id: NodeId, path: JsonPath, rows: Vec<Row>) -> Self {
        Self {
            id,
            rows,
            width: 0.0,
            height: 0.0,
            path,
            parent_key: None,
            parent_type: None,
            name: None,
            color: None,
        }
    }

    pub fn first_row(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// A single row without a key: a bare scalar or container.
    pub fn is_bare(&self) -> bool {
        self.rows.len() == 1 && self.rows[0].key.is_none()
    }

    /// Apply `patch`, overwriting only the fields it carries.
    pub fn apply_patch(&mut self, patch: &NodePatch) {
        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }
        if let Some(color) = &patch.color {
            self.color = Some(color.clone());
        }
        if let Some(rows) = &patch.rows {
            self.rows = rows.clone();
        }
    }
}

/// In-memory-only changes to a node. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePatch {
    pub name: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "text")]
    pub rows: Option<Vec<Row>>,
}

impl NodePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.rows.is_none()
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

/// A parent → child connection, labelled with the parent's key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub from: NodeId,
    pub to: NodeId,
    pub text: Option<String>,
}

// ─── Graph ───────────────────────────────────────────────────────────────

/// One build of a JSON document: a DAG of [`JsonNode`] values.
///
/// Rebuilt wholesale on every document change; never patched structurally.
#[derive(Debug, Clone, Default)]
pub struct JsonGraph {
    /// Parent → child containment.
    pub graph: StableDiGraph<JsonNode, ()>,

    /// Index from NodeId → NodeIndex for fast lookup.
    pub id_index: HashMap<NodeId, NodeIndex>,

    /// Visual edges, in build order.
    pub edges: Vec<Edge>,

    /// Node indices in build order.
    order: Vec<NodeIndex>,
}

impl JsonGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` (or as a root when `None`).
    pub fn add_node(&mut self, parent: Option<NodeIndex>, node: JsonNode) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        if let Some(parent) = parent {
            self.graph.add_edge(parent, idx, ());
        }
        self.id_index.insert(id, idx);
        self.order.push(idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All nodes in build (document) order.
    pub fn nodes(&self) -> impl Iterator<Item = &JsonNode> + '_ {
        self.order.iter().map(|idx| &self.graph[*idx])
    }

    pub fn get_by_id(&self, id: NodeId) -> Option<&JsonNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn get_by_id_mut(&mut self, id: NodeId) -> Option<&mut JsonNode> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// First node whose path equals `path` structurally.
    pub fn find_by_path(&self, path: &JsonPath) -> Option<&JsonNode> {
        self.nodes().find(|node| &node.path == path)
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Children in document order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// Apply an in-memory patch. Returns `false` if `id` is unknown.
    pub fn update_node(&mut self, id: NodeId, patch: &NodePatch) -> bool {
        match self.get_by_id_mut(id) {
            Some(node) => {
                node.apply_patch(patch);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_path;
    use serde_json::json;

    fn leaf(id: usize, path: JsonPath) -> JsonNode {
        JsonNode::new(
            NodeId::sequential(id),
            path,
            vec![Row::new(None, RowValue::Str("x".into()))],
        )
    }

    #[test]
    fn graph_basics() {
        let mut g = JsonGraph::new();
        let root = g.add_node(None, leaf(1, JsonPath::root()));
        let a = g.add_node(Some(root), leaf(2, json_path!["a"]));
        let b = g.add_node(Some(root), leaf(3, json_path!["b"]));

        assert_eq!(g.len(), 3);
        assert_eq!(g.children(root), vec![a, b]);
        assert_eq!(g.parent(b), Some(root));
        assert_eq!(g.parent(root), None);
        assert_eq!(
            g.find_by_path(&json_path!["b"]).map(|n| n.id),
            Some(NodeId::sequential(3))
        );
    }

    #[test]
    fn row_value_kinds() {
        assert_eq!(RowValue::summarize(&json!("s")).kind(), ValueKind::String);
        assert_eq!(RowValue::summarize(&json!(1.5)).kind(), ValueKind::Number);
        assert_eq!(RowValue::summarize(&json!(false)).kind(), ValueKind::Boolean);
        assert_eq!(RowValue::summarize(&json!(null)).kind(), ValueKind::Null);
        assert_eq!(
            RowValue::summarize(&json!({"a": 1, "b": 2})),
            RowValue::Container {
                kind: ContainerKind::Object,
                children: 2
            }
        );
        assert_eq!(RowValue::summarize(&json!([1])).kind(), ValueKind::Array);
    }

    #[test]
    fn primitive_text_excludes_bool_and_null() {
        assert_eq!(RowValue::Str("a".into()).primitive_text(), Some("a".into()));
        assert_eq!(RowValue::Num(42.into()).primitive_text(), Some("42".into()));
        assert_eq!(RowValue::Bool(true).primitive_text(), None);
        assert_eq!(RowValue::Null.primitive_text(), None);
    }

    #[test]
    fn patch_overwrites_only_present_fields() {
        let mut g = JsonGraph::new();
        g.add_node(None, leaf(1, JsonPath::root()));
        let id = NodeId::sequential(1);

        assert!(g.update_node(
            id,
            &NodePatch {
                name: Some("Root".into()),
                ..Default::default()
            }
        ));
        let node = g.get_by_id(id).unwrap();
        assert_eq!(node.name.as_deref(), Some("Root"));
        assert_eq!(node.color, None);
        assert_eq!(node.rows.len(), 1);

        assert!(!g.update_node(NodeId::intern("missing"), &NodePatch::default()));
    }

    #[test]
    fn row_serializes_with_type_tag() {
        let row = Row::keyed("n", RowValue::Num(42.into()));
        let encoded = serde_json::to_value(&row).unwrap();
        assert_eq!(encoded, json!({"key": "n", "type": "number", "value": 42}));
    }
}
