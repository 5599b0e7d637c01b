//! Graph builder: parsed JSON value → [`JsonGraph`].
//!
//! The walk is depth-first in document order, so node ids (`"1"`, `"2"`, ...)
//! and edge order are deterministic for a given document:
//!
//! - an object becomes a node with one row per entry;
//! - an object-valued entry becomes a child node;
//! - an array-valued entry has no node of its own; each element hangs
//!   directly off the owning node (nested arrays flatten the same way);
//! - a primitive array element becomes a single-row node with no key.

use crate::id::NodeId;
use crate::model::{ContainerKind, Edge, JsonGraph, JsonNode, Row, RowValue};
use crate::parser::parse_jsonc;
use crate::path::JsonPath;
use crate::sizing::{GraphConfig, apply_size};
use petgraph::graph::NodeIndex;
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Parse JSON/JSONC text and build its graph.
///
/// # Errors
/// Returns the parser's message when the text is not valid JSONC.
pub fn parse_graph(text: &str, config: &GraphConfig) -> Result<JsonGraph, String> {
    let doc = parse_jsonc(text)?;
    Ok(build_graph(&doc, config))
}

/// Build the graph of an already-parsed document.
#[must_use]
pub fn build_graph(doc: &Value, config: &GraphConfig) -> JsonGraph {
    let mut builder = Builder {
        graph: JsonGraph::new(),
        config,
        next_id: 1,
    };
    builder.visit_root(doc);
    log::debug!(
        "built graph: {} nodes, {} edges",
        builder.graph.len(),
        builder.graph.edges.len()
    );
    builder.graph
}

/// Where a new node hangs in the graph.
struct Link<'a> {
    parent: NodeIndex,
    parent_id: NodeId,
    key: Option<&'a str>,
    kind: ContainerKind,
}

struct Builder<'c> {
    graph: JsonGraph,
    config: &'c GraphConfig,
    next_id: usize,
}

impl Builder<'_> {
    fn visit_root(&mut self, doc: &Value) {
        let root = JsonPath::root();
        match doc {
            Value::Object(map) => {
                self.add_object(None, map, root);
            }
            Value::Array(items) => {
                let row = Row::new(None, RowValue::summarize(doc));
                let (idx, id) = self.add_node(None, root.clone(), vec![row]);
                let targets = self.add_elements(idx, id, None, items, &root);
                self.set_row_targets(idx, 0, targets);
            }
            scalar => {
                let row = Row::new(None, RowValue::summarize(scalar));
                self.add_node(None, root, vec![row]);
            }
        }
    }

    /// Add an object node and, recursively, its nested containers.
    fn add_object(
        &mut self,
        link: Option<Link<'_>>,
        map: &Map<String, Value>,
        path: JsonPath,
    ) -> NodeId {
        let rows = if map.is_empty() {
            vec![Row::new(
                None,
                RowValue::Container {
                    kind: ContainerKind::Object,
                    children: 0,
                },
            )]
        } else {
            map.iter()
                .map(|(key, value)| Row::keyed(key, RowValue::summarize(value)))
                .collect()
        };
        let (idx, id) = self.add_node(link, path.clone(), rows);

        for (row_index, (key, value)) in map.iter().enumerate() {
            let child_path = path.child(key.as_str());
            let targets = match value {
                Value::Object(child) => {
                    let link = Link {
                        parent: idx,
                        parent_id: id,
                        key: Some(key.as_str()),
                        kind: ContainerKind::Object,
                    };
                    let mut targets = SmallVec::new();
                    targets.push(self.add_object(Some(link), child, child_path));
                    targets
                }
                Value::Array(items) => {
                    self.add_elements(idx, id, Some(key.as_str()), items, &child_path)
                }
                _ => continue,
            };
            self.set_row_targets(idx, row_index, targets);
        }

        id
    }

    /// Hang every element of an array off `parent`. Returns the new node ids.
    fn add_elements(
        &mut self,
        parent: NodeIndex,
        parent_id: NodeId,
        key: Option<&str>,
        items: &[Value],
        path: &JsonPath,
    ) -> SmallVec<[NodeId; 2]> {
        let mut targets = SmallVec::new();
        for (i, item) in items.iter().enumerate() {
            let item_path = path.child(i);
            let link = Link {
                parent,
                parent_id,
                key,
                kind: ContainerKind::Array,
            };
            match item {
                Value::Object(map) => targets.push(self.add_object(Some(link), map, item_path)),
                Value::Array(inner) => {
                    targets.extend(self.add_elements(parent, parent_id, key, inner, &item_path));
                }
                scalar => {
                    let row = Row::new(None, RowValue::summarize(scalar));
                    let (_, id) = self.add_node(Some(link), item_path, vec![row]);
                    targets.push(id);
                }
            }
        }
        targets
    }

    fn add_node(
        &mut self,
        link: Option<Link<'_>>,
        path: JsonPath,
        rows: Vec<Row>,
    ) -> (NodeIndex, NodeId) {
        let id = NodeId::sequential(self.next_id);
        self.next_id += 1;

        let mut node = JsonNode::new(id, path, rows);
        if let Some(link) = &link {
            node.parent_key = link.key.map(str::to_string);
            node.parent_type = Some(link.kind);
        }
        apply_size(&mut node, self.config);
        log::trace!(
            "node {id} at {} ({} rows, {}x{})",
            node.path,
            node.rows.len(),
            node.width,
            node.height
        );

        let idx = self.graph.add_node(link.as_ref().map(|l| l.parent), node);
        if let Some(link) = link {
            self.graph.edges.push(Edge {
                id: format!("e{}-{}", link.parent_id, id),
                from: link.parent_id,
                to: id,
                text: link.key.map(str::to_string),
            });
        }
        (idx, id)
    }

    fn set_row_targets(&mut self, idx: NodeIndex, row: usize, targets: SmallVec<[NodeId; 2]>) {
        if let Some(row) = self.graph.graph[idx].rows.get_mut(row) {
            row.to = targets;
        }
    }
}
