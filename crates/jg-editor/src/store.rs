//! State containers the editor reads and publishes to.
//!
//! The synchronizer never reaches for global state: it is handed a
//! [`DocumentStore`] (the authoritative text) and a [`GraphStore`] (the node
//! projection plus the current selection). Hosts implement these over their
//! own state; [`Document`] and [`GraphView`] are the in-process versions.

use jg_core::builder::parse_graph;
use jg_core::id::NodeId;
use jg_core::model::{JsonGraph, JsonNode, NodePatch};
use jg_core::sizing::GraphConfig;

// ─── Document ────────────────────────────────────────────────────────────

/// Holder of the authoritative document text.
pub trait DocumentStore {
    fn text(&self) -> &str;

    /// Publish new text. Observers must treat it as a fresh snapshot.
    fn set_text(&mut self, text: String, has_changes: bool);
}

/// In-memory document with change tracking.
#[derive(Debug, Clone, Default)]
pub struct Document {
    text: String,
    has_changes: bool,
    /// Bumped on every publish.
    revision: u64,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            has_changes: false,
            revision: 0,
        }
    }

    /// Unsaved changes since load.
    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl DocumentStore for Document {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String, has_changes: bool) {
        self.text = text;
        self.has_changes = has_changes;
        self.revision += 1;
    }
}

// ─── Graph ───────────────────────────────────────────────────────────────

/// Holder of the node projection and the selected node.
pub trait GraphStore {
    /// Nodes of the current build, in document order.
    fn nodes(&self) -> Box<dyn Iterator<Item = &JsonNode> + '_>;

    fn selected(&self) -> Option<&JsonNode>;

    fn set_selected(&mut self, node: JsonNode);

    /// Patch a node in place, without touching the document.
    /// Returns `false` if `id` is not in the current build.
    fn update_node(&mut self, id: NodeId, patch: &NodePatch) -> bool;

    /// Rebuild from freshly published document text.
    ///
    /// The selection snapshot is left as it is; re-anchoring it is the
    /// caller's job.
    ///
    /// # Errors
    /// Returns the parser's message; the previous build stays in place.
    fn load(&mut self, text: &str) -> Result<(), String>;
}

/// In-process graph store.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    pub graph: JsonGraph,
    pub config: GraphConfig,
    /// Snapshot of the selected node (owned; survives rebuilds).
    selected: Option<JsonNode>,
}

impl GraphView {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            graph: JsonGraph::new(),
            config,
            selected: None,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

impl GraphStore for GraphView {
    fn nodes(&self) -> Box<dyn Iterator<Item = &JsonNode> + '_> {
        Box::new(self.graph.nodes())
    }

    fn selected(&self) -> Option<&JsonNode> {
        self.selected.as_ref()
    }

    fn set_selected(&mut self, node: JsonNode) {
        self.selected = Some(node);
    }

    fn update_node(&mut self, id: NodeId, patch: &NodePatch) -> bool {
        self.graph.update_node(id, patch)
    }

    fn load(&mut self, text: &str) -> Result<(), String> {
        self.graph = parse_graph(text, &self.config)?;
        Ok(())
    }
}
