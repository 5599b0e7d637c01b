//! Node inspector: the side panel's state machine, minus its chrome.
//!
//! Open → (view | edit) → save/cancel → close. While open it follows the
//! selected node: whenever the selection points at a different node, the
//! local values are re-seeded from that node's inferred identity.

use crate::session::EditSession;
use crate::store::{DocumentStore, GraphStore};
use crate::sync::{EditOutcome, apply_edit};
use jg_core::emitter::node_content;
use jg_core::identity::DEFAULT_COLOR;
use jg_core::model::JsonNode;

#[derive(Debug, Clone, Default)]
pub struct NodeInspector {
    opened: bool,
    editing: bool,
    session: Option<EditSession>,
}

impl NodeInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the inspector for `node`.
    pub fn open(&mut self, node: &JsonNode) {
        self.opened = true;
        self.editing = false;
        self.session = Some(EditSession::begin(node));
    }

    /// Follow a selection change. The session is kept only while the
    /// selected node is unchanged; any rebuilt or different node re-seeds it.
    pub fn follow(&mut self, selected: Option<&JsonNode>) {
        match selected {
            Some(node) if self.session.as_ref().is_some_and(|s| s.is_for(node)) => {}
            Some(node) => self.session = Some(EditSession::begin(node)),
            None => {}
        }
    }

    /// Hide the inspector, discarding unsaved edits.
    pub fn close(&mut self) {
        if let Some(session) = &mut self.session {
            session.cancel();
        }
        self.editing = false;
        self.opened = false;
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn enter_edit(&mut self) {
        if self.opened && self.session.is_some() {
            self.editing = true;
        }
    }

    /// Returns `false` outside edit mode.
    pub fn set_name(&mut self, name: &str) -> bool {
        match (&mut self.session, self.editing) {
            (Some(session), true) => {
                session.set_name(name);
                true
            }
            _ => false,
        }
    }

    /// Returns `false` outside edit mode.
    pub fn set_color(&mut self, color: &str) -> bool {
        match (&mut self.session, self.editing) {
            (Some(session), true) => {
                session.set_color(color);
                true
            }
            _ => false,
        }
    }

    /// Discard local edits and leave edit mode.
    pub fn cancel(&mut self) {
        if let Some(session) = &mut self.session {
            session.cancel();
        }
        self.editing = false;
    }

    /// Commit the edit, leave edit mode, and re-seed from the new selection.
    pub fn save<D, G>(&mut self, doc: &mut D, graph: &mut G) -> EditOutcome
    where
        D: DocumentStore + ?Sized,
        G: GraphStore + ?Sized,
    {
        let outcome = match (&self.session, self.editing) {
            (Some(session), true) => apply_edit(doc, graph, session),
            _ => EditOutcome::Unchanged,
        };
        self.editing = false;
        if let Some(node) = graph.selected() {
            self.session = Some(EditSession::begin(node));
        }
        outcome
    }

    /// Leaf rows of the node as JSON (or the bare value).
    pub fn content(&self) -> String {
        self.session
            .as_ref()
            .map_or_else(|| "{}".to_string(), |s| node_content(s.node()))
    }

    /// `$["a"][0]`-style path of the node.
    pub fn json_path(&self) -> String {
        self.session
            .as_ref()
            .map_or_else(|| "$".to_string(), |s| s.node().path.to_string())
    }

    /// Name shown in the header; `-` when empty.
    pub fn display_name(&self) -> &str {
        match &self.session {
            Some(s) if !s.name().is_empty() => s.name(),
            _ => "-",
        }
    }

    pub fn display_color(&self) -> &str {
        match &self.session {
            Some(s) if !s.color().is_empty() => s.color(),
            _ => DEFAULT_COLOR,
        }
    }
}
