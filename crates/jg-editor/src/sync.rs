//! Edit synchronizer: inspector edits → document text, or → node.
//!
//! A saved (name, color) edit is written into the authoritative document
//! whenever the edited fields can be traced to row keys at a resolvable
//! path. The document is then re-emitted, the graph rebuilt from it, and the
//! selection re-anchored by path.
//!
//! Anything that cannot be traced (no backing key, stale path, unparsable
//! text, scalar target) degrades to an in-memory patch of the node. That is
//! never an error: the outcome says which way the edit went and why.

use crate::reselect::reselect;
use crate::session::EditSession;
use crate::store::{Document, DocumentStore, GraphStore, GraphView};
use jg_core::builder::parse_graph;
use jg_core::emitter::emit_document;
use jg_core::id::NodeId;
use jg_core::identity::{color_row, name_key};
use jg_core::model::{JsonNode, NodePatch, RowValue, ValueKind};
use jg_core::parser::parse_jsonc;
use jg_core::path::JsonPath;
use jg_core::sizing::GraphConfig;
use serde_json::{Number, Value};
use std::fmt;

// ─── Outcomes ────────────────────────────────────────────────────────────

/// Why an edit stayed in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The document text did not parse at save time.
    Parse(String),
    /// The node's path no longer exists in the document.
    PathUnresolved,
    /// The path resolves to something that cannot hold the edited keys.
    NotContainer,
    /// No changed field maps to a document key.
    NoDocumentKey,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Parse(e) => write!(f, "document does not parse: {e}"),
            FallbackReason::PathUnresolved => f.write_str("node path no longer resolves"),
            FallbackReason::NotContainer => f.write_str("node path does not point at an object"),
            FallbackReason::NoDocumentKey => f.write_str("edited fields have no document key"),
        }
    }
}

/// What a save did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Nothing changed; nothing was written.
    Unchanged,
    /// The document was rewritten and republished. `patched_in_memory` is set
    /// when some changed field had no key and was patched onto the
    /// re-selected node instead.
    DocumentUpdated { patched_in_memory: bool },
    /// Only the in-memory node was patched.
    InMemory(FallbackReason),
}

// ─── Synchronizer ────────────────────────────────────────────────────────

/// Commit `session` to the document when possible, to the node otherwise.
pub fn apply_edit<D, G>(doc: &mut D, graph: &mut G, session: &EditSession) -> EditOutcome
where
    D: DocumentStore + ?Sized,
    G: GraphStore + ?Sized,
{
    let node = session.node();
    let changed_name = session.changed_name();
    let changed_color = session.changed_color();

    if !changed_name && !changed_color {
        log::debug!("edit of node {} is a no-op", node.id);
        return EditOutcome::Unchanged;
    }

    let name_key = name_key(node, &session.original().name).filter(|_| changed_name);
    let color_key = color_row(node)
        .and_then(|row| row.key())
        .filter(|_| changed_color);

    if name_key.is_none() && color_key.is_none() {
        return patch_in_memory(graph, session, None, None, FallbackReason::NoDocumentKey);
    }

    let mut value = match parse_jsonc(doc.text()) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("edit of node {} kept in memory: {e}", node.id);
            return patch_in_memory(graph, session, name_key, color_key, FallbackReason::Parse(e));
        }
    };

    let mut writes = Vec::with_capacity(2);
    if let Some(key) = name_key {
        writes.push((key, coerce(row_kind(node, key), session.name())));
    }
    if let Some(key) = color_key {
        // Colors are written verbatim, whatever the row held before.
        writes.push((key, Value::String(session.color().to_string())));
    }

    let written = match node.path.resolve_mut(&mut value) {
        Some(target) => write_fields(target, &writes),
        None => Err(FallbackReason::PathUnresolved),
    };
    if let Err(reason) = written {
        log::warn!("edit of node {} at {} kept in memory: {reason}", node.id, node.path);
        return patch_in_memory(graph, session, name_key, color_key, reason);
    }

    doc.set_text(emit_document(&value), true);
    log::debug!("edit of node {} written to document at {}", node.id, node.path);
    if let Err(e) = graph.load(doc.text()) {
        // Just emitted from a parsed value; this would be an emitter bug.
        log::warn!("graph rebuild after edit failed: {e}");
    }

    let leftover = NodePatch {
        name: (changed_name && name_key.is_none()).then(|| session.name().to_string()),
        color: (changed_color && color_key.is_none()).then(|| session.color().to_string()),
        rows: None,
    };

    let reselected = reselect(graph, &node.path);
    let patched_in_memory = match reselected {
        Some(mut fresh) if !leftover.is_empty() => {
            graph.update_node(fresh.id, &leftover);
            fresh.apply_patch(&leftover);
            graph.set_selected(fresh);
            true
        }
        _ => false,
    };

    EditOutcome::DocumentUpdated { patched_in_memory }
}

/// Coerce an edited string to a JSON value, guided by the original row type.
///
/// - `number`: lenient numeric parse; anything non-finite or unparsable
///   becomes `null`, which is what an invalid number serializes to;
/// - `boolean`: `true` only for the literal `"true"`;
/// - the literal `"null"` becomes `null`;
/// - everything else stays a string.
pub fn coerce(kind: ValueKind, input: &str) -> Value {
    match kind {
        ValueKind::Number => parse_number(input).map_or(Value::Null, Value::Number),
        ValueKind::Boolean => Value::Bool(input == "true"),
        _ if input == "null" => Value::Null,
        _ => Value::String(input.to_string()),
    }
}

/// Number parsing with the leniency of a UI number field: surrounding
/// whitespace ignored, empty means zero, `0x`/`0o`/`0b` prefixes accepted.
fn parse_number(input: &str) -> Option<Number> {
    let s = input.trim();
    if s.is_empty() {
        return Some(Number::from(0));
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).ok().map(Number::from);
        }
    }

    // Rust accepts `inf`/`nan` spellings that a JSON number field must not.
    if s.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return None;
    }
    let n: f64 = s.parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Some(Number::from(n as i64));
    }
    Number::from_f64(n)
}

fn row_kind(node: &JsonNode, key: &str) -> ValueKind {
    node.rows
        .iter()
        .find(|row| row.key() == Some(key))
        .map_or(ValueKind::String, |row| row.kind())
}

/// Write `(key, value)` pairs into the resolved document location.
fn write_fields(target: &mut Value, writes: &[(&str, Value)]) -> Result<(), FallbackReason> {
    match target {
        Value::Object(map) => {
            for (key, value) in writes {
                map.insert((*key).to_string(), value.clone());
            }
            Ok(())
        }
        Value::Array(items) => {
            for (key, value) in writes {
                let slot = key
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| items.get_mut(i))
                    .ok_or(FallbackReason::NotContainer)?;
                *slot = value.clone();
            }
            Ok(())
        }
        _ => Err(FallbackReason::NotContainer),
    }
}

/// Apply the changed fields to the node only.
fn patch_in_memory<G: GraphStore + ?Sized>(
    graph: &mut G,
    session: &EditSession,
    name_key: Option<&str>,
    color_key: Option<&str>,
    reason: FallbackReason,
) -> EditOutcome {
    let node = session.node();
    let mut patch = NodePatch {
        name: session.changed_name().then(|| session.name().to_string()),
        color: session.changed_color().then(|| session.color().to_string()),
        rows: None,
    };

    let mut rows = node.rows.clone();
    let mut replaced = false;
    for row in &mut rows {
        let edited = match row.key() {
            Some(key) if Some(key) == name_key => Some(coerce(row.kind(), session.name())),
            Some(key) if Some(key) == color_key => {
                Some(Value::String(session.color().to_string()))
            }
            _ => None,
        };
        if let Some(value) = edited {
            row.value = RowValue::summarize(&value);
            replaced = true;
        }
    }
    if replaced {
        patch.rows = Some(rows);
    }

    // Ids are per build: only patch the graph's node if it is still this one.
    let still_present = graph
        .nodes()
        .any(|n| n.id == node.id && n.path == node.path);
    if still_present {
        graph.update_node(node.id, &patch);
    } else {
        log::debug!("node {} not in current build; patching selection only", node.id);
    }

    let mut patched = node.clone();
    patched.apply_patch(&patch);
    graph.set_selected(patched);

    log::debug!("edit of node {} applied in memory ({reason})", node.id);
    EditOutcome::InMemory(reason)
}

// ─── Engine ──────────────────────────────────────────────────────────────

/// Owns a document and its graph and keeps them in step.
///
/// Text edits flow in through [`set_text`](Self::set_text); inspector edits
/// through [`save_edit`](Self::save_edit). Either way the graph is rebuilt
/// wholesale and the selection re-anchored by path.
#[derive(Debug, Clone, Default)]
pub struct SyncEngine {
    pub document: Document,
    pub view: GraphView,
}

impl SyncEngine {
    /// Load a document.
    ///
    /// # Errors
    /// Returns the parser's message when `text` is not valid JSONC.
    pub fn from_text(text: &str, config: GraphConfig) -> Result<Self, String> {
        let graph = parse_graph(text, &config)?;
        let mut view = GraphView::new(config);
        view.graph = graph;
        Ok(Self {
            document: Document::new(text),
            view,
        })
    }

    /// Replace the text from the text-editor side.
    ///
    /// The text is always stored (the text editor owns what the user typed);
    /// the graph is only rebuilt when it parses.
    ///
    /// # Errors
    /// Returns the parser's message; the previous graph stays in place.
    pub fn set_text(&mut self, text: &str) -> Result<(), String> {
        self.document.set_text(text.to_string(), true);
        self.view.load(text)?;
        if let Some(path) = self.view.selected().map(|n| n.path.clone()) {
            reselect(&mut self.view, &path);
        }
        Ok(())
    }

    pub fn current_text(&self) -> &str {
        self.document.text()
    }

    pub fn selected(&self) -> Option<&JsonNode> {
        self.view.selected()
    }

    pub fn select_by_id(&mut self, id: NodeId) -> bool {
        match self.view.graph.get_by_id(id).cloned() {
            Some(node) => {
                self.view.set_selected(node);
                true
            }
            None => false,
        }
    }

    pub fn select_path(&mut self, path: &JsonPath) -> bool {
        reselect(&mut self.view, path).is_some()
    }

    /// Start an edit session on the selected node.
    pub fn begin_edit(&self) -> Option<EditSession> {
        self.view.selected().map(EditSession::begin)
    }

    pub fn save_edit(&mut self, session: &EditSession) -> EditOutcome {
        apply_edit(&mut self.document, &mut self.view, session)
    }
}
