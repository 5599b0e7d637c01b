//! Edit session: the local (name, color) values typed into the inspector for
//! one selected node, next to the identity inferred when the session began.

use jg_core::identity::{Identity, infer_identity};
use jg_core::model::JsonNode;

#[derive(Debug, Clone)]
pub struct EditSession {
    /// Snapshot of the node being edited.
    node: JsonNode,
    /// Identity captured at `begin`; edits are compared against this, never
    /// against a recomputed one.
    original: Identity,
    name: String,
    color: String,
}

impl EditSession {
    /// Start editing `node`, seeding the local values from its inferred identity.
    pub fn begin(node: &JsonNode) -> Self {
        let original = infer_identity(node);
        Self {
            node: node.clone(),
            name: original.name.clone(),
            color: original.color.clone(),
            original,
        }
    }

    pub fn node(&self) -> &JsonNode {
        &self.node
    }

    pub fn original(&self) -> &Identity {
        &self.original
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn changed_name(&self) -> bool {
        self.name != self.original.name
    }

    pub fn changed_color(&self) -> bool {
        self.color != self.original.color
    }

    pub fn is_dirty(&self) -> bool {
        self.changed_name() || self.changed_color()
    }

    /// Discard local edits, back to freshly inferred values.
    pub fn cancel(&mut self) {
        let fresh = infer_identity(&self.node);
        self.name = fresh.name;
        self.color = fresh.color;
    }

    /// Does this session still describe `node`?
    ///
    /// Ids restart on every build, so the whole snapshot is compared: a
    /// rebuilt node with the same id and path but new rows is a new node.
    pub fn is_for(&self, node: &JsonNode) -> bool {
        &self.node == node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jg_core::id::NodeId;
    use jg_core::model::{Row, RowValue};
    use jg_core::path::JsonPath;

    fn apple() -> JsonNode {
        JsonNode::new(
            NodeId::sequential(2),
            JsonPath::root().child("user"),
            vec![
                Row::keyed("name", RowValue::Str("Apple".into())),
                Row::keyed("color", RowValue::Str("#111111".into())),
            ],
        )
    }

    #[test]
    fn begins_with_inferred_identity() {
        let session = EditSession::begin(&apple());
        assert_eq!(session.name(), "Apple");
        assert_eq!(session.color(), "#111111");
        assert!(!session.is_dirty());
    }

    #[test]
    fn edits_compare_against_captured_identity() {
        let mut session = EditSession::begin(&apple());
        session.set_name("Banana");
        assert!(session.changed_name());
        assert!(!session.changed_color());

        session.set_name("Apple");
        assert!(!session.is_dirty());
    }

    #[test]
    fn cancel_resets_local_values() {
        let mut session = EditSession::begin(&apple());
        session.set_name("Banana");
        session.set_color("#000");
        session.cancel();
        assert_eq!(session.name(), "Apple");
        assert_eq!(session.color(), "#111111");
    }

    #[test]
    fn belongs_to_an_identical_snapshot_only() {
        let node = apple();
        let session = EditSession::begin(&node);
        assert!(session.is_for(&node.clone()));

        let mut moved = node.clone();
        moved.path = JsonPath::root().child("other");
        assert!(!session.is_for(&moved));

        let mut rebuilt = node.clone();
        rebuilt.rows[0].value = RowValue::Str("Pear".into());
        assert_eq!(rebuilt.id, node.id);
        assert!(!session.is_for(&rebuilt));
    }
}
