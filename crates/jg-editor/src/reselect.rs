//! Re-anchoring the selection after a rebuild.
//!
//! Node ids do not survive a rebuild; paths do. The selected node is found
//! again by structural path equality.

use crate::store::GraphStore;
use jg_core::model::JsonNode;
use jg_core::path::JsonPath;

/// First node whose path equals `path` segment by segment.
pub fn find_by_path<'a, I>(nodes: I, path: &JsonPath) -> Option<&'a JsonNode>
where
    I: IntoIterator<Item = &'a JsonNode>,
{
    nodes.into_iter().find(|node| &node.path == path)
}

/// Select the node at `path` in the current build.
///
/// Returns the newly selected node. When nothing matches, the selection is
/// left untouched and `None` is returned.
pub fn reselect<G: GraphStore + ?Sized>(graph: &mut G, path: &JsonPath) -> Option<JsonNode> {
    let found = find_by_path(graph.nodes(), path).cloned();
    match found {
        Some(node) => {
            log::debug!("reselected node {} at {path}", node.id);
            graph.set_selected(node.clone());
            Some(node)
        }
        None => {
            log::debug!("no node at {path} after rebuild; selection unchanged");
            None
        }
    }
}
