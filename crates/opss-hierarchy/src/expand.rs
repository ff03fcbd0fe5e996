//! Ancestor/descendant expansion of a selection.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::label::{canonicalize, NodeKey};
use crate::table::EdgeTable;

/// Gather every node relevant to the selected canonical identifiers.
///
/// 1. Designated: selected standards sitting directly under the root.
/// 2. Children: standards whose parent is selected.
/// 3. Grandchildren (optional): standards whose parent is one of the
///    children, one layer further down.
///
/// An empty selection yields an empty set.
pub fn expand<S: AsRef<str>>(
    canonical_ids: &[S],
    edges: &EdgeTable,
    show_grandchildren: bool,
) -> BTreeSet<NodeKey> {
    let ids: HashSet<String> = canonical_ids
        .iter()
        .map(|id| canonicalize(id.as_ref()))
        .collect();
    if ids.is_empty() || edges.is_empty() {
        return BTreeSet::new();
    }

    let designated = edges
        .iter()
        .filter(|e| e.parent.is_root() && ids.contains(e.standard.canonical()))
        .map(|e| e.standard.clone());

    let children: BTreeSet<NodeKey> = edges
        .iter()
        .filter(|e| e.parent.canonical().is_some_and(|p| ids.contains(p)))
        .map(|e| e.standard.clone())
        .collect();

    let mut out: BTreeSet<NodeKey> = designated.collect();
    out.extend(children.iter().cloned());

    if show_grandchildren {
        let child_ids: HashSet<&str> = children.iter().map(NodeKey::canonical).collect();
        out.extend(
            edges
                .iter()
                .filter(|e| e.parent.canonical().is_some_and(|p| child_ids.contains(p)))
                .map(|e| e.standard.clone()),
        );
    }

    debug!(
        selected = ids.len(),
        children = children.len(),
        total = out.len(),
        show_grandchildren,
        "expanded selection"
    );
    out
}
