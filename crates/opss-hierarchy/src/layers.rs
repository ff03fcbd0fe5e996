//! Layer Explorer: find the Designated standards a selection hangs off.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::label::canonicalize;
use crate::table::{EdgeTable, ParentRef};

/// Hops walked upward, counting the first one.
const EXPLORER_LAYERS: usize = 3;

/// Canonical identifiers of the Designated standards related to a selection.
///
/// The first hop looks at every edge touching a selected standard, either
/// as the standard or as its parent. Root-parented standards found along
/// the way are collected; everything else is followed upward.
pub fn designated_ancestors<S: AsRef<str>>(canonical_ids: &[S], edges: &EdgeTable) -> BTreeSet<String> {
    let ids: HashSet<String> = canonical_ids
        .iter()
        .map(|id| canonicalize(id.as_ref()))
        .collect();
    let mut out = BTreeSet::new();
    if ids.is_empty() || edges.is_empty() {
        return out;
    }

    let mut pending: BTreeSet<String> = BTreeSet::new();
    let mut visited: HashSet<String> = HashSet::new();

    for edge in edges.iter() {
        let touches = ids.contains(edge.standard.canonical())
            || edge.parent.canonical().is_some_and(|p| ids.contains(p));
        if touches {
            collect(edge.standard.canonical(), &edge.parent, &mut out, &mut pending);
        }
    }

    for _ in 1..EXPLORER_LAYERS {
        visited.extend(pending.iter().cloned());
        let wanted = std::mem::take(&mut pending);
        if wanted.is_empty() {
            break;
        }
        for edge in edges.iter().filter(|e| wanted.contains(e.standard.canonical())) {
            collect(edge.standard.canonical(), &edge.parent, &mut out, &mut pending);
        }
        pending.retain(|p| !visited.contains(p));
    }

    debug!(selected = ids.len(), designated = out.len(), "layer explorer walk");
    out
}

fn collect(standard: &str, parent: &ParentRef, out: &mut BTreeSet<String>, pending: &mut BTreeSet<String>) {
    match parent {
        ParentRef::Root => {
            out.insert(standard.to_string());
        }
        ParentRef::Standard(p) => {
            pending.insert(p.clone());
        }
    }
}
