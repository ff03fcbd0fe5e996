//! Tree normalization: dedupe, relink variants, re-disambiguate, cap depth.
//!
//! Input is the node set produced by [`crate::expand`]; output is a strict
//! tree (every node key unique, one parent each) at most `max_depth`
//! layers below the root, ready for the render adapter.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use opss_common::{Category, EdgeDetails};
use tracing::{debug, warn};

use crate::expand::expand;
use crate::label::NodeKey;
use crate::table::EdgeTable;
use crate::variants::{assign_variants, ensure_unique};

/// Designated -> Normative/Informative -> their children.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Parent of a node in the normalized tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TreeParent {
    Root,
    Node(NodeKey),
    /// The parent identifier is not a standard anywhere in the edge table.
    /// The node is kept as an isolated segment and never gets children.
    Detached(String),
}

/// One row of the normalized tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEdge {
    pub node: NodeKey,
    pub parent: TreeParent,
    pub category: Category,
    pub details: Arc<EdgeDetails>,
    /// Layer below the root, starting at 1. Detached nodes sit at 1.
    pub depth: usize,
}

#[derive(Debug, Clone)]
struct Row {
    node: NodeKey,
    parent: Option<NodeKey>,
    category: Category,
    details: Arc<EdgeDetails>,
}

/// Normalize the rows for `raw_labels` into a depth-limited strict tree.
pub fn normalize(raw_labels: &BTreeSet<NodeKey>, edges: &EdgeTable, max_depth: usize) -> Vec<TreeEdge> {
    if raw_labels.is_empty() || edges.is_empty() || max_depth == 0 {
        return Vec::new();
    }

    let mut rows = collect_rows(raw_labels, edges);
    relink_variants(&mut rows);
    redisambiguate(&mut rows);
    let tree = limit_depth(rows, edges, max_depth);

    debug!(labels = raw_labels.len(), nodes = tree.len(), max_depth, "normalized subtree");
    tree
}

/// Expand a selection and normalize it in one go.
pub fn relevant_subtree<S: AsRef<str>>(
    canonical_ids: &[S],
    edges: &EdgeTable,
    show_grandchildren: bool,
    max_depth: usize,
) -> Vec<TreeEdge> {
    let labels = expand(canonical_ids, edges, show_grandchildren);
    normalize(&labels, edges, max_depth)
}

/// Steps 1 and 2: filter, canonicalize, dedupe, sort, rank occurrences.
///
/// Child rows match on the canonical identifier. Root rows match on the
/// exact key, so only the expanded Designated occurrences sit at the top.
fn collect_rows(raw_labels: &BTreeSet<NodeKey>, edges: &EdgeTable) -> Vec<Row> {
    let wanted: HashSet<&str> = raw_labels.iter().map(NodeKey::canonical).collect();

    let mut rows: Vec<Row> = edges
        .iter()
        .filter(|e| {
            if e.parent.is_root() {
                raw_labels.contains(&e.standard)
            } else {
                wanted.contains(e.standard.canonical())
            }
        })
        .map(|e| Row {
            node: e.standard.to_plain(),
            parent: e.parent.canonical().map(NodeKey::plain),
            category: e.category,
            details: Arc::clone(&e.details),
        })
        .collect();

    rows.sort_by(|a, b| {
        (a.category, &a.node, &a.parent, &a.details).cmp(&(b.category, &b.node, &b.parent, &b.details))
    });
    dedupe_pairs(&mut rows);

    let keys = assign_variants(rows.iter().map(|r| r.node.canonical()));
    for (row, key) in rows.iter_mut().zip(keys) {
        row.node = key;
    }
    rows
}

/// Step 3: each marked variant gets its own copy of the bare form's children.
fn relink_variants(rows: &mut Vec<Row>) {
    let mut copies = Vec::new();
    for variant in rows.iter().map(|r| &r.node).filter(|k| k.is_variant()) {
        let bare = variant.to_plain();
        copies.extend(
            rows.iter()
                .filter(|r| r.parent.as_ref() == Some(&bare) && r.node.canonical() != variant.canonical())
                .map(|r| Row {
                    parent: Some(variant.clone()),
                    ..r.clone()
                }),
        );
    }
    rows.extend(copies);
    dedupe_pairs(rows);
}

/// Step 4: copies share their original's key, so bump them apart.
fn redisambiguate(rows: &mut [Row]) {
    let mut keys: Vec<NodeKey> = rows.iter().map(|r| r.node.clone()).collect();
    ensure_unique(&mut keys);
    for (row, key) in rows.iter_mut().zip(keys) {
        row.node = key;
    }
}

/// Step 5: walk down from the root one layer at a time.
fn limit_depth(rows: Vec<Row>, edges: &EdgeTable, max_depth: usize) -> Vec<TreeEdge> {
    let mut slots: Vec<Option<TreeEdge>> = (0..rows.len()).map(|_| None).collect();
    // canonical identifiers from the root down to (and including) each placed node
    let mut lineage: HashMap<NodeKey, Vec<String>> = HashMap::new();
    let mut frontier: HashSet<NodeKey> = HashSet::new();

    for depth in 1..=max_depth {
        let mut next = HashSet::new();

        for (i, row) in rows.iter().enumerate() {
            if slots[i].is_some() {
                continue;
            }
            let ancestors = match &row.parent {
                None if depth == 1 => Vec::new(),
                Some(p) if frontier.contains(p) => lineage.get(p).cloned().unwrap_or_default(),
                _ => continue,
            };
            if ancestors.iter().any(|a| a == row.node.canonical()) {
                warn!(
                    standard = row.node.canonical(),
                    depth,
                    "hierarchy cycle detected, dropping edge back to an ancestor"
                );
                continue;
            }

            let mut own = ancestors;
            own.push(row.node.canonical().to_string());
            lineage.insert(row.node.clone(), own);
            next.insert(row.node.clone());

            slots[i] = Some(TreeEdge {
                node: row.node.clone(),
                parent: row.parent.clone().map_or(TreeParent::Root, TreeParent::Node),
                category: row.category,
                details: Arc::clone(&row.details),
                depth,
            });
        }

        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    for (slot, row) in slots.iter_mut().zip(&rows) {
        if slot.is_some() {
            continue;
        }
        if let Some(parent) = &row.parent {
            if !edges.contains_standard(parent.canonical()) {
                *slot = Some(TreeEdge {
                    node: row.node.clone(),
                    parent: TreeParent::Detached(parent.canonical().to_string()),
                    category: row.category,
                    details: Arc::clone(&row.details),
                    depth: 1,
                });
            }
        }
    }

    slots.into_iter().flatten().collect()
}

/// Keep the first row of every (standard, parent) pair.
fn dedupe_pairs(rows: &mut Vec<Row>) {
    let mut seen = HashSet::new();
    rows.retain(|r| seen.insert((r.node.clone(), r.parent.clone())));
}
