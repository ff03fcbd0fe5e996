//! Property tests for the hierarchy engine.
//!
//! 1. Canonicalization is total and idempotent
//! 2. Disambiguation yields unique labels with unchanged canonical forms
//! 3. Expansion of nothing is nothing
//! 4. Normalized trees are strict and depth-limited
//! 5. Only selected standards sit directly under the root

use std::collections::{BTreeSet, HashMap, HashSet};

use opss_common::Category;
use opss_hierarchy::{
    canonicalize, disambiguate, expand, normalize, relevant_subtree, EdgeTable, NodeKey, RawEdge,
    TreeParent, DEFAULT_MAX_DEPTH,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Labels built from a small alphabet so collisions are frequent.
fn label_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("A"),
            Just("B"),
            Just(" 1"),
            Just("\u{200B}"),
            Just("\u{2060}"),
            Just("(inaccessible)"),
            Just("("),
        ],
        0..6,
    )
    .prop_map(|parts| parts.concat())
}

const NAMES: [&str; 6] = ["S0", "S1", "S2", "S3", "S4", "S5"];

/// Random edge tables over a handful of standards, cycles included.
fn table_strategy() -> impl Strategy<Value = EdgeTable> {
    prop::collection::vec((0..NAMES.len(), 0..=NAMES.len(), 0..Category::ALL.len()), 0..16).prop_map(
        |rows| {
            rows.into_iter()
                .map(|(s, p, c)| {
                    // one past the end stands for the root
                    let parent = NAMES.get(p).copied().unwrap_or("Standard");
                    RawEdge::new(NAMES[s], parent, Category::ALL[c])
                })
                .collect()
        },
    )
}

fn selection_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(NAMES.to_vec()), 0..3)
}

// ============================================================================
// Labels
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn canonicalize_is_idempotent(label in label_strategy()) {
        let once = canonicalize(&label);
        prop_assert_eq!(canonicalize(&once), once.clone());
        prop_assert!(!once.contains("(inaccessible)"));
    }

    #[test]
    fn disambiguate_is_unique_and_reversible(labels in prop::collection::vec(label_strategy(), 0..12)) {
        let out = disambiguate(&labels);
        prop_assert_eq!(out.len(), labels.len());

        let unique: HashSet<&String> = out.iter().collect();
        prop_assert_eq!(unique.len(), out.len());

        for (raw, shown) in labels.iter().zip(&out) {
            prop_assert_eq!(canonicalize(shown), canonicalize(raw));
        }
    }

    #[test]
    fn disambiguate_is_identity_after_canonicalize_on_clean_labels(
        labels in prop::collection::vec("[A-C][0-9]{0,2}", 0..12)
    ) {
        let out = disambiguate(&labels);
        for (raw, shown) in labels.iter().zip(&out) {
            prop_assert_eq!(&canonicalize(shown), raw);
        }
    }

    #[test]
    fn node_key_survives_display(label in label_strategy(), variant in 0usize..4) {
        let key = NodeKey::new(&label, variant);
        prop_assert_eq!(NodeKey::parse(&key.to_string()), key);
    }
}

// ============================================================================
// Expansion and normalization
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn expand_of_nothing_is_empty(edges in table_strategy(), grandchildren in any::<bool>()) {
        let none: [&str; 0] = [];
        prop_assert!(expand(&none, &edges, grandchildren).is_empty());
    }

    #[test]
    fn normalized_tree_is_strict(
        edges in table_strategy(),
        selected in selection_strategy(),
        grandchildren in any::<bool>(),
    ) {
        let tree = relevant_subtree(&selected, &edges, grandchildren, DEFAULT_MAX_DEPTH);

        let keys: HashSet<&NodeKey> = tree.iter().map(|e| &e.node).collect();
        prop_assert_eq!(keys.len(), tree.len());

        let pairs: HashSet<(&NodeKey, &TreeParent)> = tree.iter().map(|e| (&e.node, &e.parent)).collect();
        prop_assert_eq!(pairs.len(), tree.len());
    }

    #[test]
    fn only_selected_standards_are_top_level(
        edges in table_strategy(),
        selected in selection_strategy(),
        grandchildren in any::<bool>(),
    ) {
        let tree = relevant_subtree(&selected, &edges, grandchildren, DEFAULT_MAX_DEPTH);
        for edge in tree.iter().filter(|e| e.parent == TreeParent::Root) {
            prop_assert!(selected.iter().any(|s| *s == edge.node.canonical()));
        }
    }

    #[test]
    fn normalized_tree_respects_depth(
        edges in table_strategy(),
        max_depth in 1usize..=DEFAULT_MAX_DEPTH,
    ) {
        let every: BTreeSet<NodeKey> = edges.iter().map(|e| e.standard.clone()).collect();
        let tree = normalize(&every, &edges, max_depth);
        let depth_of: HashMap<&NodeKey, usize> = tree.iter().map(|e| (&e.node, e.depth)).collect();

        for edge in &tree {
            prop_assert!(edge.depth >= 1 && edge.depth <= max_depth);
            match &edge.parent {
                TreeParent::Node(parent) => {
                    prop_assert_eq!(depth_of.get(parent).copied(), Some(edge.depth - 1));
                }
                TreeParent::Root | TreeParent::Detached(_) => prop_assert_eq!(edge.depth, 1),
            }
        }
    }
}
