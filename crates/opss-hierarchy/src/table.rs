//! The immutable reference (edge) table.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use opss_common::{Category, EdgeDetails};

use crate::label::{canonicalize, is_root_sentinel, NodeKey};

/// Parent side of a base edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// The root sentinel: a Designated standard with no real parent.
    Root,
    /// Canonical identifier of the parent standard.
    Standard(String),
}

impl ParentRef {
    pub fn from_raw(parent: &str) -> Self {
        if is_root_sentinel(parent) {
            ParentRef::Root
        } else {
            ParentRef::Standard(canonicalize(parent.trim()))
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, ParentRef::Root)
    }

    /// Canonical parent identifier, `None` for the root.
    pub fn canonical(&self) -> Option<&str> {
        match self {
            ParentRef::Root => None,
            ParentRef::Standard(id) => Some(id.as_str()),
        }
    }
}

/// One edge as read from the file, before disambiguation.
#[derive(Debug, Clone)]
pub struct RawEdge {
    pub standard: String,
    pub parent: String,
    pub category: Category,
    pub details: EdgeDetails,
}

impl RawEdge {
    pub fn new(standard: &str, parent: &str, category: Category) -> Self {
        Self {
            standard: standard.to_string(),
            parent: parent.to_string(),
            category,
            details: EdgeDetails::default(),
        }
    }

    pub fn with_details(mut self, details: EdgeDetails) -> Self {
        self.details = details;
        self
    }
}

/// A disambiguated edge: the standard is keyed by its occurrence.
#[derive(Debug, Clone)]
pub struct Edge {
    pub standard: NodeKey,
    pub parent: ParentRef,
    pub category: Category,
    pub details: Arc<EdgeDetails>,
}

/// Edge table shared read-only across every interaction.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    edges: Vec<Edge>,
    standards: HashSet<String>,
}

impl EdgeTable {
    /// Build the table, keying each standard by the 0-based rank of its
    /// canonical identifier in file order.
    pub fn from_raw<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawEdge>,
    {
        let mut ranks: HashMap<String, usize> = HashMap::new();
        let mut standards = HashSet::new();

        let edges: Vec<Edge> = rows
            .into_iter()
            .map(|raw| {
                let canonical = canonicalize(raw.standard.trim());
                let rank = ranks.entry(canonical.clone()).or_insert(0);
                let standard = NodeKey::new(&canonical, *rank);
                *rank += 1;
                standards.insert(canonical);

                Edge {
                    standard,
                    parent: ParentRef::from_raw(&raw.parent),
                    category: raw.category,
                    details: Arc::new(raw.details),
                }
            })
            .collect();

        Self { edges, standards }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of distinct canonical standards.
    pub fn standard_count(&self) -> usize {
        self.standards.len()
    }

    /// Does any edge have this canonical identifier as its standard?
    pub fn contains_standard(&self, canonical: &str) -> bool {
        self.standards.contains(canonical)
    }
}

impl FromIterator<RawEdge> for EdgeTable {
    fn from_iter<I: IntoIterator<Item = RawEdge>>(iter: I) -> Self {
        Self::from_raw(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_standards_get_ranked_keys() {
        let table = EdgeTable::from_raw(vec![
            RawEdge::new("A", "Standard", Category::Designated),
            RawEdge::new("B", "A", Category::Normative),
            RawEdge::new("B", "X", Category::Normative),
        ]);
        let keys: Vec<_> = table.iter().map(|e| e.standard.clone()).collect();
        assert_eq!(keys[1], NodeKey::new("B", 0));
        assert_eq!(keys[2], NodeKey::new("B", 1));
    }

    #[test]
    fn test_inaccessible_tag_is_stripped_on_load() {
        let table = EdgeTable::from_raw(vec![
            RawEdge::new("EN 1(inaccessible)", "EN 0(inaccessible)", Category::Normative),
        ]);
        let edge = &table.edges()[0];
        assert_eq!(edge.standard.canonical(), "EN 1");
        assert_eq!(edge.parent, ParentRef::Standard("EN 0".to_string()));
        assert!(table.contains_standard("EN 1"));
        assert_eq!(table.standard_count(), 1);
        assert!(!table.contains_standard("EN 0"));
    }

    #[test]
    fn test_root_sentinels_become_root() {
        let table: EdgeTable = vec![
            RawEdge::new("A", "Standard", Category::Designated),
            RawEdge::new("B", "root", Category::Designated),
        ]
        .into_iter()
        .collect();
        assert!(table.iter().all(|e| e.parent.is_root()));
    }
}
