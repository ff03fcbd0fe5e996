//! The read-only data context every request works from.

use std::path::Path;

use opss_common::StandardRecord;
use opss_hierarchy::{canonicalize, designated_ancestors, EdgeTable};
use serde::Serialize;
use tracing::{error, info};

use crate::error::Result;
use crate::loader::{load_edges, load_records, RecordTable};
use crate::records::{paginate, run_query, Page, RecordQuery};

/// Row of the Layer Explorer table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplorerRow {
    #[serde(rename = "Identifier")]
    pub identifier: String,
    #[serde(rename = "Title")]
    pub title: String,
}

/// Both base tables, loaded once and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct DataContext {
    columns: Vec<String>,
    records: Vec<StandardRecord>,
    edges: EdgeTable,
}

impl DataContext {
    pub fn new(records: RecordTable, edges: EdgeTable) -> Self {
        let mut columns = records.columns;
        if columns.is_empty() {
            columns = StandardRecord::COLUMNS.iter().map(|c| c.to_string()).collect();
        }
        Self {
            columns,
            records: records.records,
            edges,
        }
    }

    pub fn load(records_path: &Path, edges_path: &Path) -> Result<Self> {
        let records = load_records(records_path)?;
        let edges = load_edges(edges_path)?;
        Ok(Self::new(records, edges))
    }

    /// Load both tables, degrading to empty ones if either fails.
    pub fn load_or_empty(records_path: &Path, edges_path: &Path) -> Self {
        match Self::load(records_path, edges_path) {
            Ok(ctx) => {
                info!(
                    records = ctx.records.len(),
                    edges = ctx.edges.len(),
                    "data context ready"
                );
                ctx
            }
            Err(e) => {
                error!(target: "opss::error", "Error loading data: {e}");
                Self::new(RecordTable::default(), EdgeTable::default())
            }
        }
    }

    pub fn records(&self) -> &[StandardRecord] {
        &self.records
    }

    pub fn edges(&self) -> &EdgeTable {
        &self.edges
    }

    /// Record table headers, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// First record whose identifier matches, marks and tags ignored.
    pub fn find_record(&self, identifier: &str) -> Option<&StandardRecord> {
        let wanted = canonicalize(identifier);
        self.records.iter().find(|r| canonicalize(&r.identifier) == wanted)
    }

    pub fn query_records(&self, query: &RecordQuery) -> Page<&StandardRecord> {
        run_query(&self.records, query)
    }

    /// Designated standards related to the selected identifiers, in
    /// record order.
    pub fn explorer_rows<S: AsRef<str>>(&self, identifiers: &[S]) -> Vec<ExplorerRow> {
        let designated = designated_ancestors(identifiers, &self.edges);
        if designated.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| designated.contains(&canonicalize(&r.identifier)))
            .map(|r| ExplorerRow {
                identifier: r.identifier.clone(),
                title: r.title.clone(),
            })
            .collect()
    }

    pub fn explorer_page<S: AsRef<str>>(&self, identifiers: &[S], page: usize, page_size: usize) -> Page<ExplorerRow> {
        paginate(self.explorer_rows(identifiers), page, page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opss_common::Category;
    use opss_hierarchy::RawEdge;

    fn record(id: &str, title: &str) -> StandardRecord {
        StandardRecord {
            identifier: id.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn context() -> DataContext {
        let records = RecordTable {
            columns: Vec::new(),
            records: vec![record("D2", "Second"), record("N", "Child"), record("D1", "First")],
        };
        let edges = EdgeTable::from_raw(vec![
            RawEdge::new("D1", "Standard", Category::Designated),
            RawEdge::new("D2", "Standard", Category::Designated),
            RawEdge::new("N", "D1", Category::Normative),
            RawEdge::new("N", "D2", Category::Normative),
        ]);
        DataContext::new(records, edges)
    }

    #[test]
    fn test_explorer_rows_follow_record_order() {
        let rows = context().explorer_rows(&["N"]);
        let ids: Vec<&str> = rows.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["D2", "D1"]);
    }

    #[test]
    fn test_explorer_rows_empty_selection() {
        let none: [&str; 0] = [];
        assert!(context().explorer_rows(&none).is_empty());
    }

    #[test]
    fn test_find_record_ignores_marks() {
        let ctx = context();
        assert_eq!(ctx.find_record("D1\u{200B}").map(|r| r.title.as_str()), Some("First"));
        assert!(ctx.find_record("nope").is_none());
    }

    #[test]
    fn test_default_columns_when_table_empty() {
        assert_eq!(context().columns().len(), StandardRecord::COLUMNS.len());
    }

    #[test]
    fn test_load_or_empty_degrades() {
        let ctx = DataContext::load_or_empty(Path::new("/missing/records.csv"), Path::new("/missing/edges.csv"));
        assert!(ctx.records().is_empty());
        assert!(ctx.edges().is_empty());
    }
}
