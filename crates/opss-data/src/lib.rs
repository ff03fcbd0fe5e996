//! opss-data: Flat-file tables and record queries for the dashboard.
//!
//! Loads the record CSV and the edge CSV once, at startup, into an
//! immutable [`DataContext`] that request handlers share behind an `Arc`.

pub mod error;
pub mod loader;
pub mod context;
pub mod records;

pub use context::{DataContext, ExplorerRow};
pub use error::LoadError;
pub use loader::{load_edges, load_records, RecordTable};
pub use records::{Page, RecordQuery, SortKey};
