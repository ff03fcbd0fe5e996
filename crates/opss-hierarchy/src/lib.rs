//! opss-hierarchy: Reconstruction of the standards hierarchy.
//!
//! Takes the flat `(standard, parent, type)` edge table, with its repeated
//! and variant-laden identifiers, and derives a clean, depth-limited tree
//! with unique node keys for every selection the dashboard makes.
//!
//! Pipeline per interaction:
//!   selection -> [`expand`] -> [`normalize`] -> tree rows for rendering
//!
//! Nothing here mutates the [`EdgeTable`]; every call derives its own rows.

pub mod label;
pub mod variants;
pub mod table;
pub mod expand;
pub mod normalize;
pub mod layers;

pub use label::{canonicalize, NodeKey};
pub use variants::{assign_variants, disambiguate, ensure_unique};
pub use table::{Edge, EdgeTable, ParentRef, RawEdge};
pub use expand::expand;
pub use normalize::{normalize, relevant_subtree, TreeEdge, TreeParent, DEFAULT_MAX_DEPTH};
pub use layers::designated_ancestors;
