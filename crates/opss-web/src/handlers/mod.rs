//! HTTP handlers for all web routes.

pub mod pages;
pub mod dashboard;
pub mod records;
pub mod layers;
pub mod sunburst;
pub mod stats;
