//! opss-web: Web front end for the OPSS standards dashboard.
//! Provides:
//!   - Token-gated site pages embedding the dashboard
//!   - The dashboard page and its JSON API under /dash/
//!   - Sunburst figures built from the hierarchy engine
//!   - Error and usage log files

pub mod auth;
pub mod config;
pub mod figure;
pub mod handlers;
pub mod router;
pub mod state;
pub mod telemetry;
