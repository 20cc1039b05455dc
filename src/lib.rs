//! # Tier Board
//!
//! A community tier-ranking dashboard: loads a spreadsheet export of
//! player records, derives per-record fields, computes summary
//! aggregates, and renders a single styled page. Every render reloads
//! the source file and recomputes everything from scratch.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, tiers, classifications)
//! - **load**: CSV dataset loading
//! - **derive**: Composite-field parsing, classification, sort keys
//! - **aggregate**: Read-only summary queries over the derived table
//! - **render**: Render model plus HTML/text formatting
//! - **api**: HTTP endpoints
//! - **config**: Configuration loading and validation

pub mod aggregate;
pub mod api;
pub mod config;
pub mod derive;
pub mod load;
pub mod models;
pub mod render;

pub use models::*;
