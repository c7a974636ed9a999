//! Domain core for the parking-access platform.
//!
//! This crate has no database, async, or HTTP dependencies. It provides:
//!
//! - The [`error::CoreError`] taxonomy shared by all layers
//! - Common type aliases ([`types::DbId`], [`types::Timestamp`])
//! - Tabular file decoding for roster imports ([`tabular`])
//! - Pure per-row validation and report types ([`import`])

pub mod error;
pub mod import;
pub mod tabular;
pub mod types;
