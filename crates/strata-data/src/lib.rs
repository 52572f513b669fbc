#![forbid(unsafe_code)]
//! strata-data library.
//!
//! Collaborators that sit outside the engine: JSON graph documents, content
//! fingerprints and the synthetic dataset catalog.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` with path or dataset context.
//! - **Logging**: Use `tracing` macros (`info!`, `debug!`).

pub mod catalog;
pub mod document;

pub use catalog::{CATALOG, Dataset, DatasetSummary, generate_all, random_dag, random_digraph};
pub use document::{
    GraphDocument, fingerprint, load_document, parse_document, render_document, save_document,
};
