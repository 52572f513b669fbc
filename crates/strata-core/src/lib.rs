#![forbid(unsafe_code)]
//! strata-core library.
//!
//! Directed-graph analysis engine: strongly connected components,
//! condensation, topological order and DAG shortest/longest paths over a
//! fixed-size weighted [`Graph`].
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums for construction only; analysis never
//!   fails and reports cycles and unreachable vertices through flags and
//!   sentinels.
//! - **Logging**: Use `tracing` macros (`debug!`, `warn!`); entry points carry
//!   `#[instrument]` spans.
//! - **Metrics**: every algorithm takes a `&mut impl Metrics` sink.
//! - **Traversal**: depth-first searches use explicit heap stacks, never
//!   recursion.

pub mod error;
pub mod graph;
pub mod metrics;
pub mod paths;
pub mod scc;
pub mod topo;

pub use error::{CondensationError, GraphError};
pub use graph::{DEFAULT_WEIGHT, Edge, Graph};
pub use metrics::{Metrics, NullMetrics, OperationCounter};
pub use paths::{CriticalPath, DagPaths, Objective, PathTable};
pub use scc::{Component, Condensation, SccAlgorithm, SccResult};
pub use topo::{TopoAlgorithm, TopoOrder};
