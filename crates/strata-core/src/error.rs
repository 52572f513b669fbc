//! Typed errors for graph construction and condensation.
//!
//! Analysis algorithms never fail: cycles are reported through flags and
//! unreachable vertices through infinite sentinels. The only fallible
//! operations are the ones that would otherwise store an invalid graph.

/// Errors raised while building a [`crate::graph::Graph`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// An edge endpoint or a named vertex lies outside `[0, vertex_count)`.
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    VertexOutOfRange { vertex: usize, vertex_count: usize },

    /// Edge weights must be finite; NaN or infinite weights would poison relaxation.
    #[error("edge {from} -> {to} has non-finite weight {weight}")]
    NonFiniteWeight { from: usize, to: usize, weight: f64 },
}

/// Errors raised when a component list is not a valid vertex partition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CondensationError {
    /// A component lists a vertex the graph does not have.
    #[error("component {component} references vertex {vertex}, graph has {vertex_count} vertices")]
    UnknownVertex {
        component: usize,
        vertex: usize,
        vertex_count: usize,
    },

    /// A vertex appears in more than one component.
    #[error("vertex {vertex} appears in components {first} and {second}")]
    OverlappingComponents {
        vertex: usize,
        first: usize,
        second: usize,
    },

    /// A vertex belongs to no component.
    #[error("vertex {vertex} is not covered by any component")]
    UncoveredVertex { vertex: usize },
}
