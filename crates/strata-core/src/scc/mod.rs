//! Strongly connected components.
//!
//! # Overview
//!
//! Two interchangeable algorithms partition the vertex set into maximal
//! strongly connected components:
//!
//! - [`tarjan`]: one depth-first traversal tracking discovery indices and
//!   lowlinks.
//! - [`kosaraju`]: a post-order pass on the graph followed by a collection
//!   pass on its transpose.
//!
//! Both run in `O(V + E)` with explicit, heap-owned traversal stacks, so
//! arbitrarily deep graphs cannot overflow the call stack.
//!
//! The two algorithms may emit components in different orders and label
//! them differently; the partitions themselves always agree. Use
//! [`SccResult::canonical_partition`] to compare runs.
//!
//! ## Condensation
//!
//! [`condensation::Condensation`] collapses each component into one vertex,
//! producing a DAG.

pub mod condensation;
pub mod kosaraju;
pub mod tarjan;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::graph::Graph;
use crate::metrics::Metrics;

pub use condensation::Condensation;
pub use kosaraju::kosaraju;
pub use tarjan::tarjan;

/// One strongly connected component: the ids of its member vertices.
pub type Component = Vec<usize>;

// ---------------------------------------------------------------------------
// Algorithm selector
// ---------------------------------------------------------------------------

/// Which SCC algorithm to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SccAlgorithm {
    #[default]
    Tarjan,
    Kosaraju,
}

impl SccAlgorithm {
    /// Both algorithms, in report order.
    pub const ALL: [Self; 2] = [Self::Tarjan, Self::Kosaraju];

    /// Stable display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tarjan => "tarjan",
            Self::Kosaraju => "kosaraju",
        }
    }

    /// Run the selected algorithm on `graph`.
    pub fn run<M: Metrics>(self, graph: &Graph, metrics: &mut M) -> SccResult {
        match self {
            Self::Tarjan => tarjan(graph, metrics),
            Self::Kosaraju => kosaraju(graph, metrics),
        }
    }
}

impl fmt::Display for SccAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SccAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tarjan" => Ok(Self::Tarjan),
            "kosaraju" => Ok(Self::Kosaraju),
            other => Err(format!("unknown SCC algorithm '{other}' (expected tarjan|kosaraju)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Partition of a graph's vertices into strongly connected components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SccResult {
    components: Vec<Component>,
    component_of: Vec<usize>,
    cyclic: Vec<bool>,
}

impl SccResult {
    /// Index `components` against `graph`.
    ///
    /// `components` must partition the vertex set; both algorithms in this
    /// module guarantee that.
    pub(crate) fn new(components: Vec<Component>, graph: &Graph) -> Self {
        let mut component_of = vec![usize::MAX; graph.vertex_count()];
        for (id, members) in components.iter().enumerate() {
            for &v in members {
                component_of[v] = id;
            }
        }

        let cyclic = components
            .iter()
            .map(|members| match members.as_slice() {
                [only] => graph.adjacent(*only).iter().any(|e| e.to == *only),
                _ => true,
            })
            .collect();

        Self {
            components,
            component_of,
            cyclic,
        }
    }

    /// Components in emission order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Consume the result, returning the components.
    #[must_use]
    pub fn into_components(self) -> Vec<Component> {
        self.components
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Component id of `vertex`, or `None` when out of range.
    #[must_use]
    pub fn component_of(&self, vertex: usize) -> Option<usize> {
        self.component_of.get(vertex).copied()
    }

    /// Vertex → component id for every vertex.
    #[must_use]
    pub fn vertex_to_component(&self) -> &[usize] {
        &self.component_of
    }

    /// Component sizes, largest first.
    #[must_use]
    pub fn component_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.components.iter().map(Vec::len).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }

    #[must_use]
    pub fn largest_component_size(&self) -> usize {
        self.components.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Components that contain a cycle: more than one member, or a self-loop.
    pub fn cyclic_components(&self) -> impl Iterator<Item = &Component> + '_ {
        self.components
            .iter()
            .zip(&self.cyclic)
            .filter_map(|(members, &cyclic)| cyclic.then_some(members))
    }

    /// Return `true` if `component` is cyclic; `false` for unknown ids.
    #[must_use]
    pub fn is_cyclic(&self, component: usize) -> bool {
        self.cyclic.get(component).copied().unwrap_or(false)
    }

    /// Return `true` if no component contains a cycle.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        !self.cyclic.iter().any(|&c| c)
    }

    /// Order-independent view of the partition: members sorted, components sorted.
    #[must_use]
    pub fn canonical_partition(&self) -> Vec<Component> {
        let mut partition: Vec<Component> = self
            .components
            .iter()
            .map(|members| {
                let mut sorted = members.clone();
                sorted.sort_unstable();
                sorted
            })
            .collect();
        partition.sort_unstable();
        partition
    }
}
