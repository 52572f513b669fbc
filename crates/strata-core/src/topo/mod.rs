//! Topological ordering.
//!
//! # Overview
//!
//! Both algorithms return a [`TopoOrder`]: either every vertex, ordered so
//! that each edge `u -> v` has `u` before `v`, or an empty order with the
//! cycle flag set. Cycles are never reported as errors.
//!
//! - [`kahn_order`]: in-degree driven FIFO frontier.
//! - [`dfs_order`]: three-colour depth-first traversal, reverse finish order.
//!
//! The two algorithms generally produce different (equally valid) orders.

pub mod dfs;
pub mod kahn;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::metrics::Metrics;

pub use dfs::dfs_order;
pub use kahn::kahn_order;

/// Which topological sort to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopoAlgorithm {
    #[default]
    Kahn,
    Dfs,
}

impl TopoAlgorithm {
    pub const ALL: [Self; 2] = [Self::Kahn, Self::Dfs];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kahn => "kahn",
            Self::Dfs => "dfs",
        }
    }

    /// Run the selected algorithm on `graph`.
    pub fn run<M: Metrics>(self, graph: &Graph, metrics: &mut M) -> TopoOrder {
        match self {
            Self::Kahn => kahn_order(graph, metrics),
            Self::Dfs => dfs_order(graph, metrics),
        }
    }
}

impl fmt::Display for TopoAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TopoAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kahn" => Ok(Self::Kahn),
            "dfs" => Ok(Self::Dfs),
            other => Err(format!("unknown topological sort '{other}' (expected kahn|dfs)")),
        }
    }
}

/// Result of a topological sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoOrder {
    order: Vec<usize>,
    has_cycle: bool,
}

impl TopoOrder {
    pub(crate) const fn acyclic(order: Vec<usize>) -> Self {
        Self {
            order,
            has_cycle: false,
        }
    }

    pub(crate) const fn cyclic() -> Self {
        Self {
            order: Vec::new(),
            has_cycle: true,
        }
    }

    /// Vertices in topological order; empty when a cycle was found.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    #[must_use]
    pub fn into_order(self) -> Vec<usize> {
        self.order
    }

    #[must_use]
    pub const fn has_cycle(&self) -> bool {
        self.has_cycle
    }

    /// Position of `vertex` in the order.
    ///
    /// `None` for cyclic results and unknown vertices. Linear scan.
    #[must_use]
    pub fn position_of(&self, vertex: usize) -> Option<usize> {
        self.order.iter().position(|&v| v == vertex)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::OperationCounter;

    fn graph(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n);
        for &(a, b) in edges {
            g.add_edge(a, b).expect("edge");
        }
        g
    }

    fn assert_valid(g: &Graph, order: &TopoOrder) {
        assert!(!order.has_cycle());
        assert_eq!(order.len(), g.vertex_count());
        for edge in g.edges() {
            let from = order.position_of(edge.from).expect("from ordered");
            let to = order.position_of(edge.to).expect("to ordered");
            assert!(from < to, "{} must precede {}", edge.from, edge.to);
        }
    }

    #[test]
    fn selector_round_trips_through_name() {
        for algorithm in TopoAlgorithm::ALL {
            assert_eq!(algorithm.name().parse::<TopoAlgorithm>(), Ok(algorithm));
        }
        assert!("bfs".parse::<TopoAlgorithm>().is_err());
    }

    #[test]
    fn both_algorithms_order_a_diamond() {
        let g = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        for algorithm in TopoAlgorithm::ALL {
            let order = algorithm.run(&g, &mut OperationCounter::new());
            assert_valid(&g, &order);
        }
    }

    #[test]
    fn both_algorithms_flag_cycles_with_empty_order() {
        let g = graph(4, &[(0, 1), (1, 2), (2, 0), (2, 3)]);
        for algorithm in TopoAlgorithm::ALL {
            let order = algorithm.run(&g, &mut OperationCounter::new());
            assert!(order.has_cycle(), "{algorithm}");
            assert!(order.is_empty(), "{algorithm}");
            assert_eq!(order.position_of(0), None);
        }
    }

    #[test]
    fn empty_graph_has_empty_acyclic_order() {
        let g = Graph::new(0);
        for algorithm in TopoAlgorithm::ALL {
            let order = algorithm.run(&g, &mut OperationCounter::new());
            assert!(!order.has_cycle());
            assert!(order.is_empty());
        }
    }
}
