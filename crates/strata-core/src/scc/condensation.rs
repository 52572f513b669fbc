//! SCC condensation: collapse each component into a single vertex.
//!
//! # Overview
//!
//! Given a component list and the original graph, every original edge
//! `u -> v` is translated to `component(u) -> component(v)`. Pairs whose two
//! ends fall in the same component are dropped; repeated pairs are kept once.
//! The resulting [`Graph`] has one vertex per component and is acyclic
//! whenever the components are genuine maximal SCCs.
//!
//! Condensation edges carry [`DEFAULT_WEIGHT`]; the original weights of the
//! collapsed edges are not aggregated.

use std::collections::BTreeSet;

use tracing::instrument;

use super::Component;
use crate::error::CondensationError;
use crate::graph::{DEFAULT_WEIGHT, Edge, Graph};

/// The condensed view of a graph.
#[derive(Debug, Clone)]
pub struct Condensation {
    components: Vec<Component>,
    component_of: Vec<usize>,
    successors: Vec<BTreeSet<usize>>,
    graph: Graph,
}

impl Condensation {
    /// Build the condensation of `graph` over `components`.
    ///
    /// # Errors
    ///
    /// Returns a [`CondensationError`] if `components` is not a partition of
    /// `graph`'s vertex set.
    #[instrument(skip_all, fields(components = components.len(), vertices = graph.vertex_count()))]
    pub fn build(components: &[Component], graph: &Graph) -> Result<Self, CondensationError> {
        let component_of = index_components(components, graph.vertex_count())?;

        let mut successors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); components.len()];
        for edge in graph.edges() {
            let from = component_of[edge.from];
            let to = component_of[edge.to];
            if from != to {
                successors[from].insert(to);
            }
        }

        let mut condensed = Graph::new(components.len());
        for (from, targets) in successors.iter().enumerate() {
            for &to in targets {
                // Both ends are component ids, so always in range.
                condensed.push_edge(Edge {
                    from,
                    to,
                    weight: DEFAULT_WEIGHT,
                });
            }
        }

        Ok(Self {
            components: components.to_vec(),
            component_of,
            successors,
            graph: condensed,
        })
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Original vertices in `component`; empty for unknown ids.
    #[must_use]
    pub fn members(&self, component: usize) -> &[usize] {
        self.components.get(component).map_or(&[], Vec::as_slice)
    }

    /// Component of an original vertex.
    #[must_use]
    pub fn component_of(&self, vertex: usize) -> Option<usize> {
        self.component_of.get(vertex).copied()
    }

    /// Components reachable from `component` by one condensed edge.
    #[must_use]
    pub fn successors(&self, component: usize) -> Option<&BTreeSet<usize>> {
        self.successors.get(component)
    }

    /// Number of distinct condensed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(BTreeSet::len).sum()
    }

    /// The condensed DAG, one vertex per component.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

/// Map every vertex to its component, validating that `components` is a partition.
fn index_components(
    components: &[Component],
    vertex_count: usize,
) -> Result<Vec<usize>, CondensationError> {
    let mut component_of: Vec<Option<usize>> = vec![None; vertex_count];

    for (id, members) in components.iter().enumerate() {
        for &vertex in members {
            let slot = component_of
                .get_mut(vertex)
                .ok_or(CondensationError::UnknownVertex {
                    component: id,
                    vertex,
                    vertex_count,
                })?;
            if let Some(first) = *slot {
                return Err(CondensationError::OverlappingComponents {
                    vertex,
                    first,
                    second: id,
                });
            }
            *slot = Some(id);
        }
    }

    component_of
        .into_iter()
        .enumerate()
        .map(|(vertex, id)| id.ok_or(CondensationError::UncoveredVertex { vertex }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::NullMetrics;
    use crate::scc::{kosaraju, tarjan};
    use crate::topo::dfs_order;

    fn graph(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n);
        for &(a, b) in edges {
            g.add_edge(a, b).expect("edge");
        }
        g
    }

    #[test]
    fn collapses_cycle_and_keeps_crossing_edge() {
        let g = graph(4, &[(0, 1), (1, 2), (2, 0), (2, 3)]);
        let scc = tarjan(&g, &mut NullMetrics);
        let c = Condensation::build(scc.components(), &g).expect("partition");

        assert_eq!(c.component_count(), 2);
        assert_eq!(c.edge_count(), 1);
        let cycle = c.component_of(0).expect("vertex 0");
        let tail = c.component_of(3).expect("vertex 3");
        assert_eq!(c.component_of(1), Some(cycle));
        assert!(c.successors(cycle).expect("known").contains(&tail));
        assert!(c.successors(tail).expect("known").is_empty());
    }

    #[test]
    fn parallel_crossing_edges_are_deduplicated() {
        // {0,1} and {2,3}, with three edges between them.
        let g = graph(4, &[(0, 1), (1, 0), (2, 3), (3, 2), (0, 2), (1, 3), (0, 2)]);
        let scc = kosaraju(&g, &mut NullMetrics);
        let c = Condensation::build(scc.components(), &g).expect("partition");
        assert_eq!(c.component_count(), 2);
        assert_eq!(c.edge_count(), 1);
        assert_eq!(c.graph().edge_count(), 1);
    }

    #[test]
    fn condensation_graph_is_acyclic() {
        let g = graph(
            8,
            &[
                (0, 1),
                (1, 2),
                (2, 0),
                (2, 3),
                (3, 4),
                (4, 3),
                (4, 5),
                (5, 6),
                (6, 7),
                (7, 5),
                (1, 6),
            ],
        );
        let scc = tarjan(&g, &mut NullMetrics);
        let c = Condensation::build(scc.components(), &g).expect("partition");
        let order = dfs_order(c.graph(), &mut NullMetrics);
        assert!(!order.has_cycle());
        assert_eq!(order.len(), c.component_count());
    }

    #[test]
    fn members_of_unknown_component_is_empty() {
        let g = graph(2, &[(0, 1)]);
        let scc = tarjan(&g, &mut NullMetrics);
        let c = Condensation::build(scc.components(), &g).expect("partition");
        assert!(c.members(5).is_empty());
        assert_eq!(c.successors(5), None);
        assert_eq!(c.component_of(9), None);
    }

    #[test]
    fn rejects_overlapping_components() {
        let g = graph(3, &[]);
        let err = Condensation::build(&[vec![0, 1], vec![1, 2]], &g).expect_err("overlap");
        assert_eq!(
            err,
            CondensationError::OverlappingComponents {
                vertex: 1,
                first: 0,
                second: 1
            }
        );
    }

    #[test]
    fn rejects_missing_and_unknown_vertices() {
        let g = graph(3, &[]);
        assert_eq!(
            Condensation::build(&[vec![0], vec![1]], &g).expect_err("uncovered"),
            CondensationError::UncoveredVertex { vertex: 2 }
        );
        assert!(matches!(
            Condensation::build(&[vec![0, 1, 2, 3]], &g),
            Err(CondensationError::UnknownVertex { vertex: 3, .. })
        ));
    }

    #[test]
    fn empty_graph_condenses_to_empty_graph() {
        let g = Graph::new(0);
        let c = Condensation::build(&[], &g).expect("partition");
        assert_eq!(c.component_count(), 0);
        assert_eq!(c.graph().vertex_count(), 0);
    }
}
