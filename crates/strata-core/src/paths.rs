//! Single-source shortest and longest paths over a DAG.
//!
//! # Overview
//!
//! [`DagPaths`] first orders the graph with [`dfs_order`] and then makes one
//! relaxation pass over that order. A vertex is expanded only once its
//! distance is finite, so unreachable vertices keep their sentinel.
//!
//! | Objective  | Initial distance | Keeps   | Unreachable sentinel |
//! |------------|------------------|---------|----------------------|
//! | Shortest   | `+inf`           | smaller | `+inf`               |
//! | Longest    | `-inf`           | larger  | `-inf`               |
//!
//! Longest paths use the same pass with the comparison flipped rather than a
//! negated copy of the graph.
//!
//! A candidate distance that overflows to an infinity is discarded, so a
//! vertex reachable only through such a sum stays at its sentinel.
//!
//! ## Cycles and bad sources
//!
//! If the internal sort finds a cycle, or the source is not a vertex of the
//! graph, every distance is the sentinel and no path can be reconstructed.
//! Neither case is an error.
//!
//! The internal sort runs against [`NullMetrics`]; only relaxations and the
//! elapsed time of the whole computation reach the caller's sink.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::graph::Graph;
use crate::metrics::{Metrics, NullMetrics, RELAXATIONS};
use crate::topo::dfs_order;

/// What the relaxation pass optimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    Shortest,
    Longest,
}

impl Objective {
    /// Distance of a vertex no path reaches.
    #[must_use]
    pub const fn sentinel(self) -> f64 {
        match self {
            Self::Shortest => f64::INFINITY,
            Self::Longest => f64::NEG_INFINITY,
        }
    }

    fn improves(self, candidate: f64, current: f64) -> bool {
        match self {
            Self::Shortest => candidate < current,
            Self::Longest => candidate > current,
        }
    }
}

/// Distances and predecessor links from one source.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTable {
    source: usize,
    objective: Objective,
    distances: Vec<f64>,
    predecessors: Vec<Option<usize>>,
    topological_order: Vec<usize>,
    acyclic: bool,
}

impl PathTable {
    fn unreachable(
        source: usize,
        objective: Objective,
        vertex_count: usize,
        topological_order: Vec<usize>,
        acyclic: bool,
    ) -> Self {
        Self {
            source,
            objective,
            distances: vec![objective.sentinel(); vertex_count],
            predecessors: vec![None; vertex_count],
            topological_order,
            acyclic,
        }
    }

    #[must_use]
    pub const fn source(&self) -> usize {
        self.source
    }

    #[must_use]
    pub const fn objective(&self) -> Objective {
        self.objective
    }

    /// Distance to `vertex`; the objective's sentinel when unreachable or out of range.
    #[must_use]
    pub fn distance(&self, vertex: usize) -> f64 {
        self.distances
            .get(vertex)
            .copied()
            .unwrap_or_else(|| self.objective.sentinel())
    }

    #[must_use]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Vertex that last improved `vertex`'s distance.
    #[must_use]
    pub fn predecessor(&self, vertex: usize) -> Option<usize> {
        self.predecessors.get(vertex).copied().flatten()
    }

    /// Vertices from the source to `target`, inclusive.
    ///
    /// Empty when `target` is unreachable or out of range.
    #[must_use]
    pub fn reconstruct_path(&self, target: usize) -> Vec<usize> {
        if !self.distance(target).is_finite() {
            return Vec::new();
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(previous) = self.predecessor(current) {
            path.push(previous);
            current = previous;
        }
        path.reverse();
        path
    }

    /// Number of vertices with a finite distance, the source included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_finite()).count()
    }

    /// Order the relaxation pass walked; empty on cyclic input.
    #[must_use]
    pub fn topological_order(&self) -> &[usize] {
        &self.topological_order
    }

    /// `false` when the graph has a cycle and every distance is the sentinel.
    #[must_use]
    pub const fn is_acyclic(&self) -> bool {
        self.acyclic
    }
}

/// Longest path from a source and its length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalPath {
    pub length: f64,
    pub path: Vec<usize>,
}

impl CriticalPath {
    const fn none() -> Self {
        Self {
            length: f64::NEG_INFINITY,
            path: Vec::new(),
        }
    }

    /// Vertex the path ends on.
    #[must_use]
    pub fn end(&self) -> Option<usize> {
        self.path.last().copied()
    }
}

/// Path engine over one borrowed graph.
#[derive(Debug, Clone, Copy)]
pub struct DagPaths<'g> {
    graph: &'g Graph,
}

impl<'g> DagPaths<'g> {
    #[must_use]
    pub const fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Shortest distances from `source`.
    pub fn shortest_paths<M: Metrics>(&self, source: usize, metrics: &mut M) -> PathTable {
        self.relax(source, Objective::Shortest, metrics)
    }

    /// Longest distances from `source`.
    pub fn longest_paths<M: Metrics>(&self, source: usize, metrics: &mut M) -> PathTable {
        self.relax(source, Objective::Longest, metrics)
    }

    /// The longest path starting at `source`.
    ///
    /// Ends at the vertex with the greatest finite longest distance, the
    /// lowest id winning ties. A source with no outgoing reach yields just
    /// `[source]` with length zero. Cyclic graphs and invalid sources yield
    /// an empty path with length `-inf`.
    pub fn critical_path<M: Metrics>(&self, source: usize, metrics: &mut M) -> CriticalPath {
        let table = self.longest_paths(source, metrics);

        let mut best: Option<(usize, f64)> = None;
        for (vertex, &distance) in table.distances().iter().enumerate() {
            if distance.is_finite() && best.is_none_or(|(_, length)| distance > length) {
                best = Some((vertex, distance));
            }
        }

        best.map_or_else(CriticalPath::none, |(end, length)| CriticalPath {
            length,
            path: table.reconstruct_path(end),
        })
    }

    #[instrument(skip(self, metrics), fields(vertices = self.graph.vertex_count()))]
    fn relax<M: Metrics>(&self, source: usize, objective: Objective, metrics: &mut M) -> PathTable {
        let started = Instant::now();
        let n = self.graph.vertex_count();

        let topo = dfs_order(self.graph, &mut NullMetrics);
        if topo.has_cycle() {
            debug!("graph has a cycle; all distances left at sentinel");
            metrics.set_elapsed(started.elapsed());
            return PathTable::unreachable(source, objective, n, Vec::new(), false);
        }
        let order = topo.into_order();

        if !self.graph.is_valid_vertex(source) {
            warn!(source, vertex_count = n, "path source is not a vertex");
            metrics.set_elapsed(started.elapsed());
            return PathTable::unreachable(source, objective, n, order, true);
        }

        let mut table = PathTable::unreachable(source, objective, n, Vec::new(), true);
        table.distances[source] = 0.0;

        for &u in &order {
            let base = table.distances[u];
            if !base.is_finite() {
                continue;
            }
            for edge in self.graph.adjacent(u) {
                metrics.increment(RELAXATIONS);
                let candidate = base + edge.weight;
                if !candidate.is_finite() {
                    continue;
                }
                if objective.improves(candidate, table.distances[edge.to]) {
                    table.distances[edge.to] = candidate;
                    table.predecessors[edge.to] = Some(u);
                }
            }
        }

        table.topological_order = order;
        metrics.set_elapsed(started.elapsed());
        debug!(reachable = table.reachable_count(), "relaxation finished");
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::OperationCounter;

    fn weighted(n: usize, edges: &[(usize, usize, f64)]) -> Graph {
        let mut g = Graph::new(n);
        for &(a, b, w) in edges {
            g.add_weighted_edge(a, b, w).expect("edge");
        }
        g
    }

    fn chain() -> Graph {
        weighted(4, &[(0, 1, 2.0), (1, 2, 3.0), (2, 3, 1.0)])
    }

    #[test]
    fn shortest_distances_on_chain() {
        let g = chain();
        let table = DagPaths::new(&g).shortest_paths(0, &mut OperationCounter::new());
        assert_eq!(table.distances(), &[0.0, 2.0, 5.0, 6.0]);
        assert_eq!(table.reconstruct_path(3), vec![0, 1, 2, 3]);
        assert_eq!(table.reachable_count(), 4);
        assert!(table.is_acyclic());
    }

    #[test]
    fn shortest_prefers_cheaper_detour() {
        let g = weighted(3, &[(0, 2, 10.0), (0, 1, 1.0), (1, 2, 1.0)]);
        let table = DagPaths::new(&g).shortest_paths(0, &mut OperationCounter::new());
        assert_eq!(table.distance(2), 2.0);
        assert_eq!(table.predecessor(2), Some(1));
    }

    #[test]
    fn longest_prefers_heavier_route() {
        let g = weighted(3, &[(0, 2, 10.0), (0, 1, 1.0), (1, 2, 1.0)]);
        let table = DagPaths::new(&g).longest_paths(0, &mut OperationCounter::new());
        assert_eq!(table.distance(2), 10.0);
        assert_eq!(table.reconstruct_path(2), vec![0, 2]);
    }

    #[test]
    fn unreachable_vertices_keep_sentinel() {
        let g = weighted(3, &[(1, 0, 1.0), (1, 2, 1.0)]);
        let paths = DagPaths::new(&g);
        let shortest = paths.shortest_paths(0, &mut OperationCounter::new());
        assert_eq!(shortest.distance(2), f64::INFINITY);
        assert!(shortest.reconstruct_path(2).is_empty());
        let longest = paths.longest_paths(0, &mut OperationCounter::new());
        assert_eq!(longest.distance(1), f64::NEG_INFINITY);
        assert_eq!(longest.reachable_count(), 1);
    }

    #[test]
    fn cycle_leaves_every_distance_at_sentinel() {
        let g = weighted(3, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);
        let paths = DagPaths::new(&g);
        let shortest = paths.shortest_paths(0, &mut OperationCounter::new());
        assert!(!shortest.is_acyclic());
        assert!(shortest.distances().iter().all(|&d| d == f64::INFINITY));
        assert!(shortest.topological_order().is_empty());
        let longest = paths.longest_paths(0, &mut OperationCounter::new());
        assert!(longest.distances().iter().all(|&d| d == f64::NEG_INFINITY));
        assert!(longest.reconstruct_path(0).is_empty());
    }

    #[test]
    fn out_of_range_queries_return_sentinels() {
        let g = chain();
        let table = DagPaths::new(&g).shortest_paths(0, &mut OperationCounter::new());
        assert_eq!(table.distance(99), f64::INFINITY);
        assert_eq!(table.predecessor(99), None);
        assert!(table.reconstruct_path(99).is_empty());
    }

    #[test]
    fn invalid_source_reaches_nothing() {
        let g = chain();
        let table = DagPaths::new(&g).shortest_paths(7, &mut OperationCounter::new());
        assert_eq!(table.reachable_count(), 0);
        assert!(table.is_acyclic());
        assert_eq!(table.topological_order().len(), 4);
    }

    #[test]
    fn critical_path_follows_heaviest_route() {
        let g = chain();
        let critical = DagPaths::new(&g).critical_path(0, &mut OperationCounter::new());
        assert_eq!(critical.length, 6.0);
        assert_eq!(critical.path, vec![0, 1, 2, 3]);
        assert_eq!(critical.end(), Some(3));
    }

    #[test]
    fn critical_path_ties_go_to_lowest_id() {
        let g = weighted(3, &[(0, 2, 5.0), (0, 1, 5.0)]);
        let critical = DagPaths::new(&g).critical_path(0, &mut OperationCounter::new());
        assert_eq!(critical.path, vec![0, 1]);
    }

    #[test]
    fn critical_path_of_isolated_source_is_source() {
        let g = weighted(2, &[(1, 0, 1.0)]);
        let critical = DagPaths::new(&g).critical_path(0, &mut OperationCounter::new());
        assert_eq!(critical.length, 0.0);
        assert_eq!(critical.path, vec![0]);
    }

    #[test]
    fn critical_path_on_cycle_or_bad_source_is_empty() {
        let cyclic = weighted(2, &[(0, 1, 1.0), (1, 0, 1.0)]);
        let critical = DagPaths::new(&cyclic).critical_path(0, &mut OperationCounter::new());
        assert!(critical.path.is_empty());
        assert_eq!(critical.length, f64::NEG_INFINITY);

        let g = chain();
        let critical = DagPaths::new(&g).critical_path(4, &mut OperationCounter::new());
        assert!(critical.path.is_empty());
        assert_eq!(critical.end(), None);
    }

    #[test]
    fn overflowing_sums_stay_unreachable() {
        let g = weighted(3, &[(0, 1, 1e308), (1, 2, 1e308)]);
        let engine = DagPaths::new(&g);

        let longest = engine.longest_paths(0, &mut OperationCounter::new());
        assert_eq!(longest.distance(1), 1e308);
        assert_eq!(longest.distance(2), f64::NEG_INFINITY);
        assert_eq!(longest.predecessor(2), None);
        assert_eq!(longest.reachable_count(), 2);

        let critical = engine.critical_path(0, &mut OperationCounter::new());
        assert_eq!(critical.length, 1e308);
        assert_eq!(critical.path, vec![0, 1]);

        let shortest = engine.shortest_paths(0, &mut OperationCounter::new());
        assert_eq!(shortest.distance(2), f64::INFINITY);
        assert!(shortest.reconstruct_path(2).is_empty());
    }

    #[test]
    fn relaxations_count_only_expanded_vertices() {
        // Vertex 1 is unreachable from 0, so its edge is never relaxed.
        let g = weighted(3, &[(0, 2, 1.0), (1, 2, 1.0)]);
        let mut metrics = OperationCounter::new();
        let _ = DagPaths::new(&g).shortest_paths(0, &mut metrics);
        assert_eq!(metrics.counter(RELAXATIONS), 1);
        // The internal sort does not leak into the caller's sink.
        assert_eq!(metrics.counter(crate::metrics::DFS_VISITS), 0);
    }
}
