//! Fixed-size weighted directed graph with optional vertex names.
//!
//! # Overview
//!
//! Vertices are dense ids in `[0, n)`; `n` is fixed when the graph is
//! created. Each vertex owns an ordered list of outgoing [`Edge`]s kept in
//! insertion order. Every traversal in this crate walks adjacency lists in
//! that order, so two graphs built with the same calls produce identical
//! results.
//!
//! Multi-edges are kept as-is (no deduplication). Edges whose endpoints are
//! outside `[0, n)` are rejected with [`GraphError::VertexOutOfRange`]
//! instead of being dropped silently.
//!
//! ## Names
//!
//! A vertex may carry a human-readable name. [`Graph::name_of`] falls back to
//! the decimal id when no name was set. Reassigning a name to a different
//! vertex makes the latest write win for name → id lookups, while id → name
//! always reflects the latest [`Graph::set_name`] call for that id.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::GraphError;

/// Weight used by [`Graph::add_edge`] when none is given.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A directed, weighted edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
}

/// Adjacency-list directed graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
    names: Vec<Option<String>>,
    ids_by_name: HashMap<String, usize>,
}

impl Graph {
    /// Create a graph with `vertex_count` vertices and no edges.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
            names: vec![None; vertex_count],
            ids_by_name: HashMap::new(),
        }
    }

    /// Number of vertices, fixed at construction.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of stored edges, counting multi-edges individually.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Return `true` if `vertex` is in `[0, vertex_count)`.
    #[must_use]
    pub fn is_valid_vertex(&self, vertex: usize) -> bool {
        vertex < self.adjacency.len()
    }

    /// Assign a name to `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] if `vertex` does not exist.
    pub fn set_name(&mut self, vertex: usize, name: impl Into<String>) -> Result<(), GraphError> {
        self.check_vertex(vertex)?;
        let name = name.into();
        self.ids_by_name.insert(name.clone(), vertex);
        self.names[vertex] = Some(name);
        Ok(())
    }

    /// Name of `vertex`, or its decimal id when unnamed or out of range.
    #[must_use]
    pub fn name_of(&self, vertex: usize) -> Cow<'_, str> {
        match self.names.get(vertex) {
            Some(Some(name)) => Cow::Borrowed(name.as_str()),
            _ => Cow::Owned(vertex.to_string()),
        }
    }

    /// Look up the vertex currently registered under `name`.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.ids_by_name.get(name).copied()
    }

    /// Return `true` if `vertex` has an explicitly assigned name.
    #[must_use]
    pub fn has_name(&self, vertex: usize) -> bool {
        matches!(self.names.get(vertex), Some(Some(_)))
    }

    /// Explicitly named vertices in increasing id order.
    pub fn named_vertices(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(id, name)| name.as_deref().map(|name| (id, name)))
    }

    /// Add an edge `from -> to` with [`DEFAULT_WEIGHT`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] if either endpoint is invalid.
    pub fn add_edge(&mut self, from: usize, to: usize) -> Result<(), GraphError> {
        self.add_weighted_edge(from, to, DEFAULT_WEIGHT)
    }

    /// Add an edge `from -> to` carrying `weight`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] if either endpoint is invalid
    /// and [`GraphError::NonFiniteWeight`] for NaN or infinite weights.
    pub fn add_weighted_edge(
        &mut self,
        from: usize,
        to: usize,
        weight: f64,
    ) -> Result<(), GraphError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        if !weight.is_finite() {
            return Err(GraphError::NonFiniteWeight { from, to, weight });
        }
        self.adjacency[from].push(Edge { from, to, weight });
        Ok(())
    }

    /// Outgoing edges of `vertex` in insertion order.
    ///
    /// Out-of-range vertices have no edges.
    #[must_use]
    pub fn adjacent(&self, vertex: usize) -> &[Edge] {
        self.adjacency.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// All edges, grouped by source vertex in increasing id order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency.iter().flatten()
    }

    /// Edge density `E / (V * (V - 1))`; zero for graphs with fewer than two vertices.
    #[must_use]
    pub fn density(&self) -> f64 {
        let n = self.vertex_count();
        if n < 2 {
            return 0.0;
        }
        self.edge_count() as f64 / (n * (n - 1)) as f64
    }

    /// Build a new graph with every edge reversed. Names are preserved.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut adjacency = vec![Vec::new(); self.vertex_count()];
        for edge in self.edges() {
            adjacency[edge.to].push(Edge {
                from: edge.to,
                to: edge.from,
                weight: edge.weight,
            });
        }

        Self {
            adjacency,
            names: self.names.clone(),
            ids_by_name: self.ids_by_name.clone(),
        }
    }

    /// Append an edge whose endpoints the caller has already validated.
    pub(crate) fn push_edge(&mut self, edge: Edge) {
        debug_assert!(self.is_valid_vertex(edge.from) && self.is_valid_vertex(edge.to));
        self.adjacency[edge.from].push(edge);
    }

    fn check_vertex(&self, vertex: usize) -> Result<(), GraphError> {
        if self.is_valid_vertex(vertex) {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex,
                vertex_count: self.vertex_count(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        let mut g = Graph::new(3);
        g.add_edge(0, 1).expect("edge");
        g.add_weighted_edge(1, 2, 2.5).expect("edge");
        g.add_edge(2, 0).expect("edge");
        g
    }

    #[test]
    fn new_graph_has_no_edges() {
        let g = Graph::new(4);
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 0);
        assert!(g.adjacent(3).is_empty());
    }

    #[test]
    fn add_edge_defaults_weight_to_one() {
        let g = triangle();
        assert_eq!(g.adjacent(0)[0].weight, DEFAULT_WEIGHT);
        assert_eq!(g.adjacent(1)[0].weight, 2.5);
    }

    #[test]
    fn multi_edges_are_kept_in_insertion_order() {
        let mut g = Graph::new(2);
        g.add_weighted_edge(0, 1, 3.0).expect("edge");
        g.add_weighted_edge(0, 1, 1.0).expect("edge");
        g.add_edge(0, 0).expect("self loop");

        let weights: Vec<f64> = g.adjacent(0).iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![3.0, 1.0, 1.0]);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn out_of_range_edge_is_rejected_and_not_stored() {
        let mut g = Graph::new(2);
        let err = g.add_edge(0, 5).expect_err("must fail");
        assert_eq!(
            err,
            GraphError::VertexOutOfRange {
                vertex: 5,
                vertex_count: 2
            }
        );
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn non_finite_weight_is_rejected() {
        let mut g = Graph::new(2);
        assert!(matches!(
            g.add_weighted_edge(0, 1, f64::NAN),
            Err(GraphError::NonFiniteWeight { from: 0, to: 1, .. })
        ));
        assert!(g.add_weighted_edge(0, 1, f64::INFINITY).is_err());
    }

    #[test]
    fn name_of_falls_back_to_id() {
        let mut g = Graph::new(3);
        g.set_name(1, "build").expect("name");
        assert_eq!(g.name_of(0), "0");
        assert_eq!(g.name_of(1), "build");
        assert_eq!(g.name_of(99), "99");
        assert!(g.has_name(1));
        assert!(!g.has_name(0));
    }

    #[test]
    fn named_vertices_skips_unnamed() {
        let mut g = Graph::new(4);
        g.set_name(3, "deploy").expect("name");
        g.set_name(1, "build").expect("name");
        let named: Vec<(usize, &str)> = g.named_vertices().collect();
        assert_eq!(named, vec![(1, "build"), (3, "deploy")]);
    }

    #[test]
    fn id_of_unknown_name_is_none() {
        let g = Graph::new(2);
        assert_eq!(g.id_of("missing"), None);
    }

    #[test]
    fn reassigned_name_last_write_wins() {
        let mut g = Graph::new(3);
        g.set_name(0, "task").expect("name");
        g.set_name(2, "task").expect("name");
        assert_eq!(g.id_of("task"), Some(2));
        // id -> name still reflects the last call for each id.
        assert_eq!(g.name_of(0), "task");
        assert_eq!(g.name_of(2), "task");

        g.set_name(2, "other").expect("name");
        assert_eq!(g.name_of(2), "other");
        assert_eq!(g.id_of("other"), Some(2));
    }

    #[test]
    fn set_name_on_invalid_vertex_fails() {
        let mut g = Graph::new(1);
        assert!(g.set_name(1, "x").is_err());
        assert_eq!(g.id_of("x"), None);
    }

    #[test]
    fn transpose_reverses_edges_and_keeps_names() {
        let mut g = triangle();
        g.set_name(0, "a").expect("name");
        let t = g.transpose();

        assert_eq!(t.vertex_count(), 3);
        assert_eq!(t.edge_count(), 3);
        assert_eq!(t.adjacent(1)[0].to, 0);
        assert_eq!(t.adjacent(2)[0].to, 1);
        assert_eq!(t.adjacent(2)[0].weight, 2.5);
        assert_eq!(t.adjacent(0)[0].to, 2);
        assert_eq!(t.name_of(0), "a");
        assert_eq!(t.id_of("a"), Some(0));

        // Original is untouched.
        assert_eq!(g.adjacent(0)[0].to, 1);
    }

    #[test]
    fn density_matches_formula() {
        let g = triangle();
        assert!((g.density() - 0.5).abs() < f64::EPSILON);
        assert_eq!(Graph::new(1).density(), 0.0);
        assert_eq!(Graph::new(0).density(), 0.0);
    }

    #[test]
    fn edges_iterates_in_adjacency_order() {
        let g = triangle();
        let pairs: Vec<(usize, usize)> = g.edges().map(|e| (e.from, e.to)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 0)]);
    }
}
