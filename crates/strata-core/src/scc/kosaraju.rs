//! Kosaraju's two-pass strongly connected components algorithm.
//!
//! Pass 1 runs a depth-first traversal over the graph in increasing id order
//! and records vertices in post-order (after all their out-edges are
//! explored). Pass 2 walks that finish order from last to first over the
//! transpose graph; every traversal started from an unvisited vertex collects
//! exactly one component.

use std::time::Instant;

use tracing::{debug, instrument};

use super::{Component, SccResult};
use crate::graph::Graph;
use crate::metrics::{DFS_VISITS, EDGES_EXAMINED, Metrics};

/// Partition `graph` into strongly connected components with Kosaraju's algorithm.
///
/// Records `dfs_visits`, `edges_examined` and the elapsed time in `metrics`.
/// Both passes count towards the same counters.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn kosaraju<M: Metrics>(graph: &Graph, metrics: &mut M) -> SccResult {
    let started = Instant::now();
    let n = graph.vertex_count();

    let mut visited = vec![false; n];
    let mut finish_order: Vec<usize> = Vec::with_capacity(n);
    for start in 0..n {
        if !visited[start] {
            record_finish_order(graph, start, &mut visited, &mut finish_order, metrics);
        }
    }

    let transpose = graph.transpose();
    visited.fill(false);

    let mut components: Vec<Component> = Vec::new();
    for &root in finish_order.iter().rev() {
        if !visited[root] {
            components.push(collect_component(&transpose, root, &mut visited, metrics));
        }
    }

    metrics.set_elapsed(started.elapsed());
    debug!(components = components.len(), "kosaraju finished");
    SccResult::new(components, graph)
}

/// Post-order traversal from `start`, appending each vertex once all its
/// out-edges have been explored.
fn record_finish_order<M: Metrics>(
    graph: &Graph,
    start: usize,
    visited: &mut [bool],
    finish_order: &mut Vec<usize>,
    metrics: &mut M,
) {
    // Each entry: (vertex, index of the next out-edge to explore).
    let mut call_stack: Vec<(usize, usize)> = vec![(start, 0)];
    visited[start] = true;
    metrics.increment(DFS_VISITS);

    while let Some((v, cursor)) = call_stack.last_mut() {
        let v = *v;
        if let Some(edge) = graph.adjacent(v).get(*cursor) {
            *cursor += 1;
            metrics.increment(EDGES_EXAMINED);
            if !visited[edge.to] {
                visited[edge.to] = true;
                metrics.increment(DFS_VISITS);
                call_stack.push((edge.to, 0));
            }
        } else {
            call_stack.pop();
            finish_order.push(v);
        }
    }
}

/// Collect every vertex reachable from `root` in `transpose` that is not yet visited.
fn collect_component<M: Metrics>(
    transpose: &Graph,
    root: usize,
    visited: &mut [bool],
    metrics: &mut M,
) -> Component {
    let mut component = Vec::new();
    let mut pending = vec![root];
    visited[root] = true;

    while let Some(v) = pending.pop() {
        metrics.increment(DFS_VISITS);
        component.push(v);
        for edge in transpose.adjacent(v) {
            metrics.increment(EDGES_EXAMINED);
            if !visited[edge.to] {
                visited[edge.to] = true;
                pending.push(edge.to);
            }
        }
    }

    component
}
