//! Depth-first topological sort with three-colour cycle detection.
//!
//! # Algorithm
//!
//! Start vertices are taken in increasing id order. Entering a vertex marks
//! it [`Color::InProgress`]; once its last out-edge is explored it becomes
//! [`Color::Finished`] and is appended to the finish list. Reversing that
//! list gives the order. Any edge into an in-progress vertex (self-loops
//! included) closes a cycle and aborts the whole run.

use std::time::Instant;

use tracing::{debug, instrument};

use super::TopoOrder;
use crate::graph::Graph;
use crate::metrics::{DFS_VISITS, EDGES_EXAMINED, Metrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Finished,
}

struct Frame {
    vertex: usize,
    cursor: usize,
}

/// Order `graph` by reverse depth-first finish time.
///
/// Records `dfs_visits`, `edges_examined` and the elapsed time. On a cycle the
/// counters reflect the work done up to detection.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn dfs_order<M: Metrics>(graph: &Graph, metrics: &mut M) -> TopoOrder {
    let started = Instant::now();
    let n = graph.vertex_count();
    let mut color = vec![Color::Unvisited; n];
    let mut finished: Vec<usize> = Vec::with_capacity(n);
    let mut call_stack: Vec<Frame> = Vec::new();

    for start in 0..n {
        if color[start] != Color::Unvisited {
            continue;
        }

        metrics.increment(DFS_VISITS);
        color[start] = Color::InProgress;
        call_stack.push(Frame {
            vertex: start,
            cursor: 0,
        });

        while let Some(frame) = call_stack.last_mut() {
            let v = frame.vertex;
            let Some(edge) = graph.adjacent(v).get(frame.cursor) else {
                call_stack.pop();
                color[v] = Color::Finished;
                finished.push(v);
                continue;
            };
            frame.cursor += 1;
            metrics.increment(EDGES_EXAMINED);

            match color[edge.to] {
                Color::InProgress => {
                    metrics.set_elapsed(started.elapsed());
                    debug!(from = v, to = edge.to, "dfs found a back edge");
                    return TopoOrder::cyclic();
                }
                Color::Unvisited => {
                    metrics.increment(DFS_VISITS);
                    color[edge.to] = Color::InProgress;
                    call_stack.push(Frame {
                        vertex: edge.to,
                        cursor: 0,
                    });
                }
                Color::Finished => {}
            }
        }
    }

    finished.reverse();
    metrics.set_elapsed(started.elapsed());
    TopoOrder::acyclic(finished)
}
