//! Tarjan's strongly connected components algorithm.
//!
//! # Algorithm
//!
//! Vertices are visited depth-first in increasing id order. Each vertex gets
//! a discovery index and a lowlink, both initialised to the next index, and
//! is pushed onto the component stack. After a child returns its lowlink is
//! folded into the parent's; an edge to a vertex still on the component stack
//! folds that vertex's lowlink in directly. A vertex whose lowlink equals its
//! own index is a component root: the component stack is popped down to and
//! including it.
//!
//! Components are emitted in the order their roots close, so the first
//! component is a sink of the condensation.
//!
//! The recursion is flattened into [`Frame`]s holding the vertex and an
//! adjacency cursor.

use std::time::Instant;

use tracing::{debug, instrument};

use super::{Component, SccResult};
use crate::graph::Graph;
use crate::metrics::{DFS_VISITS, EDGES_EXAMINED, Metrics};

struct Frame {
    vertex: usize,
    cursor: usize,
}

struct TarjanState {
    next_index: usize,
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Component>,
}

impl TarjanState {
    fn new(vertex_count: usize) -> Self {
        Self {
            next_index: 0,
            index: vec![None; vertex_count],
            lowlink: vec![0; vertex_count],
            on_stack: vec![false; vertex_count],
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn discover(&mut self, v: usize) {
        self.index[v] = Some(self.next_index);
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    fn is_root(&self, v: usize) -> bool {
        self.index[v] == Some(self.lowlink[v])
    }

    fn pop_component(&mut self, root: usize) {
        let mut component = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            component.push(w);
            if w == root {
                break;
            }
        }
        self.components.push(component);
    }
}

/// Partition `graph` into strongly connected components with Tarjan's algorithm.
///
/// Records `dfs_visits`, `edges_examined` and the elapsed time in `metrics`.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn tarjan<M: Metrics>(graph: &Graph, metrics: &mut M) -> SccResult {
    let started = Instant::now();
    let n = graph.vertex_count();
    let mut state = TarjanState::new(n);
    let mut call_stack: Vec<Frame> = Vec::new();

    for start in 0..n {
        if state.index[start].is_some() {
            continue;
        }

        metrics.increment(DFS_VISITS);
        state.discover(start);
        call_stack.push(Frame {
            vertex: start,
            cursor: 0,
        });

        while let Some(frame) = call_stack.last_mut() {
            let v = frame.vertex;

            if let Some(edge) = graph.adjacent(v).get(frame.cursor) {
                frame.cursor += 1;
                metrics.increment(EDGES_EXAMINED);
                let w = edge.to;

                if state.index[w].is_none() {
                    metrics.increment(DFS_VISITS);
                    state.discover(w);
                    call_stack.push(Frame {
                        vertex: w,
                        cursor: 0,
                    });
                } else if state.on_stack[w] {
                    state.lowlink[v] = state.lowlink[v].min(state.lowlink[w]);
                }
                continue;
            }

            call_stack.pop();
            if state.is_root(v) {
                state.pop_component(v);
            }
            if let Some(parent) = call_stack.last() {
                let p = parent.vertex;
                state.lowlink[p] = state.lowlink[p].min(state.lowlink[v]);
            }
        }
    }

    metrics.set_elapsed(started.elapsed());
    debug!(components = state.components.len(), "tarjan finished");
    SccResult::new(state.components, graph)
}
