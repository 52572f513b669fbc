//! Synthetic dataset catalog.
//!
//! Nine named graphs spanning small/medium/large sizes and cyclic/acyclic
//! shapes. The fixed ones are spelled out edge by edge; the randomized ones
//! draw from a [`StdRng`] seeded per dataset, so every build of a dataset is
//! identical.
//!
//! | Dataset               | Vertices | Shape                                  |
//! |-----------------------|----------|----------------------------------------|
//! | `small_cyclic_1`      | 8        | two cycles plus cross edges            |
//! | `small_dag_1`         | 7        | build pipeline                         |
//! | `small_dag_2`         | 10       | independent chains joining at a sink   |
//! | `medium_multiple_scc` | 15       | three SCCs feeding a chain             |
//! | `medium_sparse_dag`   | 16       | six layers                             |
//! | `medium_dense_cyclic` | 18       | three 6-cycles, linked (seed 42)       |
//! | `large_sparse_dag`    | 30       | five layers of five (seed 123)         |
//! | `large_dense_dag`     | 35       | 60% forward edges, window 7 (seed 456) |
//! | `large_complex_scc`   | 40       | five 8-cycles, linked (seed 789)       |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use strata_core::Graph;
use tracing::{info, instrument};

use crate::document::{GraphDocument, fingerprint, save_document};

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct Dataset {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> Result<Graph>,
}

impl Dataset {
    /// Build this dataset's graph.
    ///
    /// # Errors
    ///
    /// Fails only if the dataset definition references a missing vertex.
    pub fn build(&self) -> Result<GraphDocument> {
        let graph = (self.build)().with_context(|| format!("build dataset {}", self.name))?;
        Ok(GraphDocument::new(self.name, graph))
    }

    /// File name used by [`generate_all`].
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }
}

/// What [`generate_all`] wrote for one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub path: PathBuf,
    pub vertices: usize,
    pub edges: usize,
    pub fingerprint: String,
}

pub const CATALOG: [Dataset; 9] = [
    Dataset {
        name: "small_cyclic_1",
        description: "8 tasks, cycles 0-1-2-3 and 4-5-6",
        build: small_cyclic_1,
    },
    Dataset {
        name: "small_dag_1",
        description: "7-step build pipeline",
        build: small_dag_1,
    },
    Dataset {
        name: "small_dag_2",
        description: "three chains merging into one sink",
        build: small_dag_2,
    },
    Dataset {
        name: "medium_multiple_scc",
        description: "three SCCs feeding a chain of singletons",
        build: medium_multiple_scc,
    },
    Dataset {
        name: "medium_sparse_dag",
        description: "16-vertex layered DAG",
        build: medium_sparse_dag,
    },
    Dataset {
        name: "medium_dense_cyclic",
        description: "three linked 6-cycles",
        build: medium_dense_cyclic,
    },
    Dataset {
        name: "large_sparse_dag",
        description: "five layers of five, 1-3 forward edges each",
        build: large_sparse_dag,
    },
    Dataset {
        name: "large_dense_dag",
        description: "35 vertices, 60% of forward edges within a window of 7",
        build: large_dense_dag,
    },
    Dataset {
        name: "large_complex_scc",
        description: "five linked 8-cycles",
        build: large_complex_scc,
    },
];

/// Look up a dataset by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static Dataset> {
    CATALOG.iter().find(|d| d.name == name)
}

/// Write every dataset to `<dir>/<name>.json`.
///
/// # Errors
///
/// Fails on the first dataset that cannot be built or written.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn generate_all(dir: &Path) -> Result<Vec<DatasetSummary>> {
    let mut summaries = Vec::with_capacity(CATALOG.len());
    for dataset in &CATALOG {
        let document = dataset.build()?;
        let path = dir.join(dataset.file_name());
        save_document(&document, &path)?;
        info!(
            dataset = dataset.name,
            vertices = document.graph.vertex_count(),
            edges = document.graph.edge_count(),
            "dataset written"
        );
        summaries.push(DatasetSummary {
            name: dataset.name.to_string(),
            path,
            vertices: document.graph.vertex_count(),
            edges: document.graph.edge_count(),
            fingerprint: fingerprint(&document.graph),
        });
    }
    Ok(summaries)
}

// ---------------------------------------------------------------------------
// Random builders
// ---------------------------------------------------------------------------

/// Random DAG: each forward pair `i -> j` with `j - i <= window` is kept with
/// probability `density`. Weights are integers in `1..=5`.
///
/// # Errors
///
/// Propagates [`Graph::add_weighted_edge`] failures; endpoints are drawn from
/// `0..vertices`, so none occur in practice.
pub fn random_dag<R: Rng>(
    vertices: usize,
    window: usize,
    density: f64,
    rng: &mut R,
) -> Result<Graph> {
    let density = density.clamp(0.0, 1.0);
    let mut graph = Graph::new(vertices);
    for from in 0..vertices {
        for to in from + 1..vertices.min(from + window + 1) {
            if rng.gen_bool(density) {
                let weight = f64::from(rng.gen_range(1u8..=5));
                graph.add_weighted_edge(from, to, weight)?;
            }
        }
    }
    Ok(graph)
}

/// Random directed graph with `edges` uniformly drawn edges. Self loops and
/// multi-edges may occur.
///
/// # Errors
///
/// Propagates [`Graph::add_weighted_edge`] failures, as [`random_dag`] does.
pub fn random_digraph<R: Rng>(vertices: usize, edges: usize, rng: &mut R) -> Result<Graph> {
    let mut graph = Graph::new(vertices);
    if vertices == 0 {
        return Ok(graph);
    }
    for _ in 0..edges {
        let from = rng.gen_range(0..vertices);
        let to = rng.gen_range(0..vertices);
        let weight = f64::from(rng.gen_range(1u8..=5));
        graph.add_weighted_edge(from, to, weight)?;
    }
    Ok(graph)
}

// ---------------------------------------------------------------------------
// Dataset definitions
// ---------------------------------------------------------------------------

fn with_edges(names: &[String], edges: &[(usize, usize, f64)]) -> Result<Graph> {
    let mut graph = Graph::new(names.len());
    for (id, name) in names.iter().enumerate() {
        graph.set_name(id, name.as_str())?;
    }
    for &(from, to, weight) in edges {
        graph.add_weighted_edge(from, to, weight)?;
    }
    Ok(graph)
}

fn named(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn task_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("task_{i}")).collect()
}

fn small_cyclic_1() -> Result<Graph> {
    with_edges(
        &named(&["task_A", "task_B", "task_C", "task_D", "task_E", "task_F", "task_G", "task_H"]),
        &[
            (0, 1, 2.0),
            (1, 2, 3.0),
            (2, 3, 2.0),
            (3, 0, 1.0),
            (4, 5, 2.0),
            (5, 6, 1.0),
            (6, 4, 1.0),
            (1, 4, 2.0),
            (3, 7, 3.0),
        ],
    )
}

fn small_dag_1() -> Result<Graph> {
    with_edges(
        &named(&["start", "prep", "build", "test", "deploy", "verify", "end"]),
        &[
            (0, 1, 1.0),
            (1, 2, 2.0),
            (2, 3, 3.0),
            (2, 4, 2.0),
            (3, 4, 1.0),
            (4, 5, 2.0),
            (5, 6, 1.0),
        ],
    )
}

fn small_dag_2() -> Result<Graph> {
    let names: Vec<String> = (0..10).map(|i| format!("t{i}")).collect();
    with_edges(
        &names,
        &[
            (0, 1, 2.0),
            (1, 2, 1.0),
            (3, 4, 3.0),
            (4, 5, 1.0),
            (6, 7, 2.0),
            (2, 8, 1.0),
            (5, 8, 2.0),
            (7, 8, 1.0),
            (8, 9, 2.0),
        ],
    )
}

fn medium_multiple_scc() -> Result<Graph> {
    with_edges(
        &task_names(15),
        &[
            // {0,1,2}
            (0, 1, 2.0),
            (1, 2, 1.0),
            (2, 0, 1.0),
            // {3,4,5}
            (3, 4, 2.0),
            (4, 5, 1.0),
            (5, 3, 2.0),
            // {6,7}
            (6, 7, 1.0),
            (7, 6, 2.0),
            (0, 3, 2.0),
            (2, 6, 1.0),
            (4, 8, 2.0),
            (7, 9, 1.0),
            (8, 10, 1.0),
            (9, 10, 2.0),
            (10, 11, 1.0),
            (11, 12, 2.0),
            (12, 13, 1.0),
            (13, 14, 2.0),
            (1, 9, 1.0),
            (5, 11, 2.0),
        ],
    )
}

fn medium_sparse_dag() -> Result<Graph> {
    with_edges(
        &task_names(16),
        &[
            (0, 1, 1.0),
            (0, 2, 2.0),
            (1, 3, 2.0),
            (1, 4, 1.0),
            (2, 4, 2.0),
            (2, 5, 1.0),
            (3, 6, 1.0),
            (4, 7, 2.0),
            (5, 7, 1.0),
            (5, 8, 2.0),
            (6, 9, 2.0),
            (7, 10, 1.0),
            (8, 10, 1.0),
            (8, 11, 2.0),
            (9, 12, 1.0),
            (10, 13, 2.0),
            (11, 13, 1.0),
            (11, 14, 2.0),
            (12, 15, 2.0),
            (13, 15, 1.0),
            (14, 15, 2.0),
        ],
    )
}

fn medium_dense_cyclic() -> Result<Graph> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut graph = with_edges(&task_names(18), &[])?;
    for ring in 0..3 {
        let base = ring * 6;
        for j in 0..6 {
            let weight = f64::from(rng.gen_range(1u8..=3));
            graph.add_weighted_edge(base + j, base + (j + 1) % 6, weight)?;
        }
    }
    for (from, to, weight) in [(0, 6, 2.0), (6, 12, 1.0), (8, 14, 2.0), (12, 2, 1.0)] {
        graph.add_weighted_edge(from, to, weight)?;
    }
    Ok(graph)
}

fn large_sparse_dag() -> Result<Graph> {
    const LAYERS: usize = 5;
    const LAYER_SIZE: usize = 5;

    let mut rng = StdRng::seed_from_u64(123);
    let mut graph = with_edges(&task_names(30), &[])?;
    for layer in 0..LAYERS - 1 {
        let next = (layer + 1) * LAYER_SIZE;
        for i in 0..LAYER_SIZE {
            let from = layer * LAYER_SIZE + i;
            for _ in 0..rng.gen_range(1..=3) {
                let to = next + rng.gen_range(0..LAYER_SIZE);
                let weight = f64::from(rng.gen_range(1u8..=5));
                graph.add_weighted_edge(from, to, weight)?;
            }
        }
    }
    Ok(graph)
}

fn large_dense_dag() -> Result<Graph> {
    let mut rng = StdRng::seed_from_u64(456);
    let mut graph = random_dag(35, 7, 0.6, &mut rng)?;
    for (id, name) in task_names(35).into_iter().enumerate() {
        graph.set_name(id, name)?;
    }
    Ok(graph)
}

fn large_complex_scc() -> Result<Graph> {
    let mut rng = StdRng::seed_from_u64(789);
    let mut graph = with_edges(&task_names(40), &[])?;
    for ring in 0..5 {
        let base = ring * 8;
        for j in 0..8 {
            let weight = f64::from(rng.gen_range(1u8..=3));
            graph.add_weighted_edge(base + j, base + (j + 1) % 8, weight)?;
        }
    }
    for (from, to, weight) in [(3, 10, 2.0), (13, 20, 1.0), (19, 26, 2.0), (29, 34, 1.0)] {
        graph.add_weighted_edge(from, to, weight)?;
    }
    Ok(graph)
}
