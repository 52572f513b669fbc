//! JSON graph documents.
//!
//! On-disk layout:
//!
//! ```json
//! {
//!   "name": "Task Graph",
//!   "vertices": 3,
//!   "vertexNames": ["fetch", "build", "deploy"],
//!   "edges": [{ "from": 0, "to": 1, "weight": 2.0 }]
//! }
//! ```
//!
//! `weight` defaults to 1.0 when absent. `vertexNames` may be shorter than
//! `vertices`; entries past `vertices` are ignored, and a `null` entry leaves
//! that vertex unnamed. Loading fails on
//! `vertices == 0` and on any edge that names a missing vertex.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use strata_core::{DEFAULT_WEIGHT, Graph};
use tracing::{debug, instrument};

/// Name written when a document has none.
pub const DEFAULT_DOCUMENT_NAME: &str = "Task Graph";

/// A graph plus the document name it was stored under.
#[derive(Debug, Clone)]
pub struct GraphDocument {
    pub name: String,
    pub graph: Graph,
}

impl GraphDocument {
    #[must_use]
    pub fn new(name: impl Into<String>, graph: Graph) -> Self {
        Self {
            name: name.into(),
            graph,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphData {
    #[serde(default)]
    name: Option<String>,
    vertices: usize,
    #[serde(default)]
    vertex_names: Vec<Option<String>>,
    #[serde(default)]
    edges: Vec<EdgeData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EdgeData {
    from: usize,
    to: usize,
    #[serde(default = "default_weight")]
    weight: f64,
}

const fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

/// Parse a JSON document into a graph.
///
/// # Errors
///
/// Fails on malformed JSON, on `vertices == 0`, and on the first edge with an
/// out-of-range endpoint or non-finite weight (reported with its index).
pub fn parse_document(json: &str) -> Result<GraphDocument> {
    let data: GraphData = serde_json::from_str(json).context("invalid graph JSON")?;
    if data.vertices == 0 {
        bail!("graph document must declare at least one vertex");
    }

    let mut graph = Graph::new(data.vertices);
    for (id, name) in data.vertex_names.into_iter().take(data.vertices).enumerate() {
        let Some(name) = name else { continue };
        graph
            .set_name(id, name)
            .with_context(|| format!("vertexNames[{id}]"))?;
    }
    for (index, edge) in data.edges.iter().enumerate() {
        graph
            .add_weighted_edge(edge.from, edge.to, edge.weight)
            .with_context(|| format!("edges[{index}] ({} -> {})", edge.from, edge.to))?;
    }

    Ok(GraphDocument {
        name: data.name.unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string()),
        graph,
    })
}

/// Render a document as pretty-printed JSON.
///
/// Once any vertex is named, `vertexNames` holds one slot per vertex with
/// `null` for the unnamed ones. Fully unnamed graphs omit names entirely.
///
/// # Errors
///
/// Fails only if serialization fails.
pub fn render_document(document: &GraphDocument) -> Result<String> {
    let graph = &document.graph;
    let vertex_names = if graph.named_vertices().next().is_some() {
        (0..graph.vertex_count())
            .map(|v| graph.has_name(v).then(|| graph.name_of(v).into_owned()))
            .collect()
    } else {
        Vec::new()
    };

    let data = GraphData {
        name: Some(document.name.clone()),
        vertices: graph.vertex_count(),
        vertex_names,
        edges: graph
            .edges()
            .map(|e| EdgeData {
                from: e.from,
                to: e.to,
                weight: e.weight,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&data).context("serialize graph document")
}

/// Load a graph document from `path`.
///
/// # Errors
///
/// Fails if the file cannot be read or does not parse (see [`parse_document`]).
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_document(path: &Path) -> Result<GraphDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let document =
        parse_document(&content).with_context(|| format!("Failed to load {}", path.display()))?;
    debug!(
        vertices = document.graph.vertex_count(),
        edges = document.graph.edge_count(),
        "graph loaded"
    );
    Ok(document)
}

/// Write `document` to `path`, creating parent directories.
///
/// # Errors
///
/// Fails if a directory cannot be created or the file cannot be written.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn save_document(document: &GraphDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = render_document(document)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("graph saved");
    Ok(())
}

/// BLAKE3 fingerprint of a graph's content, independent of edge order.
///
/// Covers the vertex count, every explicitly assigned name and the sorted
/// `(from, to, weight)` multiset. An unnamed vertex hashes differently from
/// one explicitly named after its id.
#[must_use]
pub fn fingerprint(graph: &Graph) -> String {
    let mut edges: Vec<(usize, usize, u64)> = graph
        .edges()
        .map(|e| (e.from, e.to, e.weight.to_bits()))
        .collect();
    edges.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    hasher.update(&(graph.vertex_count() as u64).to_le_bytes());
    for v in 0..graph.vertex_count() {
        if graph.has_name(v) {
            hasher.update(b"\x01");
            hasher.update(graph.name_of(v).as_bytes());
        }
        hasher.update(b"\x00");
    }
    for (from, to, weight) in edges {
        hasher.update(&(from as u64).to_le_bytes());
        hasher.update(&(to as u64).to_le_bytes());
        hasher.update(&weight.to_le_bytes());
    }
    format!("blake3:{}", hasher.finalize())
}
