pub mod analyze;
pub mod bench;
pub mod completions;
pub mod generate;
pub mod paths;
pub mod scc;
pub mod topo;

use std::path::Path;

use serde::Serialize;
use strata_core::{Graph, OperationCounter};
use strata_data::{GraphDocument, load_document};

use crate::output::{CliError, OutputMode, render_error};

/// Load a graph file, reporting failures through the CLI error renderer.
pub fn load_graph(path: &Path, output: OutputMode) -> anyhow::Result<GraphDocument> {
    match load_document(path) {
        Ok(document) => Ok(document),
        Err(err) => {
            render_error(
                output,
                &CliError::with_details(
                    format!("{err:#}"),
                    "check the path, or run `strata generate` to write the sample datasets",
                    "load_failed",
                ),
            )?;
            Err(err)
        }
    }
}

/// Resolve a vertex given by name or by numeric id.
pub fn resolve_vertex(graph: &Graph, spec: &str) -> Option<usize> {
    graph.id_of(spec).or_else(|| {
        spec.trim()
            .parse::<usize>()
            .ok()
            .filter(|&id| graph.is_valid_vertex(id))
    })
}

/// Resolve `spec`, falling back to `default` when absent.
///
/// The default usually comes from config, so it is range-checked too.
pub fn resolve_vertex_arg(
    graph: &Graph,
    spec: Option<&str>,
    default: usize,
    output: OutputMode,
) -> anyhow::Result<usize> {
    let Some(spec) = spec else {
        if graph.is_valid_vertex(default) {
            return Ok(default);
        }
        render_error(
            output,
            &CliError::with_details(
                format!("source vertex {default} is out of range"),
                format!(
                    "pass --source, or set [analysis] source to an id in 0..{}",
                    graph.vertex_count()
                ),
                "unknown_vertex",
            ),
        )?;
        anyhow::bail!("source vertex {default} is out of range");
    };
    if let Some(id) = resolve_vertex(graph, spec) {
        return Ok(id);
    }

    render_error(
        output,
        &CliError::with_details(
            format!("unknown vertex '{spec}'"),
            format!(
                "pass a vertex name or an id in 0..{}",
                graph.vertex_count()
            ),
            "unknown_vertex",
        ),
    )?;
    anyhow::bail!("unknown vertex '{spec}'")
}

/// A vertex id with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VertexRef {
    pub id: usize,
    pub name: String,
}

impl VertexRef {
    pub fn new(graph: &Graph, id: usize) -> Self {
        Self {
            id,
            name: graph.name_of(id).into_owned(),
        }
    }

    pub fn list(graph: &Graph, ids: &[usize]) -> Vec<Self> {
        ids.iter().map(|&id| Self::new(graph, id)).collect()
    }
}

/// Join vertex names with `sep`.
pub fn join_names(vertices: &[VertexRef], sep: &str) -> String {
    vertices
        .iter()
        .map(|v| v.name.as_str())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Counters as `name=value` pairs followed by `elapsed_ms`.
pub fn counters_line(metrics: &OperationCounter) -> String {
    metrics
        .counters()
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .chain(std::iter::once(format!(
            "elapsed_ms={:.3}",
            metrics.elapsed_millis()
        )))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Finite distances only; infinities have no JSON representation.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Format an optional distance, `-` when unreachable.
pub fn format_distance(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |d| format!("{d}"))
}
