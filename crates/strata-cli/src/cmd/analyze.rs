//! `strata analyze`: full report for one graph file.
//!
//! Runs both SCC algorithms, the condensation, the configured topological
//! sort and, when the graph is acyclic, shortest paths and the critical path
//! from the source vertex.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use strata_core::metrics::RELAXATIONS;
use strata_core::{
    Condensation, DagPaths, Graph, Metrics, OperationCounter, SccAlgorithm, TopoAlgorithm,
};
use strata_data::fingerprint;
use tracing::{info, instrument};

use super::{
    VertexRef, counters_line, finite, format_distance, join_names, load_graph, resolve_vertex_arg,
};
use crate::config::StrataConfig;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `strata analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Graph JSON file.
    pub file: PathBuf,

    /// Source vertex (name or id) for path analysis.
    #[arg(long)]
    pub source: Option<String>,

    /// Topological sort to report (overrides config).
    #[arg(long)]
    pub topo: Option<TopoAlgorithm>,
}

#[derive(Debug, Serialize)]
struct AnalyzeReport {
    file: String,
    name: String,
    graph: GraphStats,
    scc: Vec<SccSummary>,
    condensation: CondensationSummary,
    topo: TopoSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    paths: Option<PathsSummary>,
}

#[derive(Debug, Serialize)]
struct GraphStats {
    vertices: usize,
    edges: usize,
    density: f64,
    fingerprint: String,
}

#[derive(Debug, Serialize)]
struct SccSummary {
    algorithm: SccAlgorithm,
    component_count: usize,
    largest: usize,
    top_sizes: Vec<usize>,
    is_dag: bool,
    metrics: OperationCounter,
}

#[derive(Debug, Serialize)]
struct CondensationSummary {
    components: usize,
    edges: usize,
}

#[derive(Debug, Serialize)]
struct TopoSummary {
    algorithm: TopoAlgorithm,
    has_cycle: bool,
    total: usize,
    order: Vec<VertexRef>,
    metrics: OperationCounter,
}

#[derive(Debug, Serialize)]
struct PathsSummary {
    source: VertexRef,
    reachable: usize,
    relaxations: u64,
    critical_length: Option<f64>,
    critical_path: Vec<VertexRef>,
    metrics: OperationCounter,
}

/// Execute `strata analyze`.
pub fn run_analyze(
    args: &AnalyzeArgs,
    config: &StrataConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let document = load_graph(&args.file, output)?;
    let graph = &document.graph;
    let source = resolve_vertex_arg(
        graph,
        args.source.as_deref(),
        config.analysis.source,
        output,
    )?;
    let topo = args.topo.unwrap_or(config.analysis.topo);

    let report = build_report(
        args.file.display().to_string(),
        &document.name,
        graph,
        source,
        topo,
        config,
    )?;
    info!(
        components = report.scc.first().map_or(0, |s| s.component_count),
        has_cycle = report.topo.has_cycle,
        "analysis finished"
    );

    render_mode(output, &report, render_text, render_pretty)
}

#[instrument(skip_all, fields(vertices = graph.vertex_count()))]
fn build_report(
    file: String,
    name: &str,
    graph: &Graph,
    source: usize,
    topo: TopoAlgorithm,
    config: &StrataConfig,
) -> anyhow::Result<AnalyzeReport> {
    let listed = config.analysis.max_listed_components;

    let mut scc = Vec::with_capacity(SccAlgorithm::ALL.len());
    let mut components = Vec::new();
    for algorithm in SccAlgorithm::ALL {
        let mut metrics = OperationCounter::new();
        let result = algorithm.run(graph, &mut metrics);
        let sizes = result.component_sizes();
        scc.push(SccSummary {
            algorithm,
            component_count: result.component_count(),
            largest: result.largest_component_size(),
            top_sizes: sizes.into_iter().take(listed).collect(),
            is_dag: result.is_acyclic(),
            metrics,
        });
        if algorithm == config.analysis.scc {
            components = result.into_components();
        }
    }

    let condensation = Condensation::build(&components, graph)?;

    let mut topo_metrics = OperationCounter::new();
    let order = topo.run(graph, &mut topo_metrics);
    let shown: Vec<usize> = order
        .order()
        .iter()
        .copied()
        .take(config.analysis.max_listed_order)
        .collect();

    let paths = (!order.has_cycle()).then(|| {
        let engine = DagPaths::new(graph);
        let mut metrics = OperationCounter::new();
        let shortest = engine.shortest_paths(source, &mut metrics);
        let relaxations = metrics.counter(RELAXATIONS);
        let critical = engine.critical_path(source, &mut OperationCounter::new());
        PathsSummary {
            source: VertexRef::new(graph, source),
            reachable: shortest.reachable_count(),
            relaxations,
            critical_length: finite(critical.length),
            critical_path: VertexRef::list(graph, &critical.path),
            metrics,
        }
    });

    Ok(AnalyzeReport {
        file,
        name: name.to_string(),
        graph: GraphStats {
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            density: graph.density(),
            fingerprint: fingerprint(graph),
        },
        scc,
        condensation: CondensationSummary {
            components: condensation.component_count(),
            edges: condensation.edge_count(),
        },
        topo: TopoSummary {
            algorithm: topo,
            has_cycle: order.has_cycle(),
            total: order.len(),
            order: VertexRef::list(graph, &shown),
            metrics: topo_metrics,
        },
        paths,
    })
}

fn sizes_line(sizes: &[usize]) -> String {
    sizes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn render_text(report: &AnalyzeReport, w: &mut dyn Write) -> std::io::Result<()> {
    let g = &report.graph;
    writeln!(
        w,
        "graph name={} vertices={} edges={} density={:.4} fingerprint={}",
        report.name, g.vertices, g.edges, g.density, g.fingerprint
    )?;
    for s in &report.scc {
        writeln!(
            w,
            "scc algorithm={} components={} largest={} sizes={} dag={} {}",
            s.algorithm,
            s.component_count,
            s.largest,
            sizes_line(&s.top_sizes),
            s.is_dag,
            counters_line(&s.metrics)
        )?;
    }
    writeln!(
        w,
        "condensation components={} edges={}",
        report.condensation.components, report.condensation.edges
    )?;
    let t = &report.topo;
    if t.has_cycle {
        writeln!(w, "topo algorithm={} cycle=true", t.algorithm)?;
    } else {
        writeln!(
            w,
            "topo algorithm={} cycle=false order={} {}",
            t.algorithm,
            join_names(&t.order, ","),
            counters_line(&t.metrics)
        )?;
    }
    if let Some(p) = &report.paths {
        writeln!(
            w,
            "paths source={} reachable={} relaxations={} critical_length={} critical_path={}",
            p.source.name,
            p.reachable,
            p.relaxations,
            format_distance(p.critical_length),
            join_names(&p.critical_path, ",")
        )?;
    }
    Ok(())
}

fn render_pretty(report: &AnalyzeReport, w: &mut dyn Write) -> std::io::Result<()> {
    let g = &report.graph;
    pretty_section(w, &format!("Graph: {} ({})", report.name, report.file))?;
    pretty_kv(w, "vertices", g.vertices.to_string())?;
    pretty_kv(w, "edges", g.edges.to_string())?;
    pretty_kv(w, "density", format!("{:.4}", g.density))?;
    pretty_kv(w, "fingerprint", &g.fingerprint)?;

    for s in &report.scc {
        writeln!(w)?;
        pretty_section(w, &format!("Strongly connected components ({})", s.algorithm))?;
        pretty_kv(w, "components", s.component_count.to_string())?;
        pretty_kv(w, "largest", s.largest.to_string())?;
        pretty_kv(w, "top sizes", sizes_line(&s.top_sizes))?;
        pretty_kv(w, "is DAG", if s.is_dag { "yes" } else { "no" })?;
        pretty_kv(w, "operations", counters_line(&s.metrics))?;
    }

    writeln!(w)?;
    pretty_section(w, "Condensation")?;
    pretty_kv(w, "components", report.condensation.components.to_string())?;
    pretty_kv(w, "edges", report.condensation.edges.to_string())?;

    let t = &report.topo;
    writeln!(w)?;
    pretty_section(w, &format!("Topological order ({})", t.algorithm))?;
    if t.has_cycle {
        writeln!(w, "Graph has a cycle; no topological order exists.")?;
    } else {
        let mut line = join_names(&t.order, " -> ");
        if t.total > t.order.len() {
            line.push_str(&format!(" ... ({} more)", t.total - t.order.len()));
        }
        pretty_kv(w, "order", line)?;
        pretty_kv(w, "operations", counters_line(&t.metrics))?;
    }

    if let Some(p) = &report.paths {
        writeln!(w)?;
        pretty_section(w, &format!("DAG paths from {}", p.source.name))?;
        pretty_kv(w, "reachable", p.reachable.to_string())?;
        pretty_kv(w, "relaxations", p.relaxations.to_string())?;
        pretty_kv(w, "critical", format_distance(p.critical_length))?;
        pretty_kv(w, "path", join_names(&p.critical_path, " -> "))?;
    }
    Ok(())
}
