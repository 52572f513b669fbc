//! `strata paths`: single-source DAG distances and the critical path.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use strata_core::{DagPaths, Graph, Objective, OperationCounter};

use super::{
    VertexRef, counters_line, finite, format_distance, join_names, load_graph, resolve_vertex_arg,
};
use crate::config::StrataConfig;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `strata paths`.
#[derive(Args, Debug)]
pub struct PathsArgs {
    /// Graph JSON file.
    pub file: PathBuf,

    /// Source vertex (name or id). Defaults to the configured source.
    #[arg(long, short = 's')]
    pub source: Option<String>,

    /// Also reconstruct the path to this vertex.
    #[arg(long, short = 't')]
    pub target: Option<String>,

    /// Report longest distances instead of shortest.
    #[arg(long)]
    pub longest: bool,
}

#[derive(Debug, Serialize)]
struct PathsReport {
    source: VertexRef,
    objective: &'static str,
    reachable: usize,
    distances: Vec<DistanceRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<TargetPath>,
    critical_path: CriticalRow,
    metrics: OperationCounter,
}

#[derive(Debug, Serialize)]
struct DistanceRow {
    vertex: VertexRef,
    distance: Option<f64>,
    predecessor: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TargetPath {
    vertex: VertexRef,
    distance: Option<f64>,
    path: Vec<VertexRef>,
}

#[derive(Debug, Serialize)]
struct CriticalRow {
    length: Option<f64>,
    path: Vec<VertexRef>,
}

/// Execute `strata paths`.
pub fn run_paths(args: &PathsArgs, config: &StrataConfig, output: OutputMode) -> anyhow::Result<()> {
    let document = load_graph(&args.file, output)?;
    let graph = &document.graph;
    let source = resolve_vertex_arg(
        graph,
        args.source.as_deref(),
        config.analysis.source,
        output,
    )?;
    let target = match args.target.as_deref() {
        Some(spec) => Some(resolve_vertex_arg(graph, Some(spec), source, output)?),
        None => None,
    };

    let objective = if args.longest {
        Objective::Longest
    } else {
        Objective::Shortest
    };
    let Some(report) = build_report(graph, source, target, objective) else {
        render_error(
            output,
            &CliError::with_details(
                format!("{} contains a cycle", args.file.display()),
                "path analysis needs a DAG; run `strata scc` to find the cycles",
                "cycle_detected",
            ),
        )?;
        anyhow::bail!("graph contains a cycle");
    };
    render_mode(output, &report, render_text, render_pretty)
}

/// `None` when the graph is cyclic.
fn build_report(
    graph: &Graph,
    source: usize,
    target: Option<usize>,
    objective: Objective,
) -> Option<PathsReport> {
    let engine = DagPaths::new(graph);
    let mut metrics = OperationCounter::new();
    let table = match objective {
        Objective::Shortest => engine.shortest_paths(source, &mut metrics),
        Objective::Longest => engine.longest_paths(source, &mut metrics),
    };
    if !table.is_acyclic() {
        return None;
    }

    let distances = (0..graph.vertex_count())
        .map(|v| DistanceRow {
            vertex: VertexRef::new(graph, v),
            distance: finite(table.distance(v)),
            predecessor: table.predecessor(v),
        })
        .collect();

    let target = target.map(|t| TargetPath {
        vertex: VertexRef::new(graph, t),
        distance: finite(table.distance(t)),
        path: VertexRef::list(graph, &table.reconstruct_path(t)),
    });

    let critical = engine.critical_path(source, &mut OperationCounter::new());

    Some(PathsReport {
        source: VertexRef::new(graph, source),
        objective: match objective {
            Objective::Shortest => "shortest",
            Objective::Longest => "longest",
        },
        reachable: table.reachable_count(),
        distances,
        target,
        critical_path: CriticalRow {
            length: finite(critical.length),
            path: VertexRef::list(graph, &critical.path),
        },
        metrics,
    })
}

fn render_text(report: &PathsReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "source={} objective={} reachable={} {}",
        report.source.name,
        report.objective,
        report.reachable,
        counters_line(&report.metrics)
    )?;
    for row in &report.distances {
        writeln!(
            w,
            "vertex={} distance={}",
            row.vertex.name,
            format_distance(row.distance)
        )?;
    }
    if let Some(t) = &report.target {
        writeln!(
            w,
            "target={} distance={} path={}",
            t.vertex.name,
            format_distance(t.distance),
            join_names(&t.path, ",")
        )?;
    }
    writeln!(
        w,
        "critical_length={} critical_path={}",
        format_distance(report.critical_path.length),
        join_names(&report.critical_path.path, ",")
    )
}

fn render_pretty(report: &PathsReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "{} distances from {}",
            if report.objective == "longest" {
                "Longest"
            } else {
                "Shortest"
            },
            report.source.name
        ),
    )?;
    let width = report
        .distances
        .iter()
        .map(|row| row.vertex.name.len())
        .max()
        .unwrap_or(0);
    for row in &report.distances {
        writeln!(
            w,
            "  {:<width$}  {}",
            row.vertex.name,
            format_distance(row.distance)
        )?;
    }
    writeln!(w)?;
    pretty_kv(w, "reachable", report.reachable.to_string())?;
    if let Some(t) = &report.target {
        let route = if t.path.is_empty() {
            "unreachable".to_string()
        } else {
            join_names(&t.path, " -> ")
        };
        pretty_kv(w, "to target", route)?;
    }
    pretty_kv(
        w,
        "critical",
        format!(
            "{} ({})",
            join_names(&report.critical_path.path, " -> "),
            format_distance(report.critical_path.length)
        ),
    )?;
    pretty_kv(w, "operations", counters_line(&report.metrics))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: PathsArgs,
    }

    // 0 -> 1 (2), 0 -> 2 (6), 1 -> 2 (3), 2 -> 3 (1), vertex 4 isolated.
    fn weighted() -> Graph {
        let mut g = Graph::new(5);
        for (a, b, w) in [(0, 1, 2.0), (0, 2, 6.0), (1, 2, 3.0), (2, 3, 1.0)] {
            g.add_weighted_edge(a, b, w).expect("edge");
        }
        g
    }

    #[test]
    fn parses_source_target_longest() {
        let w = Wrapper::parse_from(["test", "g.json", "-s", "fetch", "--target", "3", "--longest"]);
        assert_eq!(w.args.source.as_deref(), Some("fetch"));
        assert_eq!(w.args.target.as_deref(), Some("3"));
        assert!(w.args.longest);
    }

    #[test]
    fn shortest_report_has_null_for_unreachable() {
        let r = build_report(&weighted(), 0, Some(3), Objective::Shortest).expect("dag");
        let distances: Vec<Option<f64>> = r.distances.iter().map(|d| d.distance).collect();
        assert_eq!(distances, vec![Some(0.0), Some(2.0), Some(5.0), Some(6.0), None]);
        assert_eq!(r.reachable, 4);

        let target = r.target.expect("target requested");
        assert_eq!(target.distance, Some(6.0));
        assert_eq!(join_names(&target.path, ","), "0,1,2,3");

        let json = serde_json::to_value(&r.distances[4]).expect("json");
        assert!(json["distance"].is_null());
    }

    #[test]
    fn longest_report_prefers_heavier_edge() {
        let r = build_report(&weighted(), 0, None, Objective::Longest).expect("dag");
        assert_eq!(r.distances[2].distance, Some(6.0));
        assert_eq!(r.critical_path.length, Some(7.0));
        assert_eq!(join_names(&r.critical_path.path, ","), "0,2,3");
    }

    #[test]
    fn cyclic_graph_has_no_report() {
        let mut g = weighted();
        g.add_edge(3, 0).expect("edge");
        assert!(build_report(&g, 0, None, Objective::Shortest).is_none());
    }

    #[test]
    fn text_render_uses_dash_for_unreachable() {
        let r = build_report(&weighted(), 0, None, Objective::Shortest).expect("dag");
        let mut out = Vec::new();
        render_text(&r, &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.contains("vertex=4 distance=-"));
        assert!(rendered.ends_with("critical_length=7 critical_path=0,2,3\n"));
    }
}
