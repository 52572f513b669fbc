//! `strata scc`: list strongly connected components.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use strata_core::{Condensation, Graph, OperationCounter, SccAlgorithm};

use super::{VertexRef, counters_line, join_names, load_graph};
use crate::config::StrataConfig;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `strata scc`.
#[derive(Args, Debug)]
pub struct SccArgs {
    /// Graph JSON file.
    pub file: PathBuf,

    /// Algorithm to run: tarjan or kosaraju (overrides config).
    #[arg(long, short = 'a')]
    pub algorithm: Option<SccAlgorithm>,

    /// Also print the condensation DAG.
    #[arg(long)]
    pub condense: bool,
}

#[derive(Debug, Serialize)]
struct SccReport {
    algorithm: SccAlgorithm,
    component_count: usize,
    is_dag: bool,
    components: Vec<ComponentRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    condensation: Option<Vec<CondensedEdge>>,
    metrics: OperationCounter,
}

#[derive(Debug, Serialize)]
struct ComponentRow {
    id: usize,
    size: usize,
    cyclic: bool,
    members: Vec<VertexRef>,
}

#[derive(Debug, Serialize)]
struct CondensedEdge {
    from: usize,
    to: usize,
}

/// Execute `strata scc`.
pub fn run_scc(args: &SccArgs, config: &StrataConfig, output: OutputMode) -> anyhow::Result<()> {
    let document = load_graph(&args.file, output)?;
    let algorithm = args.algorithm.unwrap_or(config.analysis.scc);
    let report = build_report(&document.graph, algorithm, args.condense)?;
    render_mode(output, &report, render_text, render_pretty)
}

fn build_report(graph: &Graph, algorithm: SccAlgorithm, condense: bool) -> anyhow::Result<SccReport> {
    let mut metrics = OperationCounter::new();
    let result = algorithm.run(graph, &mut metrics);

    let components = result
        .components()
        .iter()
        .enumerate()
        .map(|(id, members)| {
            let mut sorted = members.clone();
            sorted.sort_unstable();
            ComponentRow {
                id,
                size: members.len(),
                cyclic: result.is_cyclic(id),
                members: VertexRef::list(graph, &sorted),
            }
        })
        .collect();

    let condensation = if condense {
        let dag = Condensation::build(result.components(), graph)?;
        let edges = (0..dag.component_count())
            .flat_map(|from| {
                dag.successors(from)
                    .into_iter()
                    .flatten()
                    .map(move |&to| CondensedEdge { from, to })
            })
            .collect();
        Some(edges)
    } else {
        None
    };

    Ok(SccReport {
        algorithm,
        component_count: result.component_count(),
        is_dag: result.is_acyclic(),
        components,
        condensation,
        metrics,
    })
}

fn render_text(report: &SccReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "algorithm={} components={} dag={} {}",
        report.algorithm,
        report.component_count,
        report.is_dag,
        counters_line(&report.metrics)
    )?;
    for c in &report.components {
        writeln!(
            w,
            "component={} size={} cyclic={} members={}",
            c.id,
            c.size,
            c.cyclic,
            join_names(&c.members, ",")
        )?;
    }
    for e in report.condensation.iter().flatten() {
        writeln!(w, "condensed_edge={}->{}", e.from, e.to)?;
    }
    Ok(())
}

fn render_pretty(report: &SccReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!("Strongly connected components ({})", report.algorithm),
    )?;
    pretty_kv(w, "components", report.component_count.to_string())?;
    pretty_kv(w, "is DAG", if report.is_dag { "yes" } else { "no" })?;
    pretty_kv(w, "operations", counters_line(&report.metrics))?;
    writeln!(w)?;
    for c in &report.components {
        let marker = if c.cyclic { " (cycle)" } else { "" };
        writeln!(
            w,
            "  #{:<4} size {:<6}{marker}  {}",
            c.id,
            c.size,
            join_names(&c.members, ", ")
        )?;
    }
    if let Some(edges) = &report.condensation {
        writeln!(w)?;
        pretty_section(w, "Condensation")?;
        if edges.is_empty() {
            writeln!(w, "  (no edges between components)")?;
        }
        for e in edges {
            writeln!(w, "  #{} -> #{}", e.from, e.to)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: SccArgs,
    }

    fn two_cycles() -> Graph {
        let mut g = Graph::new(5);
        for (a, b) in [(0, 1), (1, 0), (1, 2), (2, 3), (3, 2), (4, 4)] {
            g.add_edge(a, b).expect("edge");
        }
        g
    }

    #[test]
    fn parses_algorithm_and_condense() {
        let w = Wrapper::parse_from(["test", "g.json", "--algorithm", "kosaraju", "--condense"]);
        assert_eq!(w.args.algorithm, Some(SccAlgorithm::Kosaraju));
        assert!(w.args.condense);
        assert_eq!(w.args.file, PathBuf::from("g.json"));
    }

    #[test]
    fn rejects_unknown_algorithm() {
        assert!(Wrapper::try_parse_from(["test", "g.json", "-a", "dijkstra"]).is_err());
    }

    #[test]
    fn both_algorithms_report_same_sizes() {
        let g = two_cycles();
        let mut sizes: Vec<Vec<usize>> = SccAlgorithm::ALL
            .iter()
            .map(|&a| {
                let r = build_report(&g, a, false).expect("report");
                let mut s: Vec<usize> = r.components.iter().map(|c| c.size).collect();
                s.sort_unstable();
                s
            })
            .collect();
        sizes.dedup();
        assert_eq!(sizes, vec![vec![1, 2, 2]]);
    }

    #[test]
    fn self_loop_component_is_cyclic() {
        let r = build_report(&two_cycles(), SccAlgorithm::Tarjan, false).expect("report");
        assert!(r.components.iter().all(|c| c.cyclic));
        assert!(!r.is_dag);
        assert!(r.condensation.is_none());
    }

    #[test]
    fn condensation_edges_are_listed() {
        let r = build_report(&two_cycles(), SccAlgorithm::Tarjan, true).expect("report");
        let edges = r.condensation.as_ref().expect("condensation requested");
        assert_eq!(edges.len(), 1);

        let mut out = Vec::new();
        render_text(&r, &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert_eq!(rendered.matches("condensed_edge=").count(), 1);
    }

    #[test]
    fn pretty_marks_cycles() {
        let r = build_report(&two_cycles(), SccAlgorithm::Kosaraju, true).expect("report");
        let mut out = Vec::new();
        render_pretty(&r, &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.contains("(cycle)"));
        assert!(rendered.contains("Condensation"));
    }
}
