//! `strata topo`: print a topological order or report a cycle.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use strata_core::{Graph, OperationCounter, TopoAlgorithm};

use super::{VertexRef, counters_line, load_graph};
use crate::config::StrataConfig;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `strata topo`.
#[derive(Args, Debug)]
pub struct TopoArgs {
    /// Graph JSON file.
    pub file: PathBuf,

    /// Algorithm to run: kahn or dfs (overrides config).
    #[arg(long, short = 'a')]
    pub algorithm: Option<TopoAlgorithm>,

    /// Exit non-zero when the graph has a cycle.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
struct TopoReport {
    algorithm: TopoAlgorithm,
    has_cycle: bool,
    order: Vec<VertexRef>,
    metrics: OperationCounter,
}

/// Execute `strata topo`.
pub fn run_topo(args: &TopoArgs, config: &StrataConfig, output: OutputMode) -> anyhow::Result<()> {
    let document = load_graph(&args.file, output)?;
    let algorithm = args.algorithm.unwrap_or(config.analysis.topo);
    let report = build_report(&document.graph, algorithm);
    render_mode(output, &report, render_text, render_pretty)?;

    if args.strict && report.has_cycle {
        render_error(
            output,
            &CliError::with_details(
                format!("{} contains a cycle", args.file.display()),
                "run `strata scc` to find the cyclic components",
                "cycle_detected",
            ),
        )?;
        anyhow::bail!("graph contains a cycle");
    }
    Ok(())
}

fn build_report(graph: &Graph, algorithm: TopoAlgorithm) -> TopoReport {
    let mut metrics = OperationCounter::new();
    let order = algorithm.run(graph, &mut metrics);
    TopoReport {
        algorithm,
        has_cycle: order.has_cycle(),
        order: VertexRef::list(graph, order.order()),
        metrics,
    }
}

fn render_text(report: &TopoReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "algorithm={} cycle={} {}",
        report.algorithm,
        report.has_cycle,
        counters_line(&report.metrics)
    )?;
    for v in &report.order {
        writeln!(w, "{}", v.name)?;
    }
    Ok(())
}

fn render_pretty(report: &TopoReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Topological order ({})", report.algorithm))?;
    if report.has_cycle {
        writeln!(w, "Graph has a cycle; no topological order exists.")?;
    } else if report.order.is_empty() {
        writeln!(w, "Graph is empty.")?;
    } else {
        for (position, v) in report.order.iter().enumerate() {
            writeln!(w, "  {:>4}. {}", position + 1, v.name)?;
        }
    }
    writeln!(w)?;
    pretty_kv(w, "operations", counters_line(&report.metrics))?;
    Ok(())
}
