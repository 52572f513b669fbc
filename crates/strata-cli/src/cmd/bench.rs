//! `strata bench`: time every algorithm over a set of graph files.
//!
//! Each dataset runs Tarjan, Kosaraju, Kahn, DFS sort and shortest DAG paths
//! `iterations` times. DAG paths are skipped on cyclic inputs. Output is one
//! row per dataset and algorithm plus a per-algorithm summary across
//! datasets.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use strata_core::{DagPaths, Graph, OperationCounter, SccAlgorithm, TopoAlgorithm};
use tracing::{debug, info};

use super::{counters_line, load_graph};
use crate::config::StrataConfig;
use crate::output::{CliError, OutputMode, pretty_section, render_error, render_mode};

/// Arguments for `strata bench`.
#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Graph JSON files (defaults to every `*.json` in `[datasets] dir`).
    pub files: Vec<PathBuf>,

    /// Runs per dataset and algorithm (overrides config).
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u32).range(1..))]
    pub iterations: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
enum BenchAlgorithm {
    Tarjan,
    Kosaraju,
    Kahn,
    Dfs,
    DagPaths,
}

impl BenchAlgorithm {
    const ALL: [Self; 5] = [
        Self::Tarjan,
        Self::Kosaraju,
        Self::Kahn,
        Self::Dfs,
        Self::DagPaths,
    ];

    const fn name(self) -> &'static str {
        match self {
            Self::Tarjan => "tarjan",
            Self::Kosaraju => "kosaraju",
            Self::Kahn => "kahn",
            Self::Dfs => "dfs",
            Self::DagPaths => "dag_paths",
        }
    }

    fn run(self, graph: &Graph, source: usize, metrics: &mut OperationCounter) {
        match self {
            Self::Tarjan => {
                SccAlgorithm::Tarjan.run(graph, metrics);
            }
            Self::Kosaraju => {
                SccAlgorithm::Kosaraju.run(graph, metrics);
            }
            Self::Kahn => {
                TopoAlgorithm::Kahn.run(graph, metrics);
            }
            Self::Dfs => {
                TopoAlgorithm::Dfs.run(graph, metrics);
            }
            Self::DagPaths => {
                DagPaths::new(graph).shortest_paths(source, metrics);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct Timing {
    min_ms: f64,
    avg_ms: f64,
    max_ms: f64,
}

impl Timing {
    fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let min_ms = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max_ms = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg_ms = samples.iter().sum::<f64>() / samples.len() as f64;
        Some(Self {
            min_ms,
            avg_ms,
            max_ms,
        })
    }
}

#[derive(Debug, Serialize)]
struct BenchRow {
    dataset: String,
    algorithm: BenchAlgorithm,
    vertices: usize,
    edges: usize,
    skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    timing: Option<Timing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<OperationCounter>,
    #[serde(skip)]
    samples: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct AlgorithmSummary {
    algorithm: BenchAlgorithm,
    runs: usize,
    timing: Timing,
}

#[derive(Debug, Serialize)]
struct BenchReport {
    iterations: u32,
    rows: Vec<BenchRow>,
    summary: Vec<AlgorithmSummary>,
}

/// Execute `strata bench`.
pub fn run_bench(args: &BenchArgs, config: &StrataConfig, output: OutputMode) -> anyhow::Result<()> {
    let files = if args.files.is_empty() {
        dataset_files(&config.datasets.dir)?
    } else {
        args.files.clone()
    };

    if files.is_empty() {
        render_error(
            output,
            &CliError::with_details(
                format!("no graph files in {}", config.datasets.dir.display()),
                "run `strata generate` first, or pass graph files explicitly",
                "no_datasets",
            ),
        )?;
        anyhow::bail!("no graph files to benchmark");
    }

    let iterations = args
        .iterations
        .unwrap_or_else(|| u32::try_from(config.bench.iterations).unwrap_or(u32::MAX))
        .max(1);

    let mut rows = Vec::with_capacity(files.len() * BenchAlgorithm::ALL.len());
    for file in &files {
        let document = load_graph(file, output)?;
        info!(dataset = %document.name, path = %file.display(), "benchmarking");
        rows.extend(bench_graph(
            &document.name,
            &document.graph,
            config.analysis.source,
            iterations,
        ));
    }

    let report = BenchReport {
        iterations,
        summary: summarize(&rows),
        rows,
    };
    render_mode(output, &report, render_text, render_pretty)
}

/// Every `*.json` file directly inside `dir`, sorted by path.
fn dataset_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "datasets directory does not exist");
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn bench_graph(name: &str, graph: &Graph, source: usize, iterations: u32) -> Vec<BenchRow> {
    let acyclic = !TopoAlgorithm::Kahn.run(graph, &mut OperationCounter::new()).has_cycle();

    BenchAlgorithm::ALL
        .into_iter()
        .map(|algorithm| {
            let skipped = algorithm == BenchAlgorithm::DagPaths && !acyclic;
            let mut samples = Vec::new();
            let mut last = None;
            if !skipped {
                for _ in 0..iterations {
                    let mut metrics = OperationCounter::new();
                    algorithm.run(graph, source, &mut metrics);
                    samples.push(metrics.elapsed_millis());
                    last = Some(metrics);
                }
            }
            debug!(
                dataset = name,
                algorithm = algorithm.name(),
                skipped,
                runs = samples.len(),
                "benchmark finished"
            );
            BenchRow {
                dataset: name.to_string(),
                algorithm,
                vertices: graph.vertex_count(),
                edges: graph.edge_count(),
                skipped,
                timing: Timing::from_samples(&samples),
                metrics: last,
                samples,
            }
        })
        .collect()
}

fn summarize(rows: &[BenchRow]) -> Vec<AlgorithmSummary> {
    let mut samples: BTreeMap<BenchAlgorithm, Vec<f64>> = BTreeMap::new();
    for row in rows {
        samples
            .entry(row.algorithm)
            .or_default()
            .extend_from_slice(&row.samples);
    }
    samples
        .into_iter()
        .filter_map(|(algorithm, samples)| {
            Timing::from_samples(&samples).map(|timing| AlgorithmSummary {
                algorithm,
                runs: samples.len(),
                timing,
            })
        })
        .collect()
}

fn render_text(report: &BenchReport, w: &mut dyn Write) -> std::io::Result<()> {
    for row in &report.rows {
        match (&row.timing, &row.metrics) {
            (Some(t), Some(m)) => writeln!(
                w,
                "dataset={} algorithm={} vertices={} edges={} min_ms={:.3} avg_ms={:.3} max_ms={:.3} {}",
                row.dataset,
                row.algorithm.name(),
                row.vertices,
                row.edges,
                t.min_ms,
                t.avg_ms,
                t.max_ms,
                counters_line(m)
            )?,
            _ => writeln!(
                w,
                "dataset={} algorithm={} vertices={} edges={} skipped=cyclic",
                row.dataset,
                row.algorithm.name(),
                row.vertices,
                row.edges
            )?,
        }
    }
    for s in &report.summary {
        writeln!(
            w,
            "summary algorithm={} runs={} min_ms={:.3} avg_ms={:.3} max_ms={:.3}",
            s.algorithm.name(),
            s.runs,
            s.timing.min_ms,
            s.timing.avg_ms,
            s.timing.max_ms
        )?;
    }
    Ok(())
}

fn render_pretty(report: &BenchReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!("Benchmark ({} iterations per algorithm)", report.iterations),
    )?;
    writeln!(
        w,
        "{:<22} {:<10} {:>6} {:>7} {:>10} {:>10} {:>10}",
        "dataset", "algorithm", "V", "E", "min ms", "avg ms", "max ms"
    )?;
    for row in &report.rows {
        match &row.timing {
            Some(t) => writeln!(
                w,
                "{:<22} {:<10} {:>6} {:>7} {:>10.3} {:>10.3} {:>10.3}",
                row.dataset,
                row.algorithm.name(),
                row.vertices,
                row.edges,
                t.min_ms,
                t.avg_ms,
                t.max_ms
            )?,
            None => writeln!(
                w,
                "{:<22} {:<10} {:>6} {:>7} {:>32}",
                row.dataset,
                row.algorithm.name(),
                row.vertices,
                row.edges,
                "skipped (cyclic)"
            )?,
        }
    }

    writeln!(w)?;
    pretty_section(w, "Per-algorithm summary")?;
    for s in &report.summary {
        writeln!(
            w,
            "{:<10} {:>5} runs  min {:>9.3} ms  avg {:>9.3} ms  max {:>9.3} ms",
            s.algorithm.name(),
            s.runs,
            s.timing.min_ms,
            s.timing.avg_ms,
            s.timing.max_ms
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use strata_core::Metrics;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: BenchArgs,
    }

    fn chain(n: usize) -> Graph {
        let mut g = Graph::new(n);
        for v in 1..n {
            g.add_edge(v - 1, v).expect("edge");
        }
        g
    }

    #[test]
    fn parses_files_and_iterations() {
        let w = Wrapper::parse_from(["test", "a.json", "b.json", "-n", "3"]);
        assert_eq!(w.args.files.len(), 2);
        assert_eq!(w.args.iterations, Some(3));
    }

    #[test]
    fn zero_iterations_is_rejected() {
        assert!(Wrapper::try_parse_from(["test", "--iterations", "0"]).is_err());
    }

    #[test]
    fn timing_summarizes_samples() {
        let t = Timing::from_samples(&[2.0, 1.0, 3.0]).expect("samples");
        assert!((t.min_ms - 1.0).abs() < f64::EPSILON);
        assert!((t.avg_ms - 2.0).abs() < f64::EPSILON);
        assert!((t.max_ms - 3.0).abs() < f64::EPSILON);
        assert!(Timing::from_samples(&[]).is_none());
    }

    #[test]
    fn dag_runs_every_algorithm() {
        let rows = bench_graph("chain", &chain(20), 0, 2);
        assert_eq!(rows.len(), BenchAlgorithm::ALL.len());
        assert!(rows.iter().all(|r| !r.skipped && r.samples.len() == 2));

        let paths = rows
            .iter()
            .find(|r| r.algorithm == BenchAlgorithm::DagPaths)
            .expect("dag paths row");
        let metrics = paths.metrics.as_ref().expect("metrics");
        assert_eq!(metrics.counter(strata_core::metrics::RELAXATIONS), 19);
    }

    #[test]
    fn cyclic_input_skips_dag_paths() {
        let mut g = chain(5);
        g.add_edge(4, 0).expect("edge");
        let rows = bench_graph("ring", &g, 0, 1);
        let skipped: Vec<BenchAlgorithm> = rows
            .iter()
            .filter(|r| r.skipped)
            .map(|r| r.algorithm)
            .collect();
        assert_eq!(skipped, vec![BenchAlgorithm::DagPaths]);

        let summary = summarize(&rows);
        assert_eq!(summary.len(), 4);
        assert!(summary.iter().all(|s| s.runs == 1));
    }

    #[test]
    fn summary_aggregates_across_datasets() {
        let mut rows = bench_graph("a", &chain(10), 0, 2);
        rows.extend(bench_graph("b", &chain(30), 0, 3));
        let summary = summarize(&rows);
        assert_eq!(summary.len(), 5);
        assert!(summary.iter().all(|s| s.runs == 5));
    }

    #[test]
    fn dataset_files_filters_json() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("b.json"), "{}").expect("write");
        std::fs::write(dir.path().join("a.json"), "{}").expect("write");
        std::fs::write(dir.path().join("notes.txt"), "").expect("write");
        let files = dataset_files(dir.path()).expect("list");
        let names: Vec<String> = files
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
        assert!(dataset_files(&dir.path().join("missing")).expect("missing").is_empty());
    }

    #[test]
    fn text_render_marks_skipped_rows() {
        let mut g = chain(3);
        g.add_edge(2, 0).expect("edge");
        let rows = bench_graph("ring", &g, 0, 1);
        let report = BenchReport {
            iterations: 1,
            summary: summarize(&rows),
            rows,
        };
        let mut out = Vec::new();
        render_text(&report, &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.contains("algorithm=dag_paths vertices=3 edges=3 skipped=cyclic"));
        assert_eq!(rendered.matches("summary algorithm=").count(), 4);
    }
}
