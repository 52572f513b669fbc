#![forbid(unsafe_code)]

mod cmd;
mod config;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "strata: directed-graph analysis (SCCs, topological order, DAG critical paths)",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./strata.toml, then the user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON output (same as `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Full analysis report for one graph",
        long_about = "Run both SCC algorithms, the condensation, a topological sort and, for DAGs, shortest paths and the critical path.",
        after_help = "EXAMPLES:\n    # Analyze a generated dataset\n    strata analyze data/small_dag_1.json\n\n    # Use a named source vertex for path analysis\n    strata analyze data/small_dag_1.json --source prep\n\n    # Emit machine-readable output\n    strata analyze data/small_dag_1.json --format json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "List strongly connected components",
        long_about = "List strongly connected components with their members, optionally with the condensation DAG.",
        after_help = "EXAMPLES:\n    # Components via Tarjan (default)\n    strata scc data/small_cyclic_1.json\n\n    # Kosaraju, plus condensation edges\n    strata scc data/small_cyclic_1.json --algorithm kosaraju --condense"
    )]
    Scc(cmd::scc::SccArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Topological order",
        long_about = "Print a topological order of the vertices, or report that the graph has a cycle.",
        after_help = "EXAMPLES:\n    # Kahn's algorithm (default)\n    strata topo data/small_dag_1.json\n\n    # DFS-based sort; fail when a cycle exists\n    strata topo data/small_dag_1.json --algorithm dfs --strict"
    )]
    Topo(cmd::topo::TopoArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "DAG shortest/longest paths",
        long_about = "Single-source shortest or longest distances over a DAG, an optional path to a target and the critical path.",
        after_help = "EXAMPLES:\n    # Shortest distances from vertex 0\n    strata paths data/small_dag_1.json\n\n    # Longest path to a named target\n    strata paths data/small_dag_1.json --source 0 --target deploy --longest"
    )]
    Paths(cmd::paths::PathsArgs),

    #[command(
        next_help_heading = "Datasets",
        about = "Write the synthetic dataset catalog",
        long_about = "Write every catalog dataset as a JSON graph file.",
        after_help = "EXAMPLES:\n    # Write into the configured datasets directory\n    strata generate\n\n    # Write somewhere else\n    strata generate --dir /tmp/graphs\n\n    # List the catalog without writing\n    strata generate --list"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        next_help_heading = "Datasets",
        about = "Benchmark every algorithm",
        long_about = "Time Tarjan, Kosaraju, Kahn, DFS sort and DAG paths on each graph file.",
        after_help = "EXAMPLES:\n    # Benchmark every dataset in the datasets directory\n    strata bench\n\n    # Benchmark specific files with 20 runs each\n    strata bench data/large_dense_dag.json -n 20"
    )]
    Bench(cmd::bench::BenchArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    strata completions bash\n\n    # Generate zsh completions\n    strata completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("STRATA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "strata=debug,info"
        } else {
            "strata=info,warn"
        })
    });

    let format = env::var("STRATA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = output::resolve_output_mode(cli.format, cli.json);
    let config = config::load_config(cli.config.as_deref())?;
    debug!(?config, ?output, "resolved configuration");

    match cli.command {
        Commands::Analyze(ref args) => cmd::analyze::run_analyze(args, &config, output),
        Commands::Scc(ref args) => cmd::scc::run_scc(args, &config, output),
        Commands::Topo(ref args) => cmd::topo::run_topo(args, &config, output),
        Commands::Paths(ref args) => cmd::paths::run_paths(args, &config, output),
        Commands::Generate(ref args) => cmd::generate::run_generate(args, &config, output),
        Commands::Bench(ref args) => cmd::bench::run_bench(args, &config, output),
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}
