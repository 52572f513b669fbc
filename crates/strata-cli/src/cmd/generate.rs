//! `strata generate`: write the synthetic dataset catalog.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use strata_data::{CATALOG, DatasetSummary, generate_all};

use crate::config::StrataConfig;
use crate::output::{CliError, OutputMode, pretty_section, render_error, render_mode};

/// Arguments for `strata generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output directory (defaults to `[datasets] dir`).
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,

    /// List the catalog without writing anything.
    #[arg(long)]
    pub list: bool,
}

#[derive(Debug, Serialize)]
struct CatalogEntry {
    name: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct CatalogListing {
    datasets: Vec<CatalogEntry>,
}

impl CatalogListing {
    fn new() -> Self {
        Self {
            datasets: CATALOG
                .iter()
                .map(|d| CatalogEntry {
                    name: d.name,
                    description: d.description,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateReport {
    dir: PathBuf,
    datasets: Vec<DatasetSummary>,
}

/// Execute `strata generate`.
pub fn run_generate(
    args: &GenerateArgs,
    config: &StrataConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    if args.list {
        return render_mode(
            output,
            &CatalogListing::new(),
            render_catalog_text,
            render_catalog_pretty,
        );
    }

    let dir = args.dir.clone().unwrap_or_else(|| config.datasets.dir.clone());
    let datasets = match generate_all(&dir) {
        Ok(datasets) => datasets,
        Err(err) => {
            render_error(
                output,
                &CliError::with_details(
                    format!("{err:#}"),
                    "check that the directory is writable or pass --dir",
                    "generate_failed",
                ),
            )?;
            return Err(err);
        }
    };

    let report = GenerateReport { dir, datasets };
    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &GenerateReport, w: &mut dyn Write) -> std::io::Result<()> {
    for d in &report.datasets {
        writeln!(
            w,
            "dataset={} vertices={} edges={} path={} fingerprint={}",
            d.name,
            d.vertices,
            d.edges,
            d.path.display(),
            d.fingerprint
        )?;
    }
    Ok(())
}

fn render_pretty(report: &GenerateReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Wrote {} datasets to {}",
            report.datasets.len(),
            report.dir.display()
        ),
    )?;
    for d in &report.datasets {
        writeln!(
            w,
            "  {:<22} {:>4} vertices {:>5} edges",
            d.name, d.vertices, d.edges
        )?;
    }
    Ok(())
}

fn render_catalog_text(listing: &CatalogListing, w: &mut dyn Write) -> std::io::Result<()> {
    for e in &listing.datasets {
        writeln!(w, "{}\t{}", e.name, e.description)?;
    }
    Ok(())
}

fn render_catalog_pretty(listing: &CatalogListing, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Dataset catalog")?;
    for e in &listing.datasets {
        writeln!(w, "  {:<22} {}", e.name, e.description)?;
    }
    Ok(())
}
