//! Optional TOML configuration.
//!
//! Lookup order, first hit wins:
//! 1. `--config <path>` (must exist)
//! 2. `./strata.toml`
//! 3. `<user config dir>/strata/config.toml`
//! 4. built-in defaults
//!
//! Every key is optional; command-line flags override whatever is loaded.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strata_core::{SccAlgorithm, TopoAlgorithm};
use tracing::debug;

const LOCAL_CONFIG: &str = "strata.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrataConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub bench: BenchConfig,
    #[serde(default)]
    pub datasets: DatasetsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub source: usize,
    #[serde(default)]
    pub scc: SccAlgorithm,
    #[serde(default)]
    pub topo: TopoAlgorithm,
    #[serde(default = "default_max_listed_components")]
    pub max_listed_components: usize,
    #[serde(default = "default_max_listed_order")]
    pub max_listed_order: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            source: 0,
            scc: SccAlgorithm::default(),
            topo: TopoAlgorithm::default(),
            max_listed_components: default_max_listed_components(),
            max_listed_order: default_max_listed_order(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetsConfig {
    #[serde(default = "default_datasets_dir")]
    pub dir: PathBuf,
}

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self {
            dir: default_datasets_dir(),
        }
    }
}

const fn default_max_listed_components() -> usize {
    5
}

const fn default_max_listed_order() -> usize {
    10
}

const fn default_iterations() -> usize {
    5
}

fn default_datasets_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Parse a config file.
pub fn load_config_file(path: &Path) -> Result<StrataConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<StrataConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the effective configuration.
pub fn load_config(explicit: Option<&Path>) -> Result<StrataConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    let user = dirs::config_dir().map(|dir| dir.join("strata/config.toml"));

    for candidate in std::iter::once(local).chain(user) {
        if candidate.exists() {
            debug!(path = %candidate.display(), "using config file");
            return load_config_file(&candidate);
        }
    }

    Ok(StrataConfig::default())
}
