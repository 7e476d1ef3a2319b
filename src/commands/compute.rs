use crate::config::{load_config, load_config_from, StatsConfig};
use crate::core::{Entity, ResultsByYear};
use crate::pipeline::stages::{EntityLookup, StaticEntityLookup};
use crate::pipeline::{compute_results, ComputeRequest};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Options for the `compute` command.
#[derive(Debug, Clone)]
pub struct ComputeConfig {
    pub input: PathBuf,
    pub entities: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub pretty: bool,
    pub means: bool,
    pub no_parallel: bool,
}

pub fn handle_compute(config: ComputeConfig) -> Result<()> {
    let stats_config = resolve_config(config.config.as_deref())?;

    let mut params = stats_config.to_params();
    params.means |= config.means;
    params.parallel &= !config.no_parallel;

    let request = read_request(&config.input)?;
    let lookup = match (&config.entities, stats_config.enrichment.enabled) {
        (Some(path), true) => Some(read_entities(path)?),
        (Some(path), false) => {
            debug!(
                "Enrichment disabled; ignoring entity file {}",
                path.display()
            );
            None
        }
        (None, _) => None,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let results = runtime.block_on(compute_results(request, &params, lookup))?;

    write_results(&results, config.output.as_deref(), config.pretty)
}

fn resolve_config(path: Option<&Path>) -> Result<StatsConfig> {
    match path {
        Some(path) => Ok(load_config_from(path)?),
        None => Ok(load_config()),
    }
}

fn read_request(path: &Path) -> Result<ComputeRequest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input {}", path.display()))?;
    let request: ComputeRequest = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid request document {}", path.display()))?;
    info!(
        years = request.results.len(),
        freeform = request.freeform.is_some(),
        "Loaded request"
    );
    Ok(request)
}

fn read_entities(path: &Path) -> Result<Arc<dyn EntityLookup>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read entities {}", path.display()))?;
    let entities: Vec<Entity> = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid entity list {}", path.display()))?;
    let lookup = StaticEntityLookup::new(entities);
    info!(entities = lookup.len(), "Loaded entities");
    Ok(Arc::new(lookup))
}

fn write_results(results: &ResultsByYear, output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(results)?
    } else {
        serde_json::to_string(results)?
    };

    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}
