use crate::config::CONFIG_FILE_NAME;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

const DEFAULT_CONFIG: &str = r#"# Survey statistics configuration

parallel = true

[facets]
# limit = 10
# min_percent = 1.0
# min_count = 5

[buckets]
cutoff = 1
limit = 1000

[sort]
sort = "count"
order = "desc"

[means]
enabled = false

[enrichment]
enabled = true
max_concurrency = 8
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    info!(path = %config_path.display(), "Wrote default configuration");
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(())
}
