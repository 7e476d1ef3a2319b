use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::StatsConfig;
use crate::errors::{Result, StatsError};

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".survey-stats.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<StatsConfig> {
    let config = toml::from_str::<StatsConfig>(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit path; any failure is an error.
pub fn load_config_from(path: &Path) -> Result<StatsConfig> {
    let contents = read_config_file(path).map_err(|e| {
        StatsError::config_with_path(format!("Failed to read config: {}", e), path)
    })?;
    parse_and_validate_config(&contents).map_err(|e| match e {
        StatsError::Config { message, .. } => StatsError::config_with_path(message, path),
        other => StatsError::config_with_path(other.to_string(), path),
    })
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<StatsConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            warn!(
                "Invalid config {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

// "File not found" is the normal case while walking ancestors.
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Directory ancestors of `start`, nearest first, up to `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for the config file.
pub fn discover_config(start: PathBuf) -> Option<StatsConfig> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
}

/// Load configuration from the current directory hierarchy, or defaults.
pub fn load_config() -> StatsConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return StatsConfig::default();
        }
    };

    discover_config(current).unwrap_or_else(|| {
        debug!(
            "No config found after checking {} directories. Using default config.",
            MAX_TRAVERSAL_DEPTH
        );
        StatsConfig::default()
    })
}
