//! Loading of JSON input files.

use std::fs;
use std::path::Path;

use anyhow::Context;
use dash_tables::DataTable;
use dash_widgets::ManagerConfig;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Read and parse a JSON file.
///
/// # Errors
///
/// Returns an error naming the file if it cannot be read or parsed.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let parsed =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    debug!(path = %path.display(), bytes = raw.len(), "loaded input file");
    Ok(parsed)
}

/// Load manager settings, or the defaults when no file is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_manager_config(path: Option<&Path>) -> anyhow::Result<ManagerConfig> {
    path.map_or_else(|| Ok(ManagerConfig::default()), load_json)
}

/// Load a JSON array of data tables.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_tables(path: &Path) -> anyhow::Result<Vec<DataTable>> {
    load_json(path)
}
