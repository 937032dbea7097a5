use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::LoadError;

/// Reads and parses the JSON document the benchmarks run against.
pub fn load_fixture(path: &Path) -> Result<Value, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data = serde_json::from_str(&raw).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = raw.len(), "loaded fixture");
    Ok(data)
}
