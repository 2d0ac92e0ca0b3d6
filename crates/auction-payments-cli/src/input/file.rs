use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use auction_payments_core::report::PaymentSessionInput;

/// Read a session file with `config` and `lots`.
pub fn read_session(path: &str) -> Result<PaymentSessionInput, Box<dyn std::error::Error>> {
    read_file(path)
}

/// Read an input file into a typed struct. `.yaml` / `.yml` files are
/// parsed as YAML, everything else as JSON.
pub fn read_file<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let is_yaml = matches!(
        canonical.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let value = if is_yaml {
        read_yaml(&canonical)?
    } else {
        read_json(&canonical)?
    };
    tracing::debug!(path = %canonical.display(), yaml = is_yaml, "loaded input file");
    Ok(value)
}

/// Read a JSON file and deserialise into a typed struct.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
    Ok(value)
}

/// Read a YAML file and deserialise into a typed struct.
fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let value: T = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
    Ok(value)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
