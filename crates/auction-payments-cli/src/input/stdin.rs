use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a session or lot request piped on stdin.
/// Returns None if stdin is a TTY (interactive) or nothing was piped.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

/// Parse piped text. A leading `{` or `[` is read as JSON, anything else as
/// YAML, so `--input` and stdin accept the same session formats.
fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let is_json = trimmed.starts_with('{') || trimmed.starts_with('[');
    let value = if is_json {
        serde_json::from_str(trimmed).map_err(|e| format!("Failed to parse stdin as JSON: {e}"))?
    } else {
        serde_yaml::from_str(trimmed).map_err(|e| format!("Failed to parse stdin as YAML: {e}"))?
    };
    tracing::debug!(bytes = trimmed.len(), yaml = !is_json, "read input from stdin");
    Ok(Some(value))
}
