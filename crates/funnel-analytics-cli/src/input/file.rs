use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Load a `--input` file of daily records, ledger months or sheet rows.
pub fn read_json_value(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let (source, contents) = read_text(path)?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("'{}' is not valid JSON: {}", source.display(), e))?;
    tracing::debug!(path = %source.display(), bytes = contents.len(), "loaded input file");
    Ok(value)
}

/// Load a `--format-config` file. JSON configs parse too, since YAML is a superset.
pub fn read_yaml<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let (source, contents) = read_text(path)?;
    serde_yaml::from_str(&contents)
        .map_err(|e| format!("invalid format config '{}': {}", source.display(), e).into())
}

fn read_text(path: &str) -> Result<(PathBuf, String), Box<dyn std::error::Error>> {
    let source = resolve_path(path)?;
    let contents = fs::read_to_string(&source)
        .map_err(|e| format!("cannot read '{}': {}", source.display(), e))?;
    Ok((source, contents))
}

/// Relative paths are taken from the working directory. The target must be
/// an existing regular file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let source = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !source.is_file() {
        let problem = if source.exists() { "not a file" } else { "no such file" };
        return Err(format!("{problem}: {}", source.display()).into());
    }
    Ok(source)
}
