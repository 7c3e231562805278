pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Read command input from `--input` if given, otherwise from piped stdin.
pub fn load_value(path: Option<&str>, what: &str) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_json_value(path)
    } else if let Some(data) = stdin::read_stdin()? {
        Ok(data)
    } else {
        Err(format!("--input file (or piped JSON) is required for {what}").into())
    }
}

pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let value = load_value(path, what)?;
    Ok(serde_json::from_value(value)?)
}

/// Accept either a JSON array of items or a single object.
pub fn load_many<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    match load_value(path, what)? {
        Value::Array(items) => items
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(Into::into))
            .collect(),
        single => Ok(vec![serde_json::from_value(single)?]),
    }
}
