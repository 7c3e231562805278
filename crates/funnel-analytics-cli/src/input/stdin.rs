use serde_json::Value;
use std::io::{self, Read};

/// Records piped into a command, e.g. `cat days.json | funnel aggregate qualification`.
///
/// `None` when nothing is piped (interactive terminal) or the pipe is blank,
/// so the caller can fall back to flags or report the missing input.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut piped = String::new();
    io::stdin().read_to_string(&mut piped)?;
    let piped = piped.trim();
    if piped.is_empty() {
        return Ok(None);
    }

    let value = serde_json::from_str(piped)
        .map_err(|e| format!("piped input is not valid JSON: {e}"))?;
    tracing::debug!(bytes = piped.len(), "read piped input");
    Ok(Some(value))
}
