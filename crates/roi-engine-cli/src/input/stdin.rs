use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise piped JSON from stdin. `None` when stdin is a terminal or
/// nothing was piped, so callers can fall back to flags.
pub fn read_piped<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    match buffer.trim() {
        "" => Ok(None),
        body => serde_json::from_str(body)
            .map(Some)
            .map_err(|e| format!("Failed to parse stdin: {e}").into()),
    }
}
