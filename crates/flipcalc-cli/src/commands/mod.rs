pub mod analysis;
pub mod deal;
pub mod exit;

use serde::de::DeserializeOwned;

use crate::input;

/// Load a typed input from `--input`, falling back to piped stdin.
/// Returns None when neither is present so the caller can build one from flags.
pub fn load_input<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(input::file::read_json(path)?));
    }
    match input::stdin::read_stdin()? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}
