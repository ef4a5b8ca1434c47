//! JSON output formatter

use serde::Serialize;

/// Envelope used by the batch endpoints and `--format json`
#[derive(Serialize)]
pub struct ResultsEnvelope<'a, T: Serialize> {
    pub results: &'a [T],
}

/// Serialize any value as pretty JSON
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print a value as JSON to stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", to_json_string(value)?);
    Ok(())
}
