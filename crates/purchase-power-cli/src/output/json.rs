use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print JSON to stdout.
pub fn print_json(value: &Value) {
    let mut out = io::stdout().lock();
    if let Err(e) = serde_json::to_writer_pretty(&mut out, value).and_then(|_| {
        writeln!(out).map_err(serde_json::Error::io)
    }) {
        eprintln!("JSON serialization error: {}", e);
    }
}

/// YAML rendering of the same value, e.g. to save a `policy` as an override.
pub fn print_yaml(value: &Value) {
    match serde_yaml::to_string(value) {
        Ok(s) => print!("{}", s),
        Err(e) => eprintln!("YAML serialization error: {}", e),
    }
}
