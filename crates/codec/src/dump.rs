//! Canonical compact text rendering of JSON values.

use std::io;

use shapewire_core::JsonValue;

/// Renders a JSON value as compact text: UTF-8 passthrough, `,` and `:`
/// separators, no added whitespace.
pub fn dump_compact(json: &JsonValue) -> String {
    json.to_string()
}

/// Writes a JSON value as one compact line, newline-terminated.
pub fn dump<W: io::Write>(json: &JsonValue, writer: &mut W) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, json).map_err(io::Error::from)?;
    writer.write_all(b"\n")
}
