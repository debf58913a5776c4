use crate::infrastructure::{CliError, Result};
use peerchess_core::{RoomRecord, RoomRequest, RoomResponse, SessionMessage};
use schemars::schema::RootSchema;
use schemars::schema_for;
use std::path::{Path, PathBuf};

/// JSON schemas of every message that crosses the wire
pub fn wire_schemas() -> Vec<(&'static str, RootSchema)> {
    vec![
        ("session_message", schema_for!(SessionMessage)),
        ("room_request", schema_for!(RoomRequest)),
        ("room_response", schema_for!(RoomResponse)),
        ("room_record", schema_for!(RoomRecord)),
    ]
}

/// All schemas as one JSON object keyed by name
pub fn schemas_json() -> Result<String> {
    let mut map = serde_json::Map::new();
    for (name, schema) in wire_schemas() {
        map.insert(name.to_string(), serde_json::to_value(schema)?);
    }
    Ok(serde_json::to_string_pretty(&serde_json::Value::Object(map))?)
}

/// Write `<name>.schema.json` files into `dir`, creating it if needed
pub fn write_schemas(dir: &Path) -> Result<Vec<PathBuf>> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::invalid_directory(dir.to_path_buf()));
    }
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (name, schema) in wire_schemas() {
        let path = dir.join(format!("{}.schema.json", name));
        std::fs::write(&path, serde_json::to_string_pretty(&schema)?)?;
        tracing::debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
