use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde_json::Value;

use crate::model::RawProject;

/// Read the script (and optionally a key table) from disk into `RawProject`.
///
/// `name` defaults to the script's file stem; writers use it to name their
/// outputs.
pub fn load(script: &Path, keys: Option<&Path>, name: Option<&str>) -> Result<RawProject> {
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("Reading {}", script.display()))?;
    info!("Script loaded, size: {} bytes", text.len());

    let keys = match keys {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Reading {}", path.display()))?;
            let table = load_keys_from_json(&json)
                .with_context(|| format!("Parsing key table {}", path.display()))?;
            info!("Key table loaded, {} keys", table.len());
            Some(table)
        }
        None => None,
    };

    let name = match name {
        Some(name) => name.to_string(),
        None => script
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("cannot derive a name from {}", script.display()))?
            .to_string(),
    };

    Ok(RawProject {
        name,
        script: text,
        keys,
    })
}

/// Parse a key table of the form `{ "KEY_A": 1, "KEY_B": 2, ... }`.
///
/// Names are upper-cased, since script lines are matched case-insensitively.
/// Codes must fit in a byte.
pub fn load_keys_from_json(json: &str) -> Result<HashMap<String, u8>> {
    let root: Value = serde_json::from_str(json)?;

    let obj = root
        .as_object()
        .ok_or_else(|| anyhow!("key table must be a JSON object"))?;
    if obj.is_empty() {
        return Err(anyhow!("key table is empty"));
    }

    let mut keys = HashMap::with_capacity(obj.len());
    for (name, value) in obj {
        let code = value
            .as_u64()
            .and_then(|c| u8::try_from(c).ok())
            .ok_or_else(|| anyhow!("key `{name}` has code {value}, expected 0..=255"))?;

        let folded = name.to_uppercase();
        if keys.insert(folded.clone(), code).is_some() {
            return Err(anyhow!("key `{folded}` defined twice"));
        }
        debug!("key {folded} = {code}");
    }

    Ok(keys)
}
