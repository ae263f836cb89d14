use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use brooklyn_core::{ApplicationSpec, ResourceData};
use serde::{Deserialize, Serialize};

/// Local record of a managed application: the remote id plus the
/// declaration it was last applied with.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StateFile {
    #[serde(flatten)]
    pub data: ResourceData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ApplicationSpec>,
}

pub fn load(path: &str) -> Result<StateFile> {
    if !Path::new(path).exists() {
        return Ok(StateFile::default());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read state file: {path}"))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid state file: {path}"))
}

pub fn save(path: &str, state: &StateFile) -> Result<()> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(path, content).with_context(|| format!("Failed to write state file: {path}"))?;
    Ok(())
}

pub fn read_spec(path: &str) -> Result<ApplicationSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    toml::from_str(&content).with_context(|| format!("Invalid application declaration: {path}"))
}
