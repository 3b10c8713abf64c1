use directories::BaseDirs;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
struct ObsidianAppConfig {
    #[serde(default)]
    vaults: HashMap<String, ObsidianVaultEntry>,
}

#[derive(Debug, Deserialize)]
struct ObsidianVaultEntry {
    #[serde(default)]
    path: Option<String>,
}

/// Location of Obsidian's own app config (`obsidian.json`) for this platform.
pub fn obsidian_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join("obsidian").join("obsidian.json"))
}

/// Vault roots registered with the local Obsidian install.
pub fn detect_vaults() -> Vec<String> {
    obsidian_config_path()
        .map(|path| detect_vaults_in(&path))
        .unwrap_or_default()
}

/// Vault roots listed in `config_file` that still exist on disk, sorted.
///
/// Any read or parse failure yields an empty list; vault selection then falls
/// back to manual entry.
pub fn detect_vaults_in(config_file: &Path) -> Vec<String> {
    let contents = match std::fs::read_to_string(config_file) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::debug!(path = %config_file.display(), "no obsidian config: {e}");
            return Vec::new();
        }
    };

    let config: ObsidianAppConfig = match serde_json::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!(path = %config_file.display(), "unreadable obsidian config: {e}");
            return Vec::new();
        }
    };

    config
        .vaults
        .into_values()
        .filter_map(|entry| entry.path)
        .filter(|path| Path::new(path).exists())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
