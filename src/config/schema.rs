use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Folder inside the vault that approved plans land in when none is given.
pub const DEFAULT_VAULT_FOLDER: &str = "plannotator";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub obsidian: ObsidianConfig,

    #[serde(default)]
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Launch the system browser for local sessions (default: true)
    #[serde(default = "default_true")]
    pub open: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self { open: true }
    }
}

/// Auto-save settings for archiving approved plans into an Obsidian vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObsidianConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub vault_path: String,
    #[serde(default = "default_vault_folder")]
    pub folder: String,
}

impl Default for ObsidianConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            vault_path: String::new(),
            folder: default_vault_folder(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Reviewer name attached to annotations; generated on demand
    #[serde(default)]
    pub name: String,
}

fn default_true() -> bool {
    true
}

fn default_vault_folder() -> String {
    DEFAULT_VAULT_FOLDER.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert!(config.browser.open);
        assert!(!config.obsidian.enabled);
        assert!(config.obsidian.vault_path.is_empty());
        assert_eq!(config.obsidian.folder, "plannotator");
        assert!(config.identity.name.is_empty());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.browser.open);
        assert_eq!(config.obsidian, ObsidianConfig::default());
    }

    #[test]
    fn partial_obsidian_section_keeps_default_folder() {
        let config: Config = toml::from_str(
            r#"
[obsidian]
enabled = true
vault_path = "~/Notes"
"#,
        )
        .unwrap();

        assert!(config.obsidian.enabled);
        assert_eq!(config.obsidian.vault_path, "~/Notes");
        assert_eq!(config.obsidian.folder, "plannotator");
    }

    #[test]
    fn config_toml_round_trip() {
        let original = Config {
            config_path: PathBuf::from("/ignored/config.toml"),
            browser: BrowserConfig { open: false },
            obsidian: ObsidianConfig {
                enabled: true,
                vault_path: "/vaults/work".into(),
                folder: "plans".into(),
            },
            identity: IdentityConfig {
                name: "tater-1234abcd".into(),
            },
        };

        let toml = toml::to_string(&original).unwrap();
        let decoded: Config = toml::from_str(&toml).unwrap();

        assert!(!decoded.browser.open);
        assert_eq!(decoded.obsidian, original.obsidian);
        assert_eq!(decoded.identity, original.identity);
        assert_eq!(decoded.config_path, PathBuf::new());
    }
}
