use super::{Config, DEFAULT_VAULT_FOLDER, ObsidianConfig};
use anyhow::Result;

/// User-facing preferences shared by every review session.
///
/// Wraps a [`Config`] so the rest of the crate reads and mutates reviewer
/// settings through one explicitly passed object instead of ambient state.
/// Mutations stay in memory until [`Settings::persist`] is called.
#[derive(Debug, Clone)]
pub struct Settings {
    config: Config,
}

impl Settings {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    pub fn obsidian(&self) -> &ObsidianConfig {
        &self.config.obsidian
    }

    /// Replace the Obsidian settings. A blank folder resets to the default.
    pub fn set_obsidian(&mut self, mut obsidian: ObsidianConfig) {
        obsidian.vault_path = obsidian.vault_path.trim().to_string();
        obsidian.folder = obsidian.folder.trim().to_string();
        if obsidian.folder.is_empty() {
            obsidian.folder = DEFAULT_VAULT_FOLDER.to_string();
        }
        self.config.obsidian = obsidian;
    }

    /// Enabled and pointing at a non-blank vault path.
    pub fn is_obsidian_configured(&self) -> bool {
        let obsidian = self.obsidian();
        obsidian.enabled && !obsidian.vault_path.trim().is_empty()
    }

    /// Current reviewer identity, if one has been generated.
    pub fn identity(&self) -> Option<&str> {
        let name = self.config.identity.name.trim();
        (!name.is_empty()).then_some(name)
    }

    /// Replace the reviewer identity with a fresh one and return it.
    pub fn regenerate_identity(&mut self) -> &str {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.config.identity.name = format!("tater-{}", &id[..8]);
        &self.config.identity.name
    }

    pub fn persist(&self) -> Result<()> {
        self.config.save()
    }
}
