mod loader;
pub mod schema;
mod settings;

pub use schema::{BrowserConfig, Config, IdentityConfig, ObsidianConfig, DEFAULT_VAULT_FOLDER};
pub use settings::Settings;
