use crate::cli::commands::{Cli, Commands, SettingsArgs};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use crate::app::status::render_settings;
use crate::config::{Config, ObsidianConfig, Settings};
use crate::gateway::{PortSelection, ServerOptions};
use crate::hook::{self, BrowserLauncher, HookOptions, NoBrowser, SystemBrowser};

fn hook_options(config: &Config) -> HookOptions {
    let selection = PortSelection::from_process_env();
    let settings = Settings::new(config.clone());
    HookOptions {
        server: ServerOptions::from_selection(&selection).with_settings(&settings),
        open_browser: config.browser.open,
    }
}

/// Config for `command`, given the result of loading it from disk.
///
/// Review sessions run on defaults when the file is unreadable; only
/// `settings`, which rewrites the file, treats that as fatal.
pub fn resolve_config(command: &Commands, loaded: Result<Config>) -> Result<Config> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if !matches!(command, Commands::Settings(_)) => {
            warn!("Ignoring unreadable config, using defaults: {e:#}");
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

fn launcher(config: &Config) -> &'static dyn BrowserLauncher {
    if config.browser.open {
        &SystemBrowser
    } else {
        &NoBrowser
    }
}

async fn read_plan_file(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut plan = String::new();
        tokio::io::stdin()
            .read_to_string(&mut plan)
            .await
            .context("Failed to read plan from stdin")?;
        return Ok(plan);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read plan file {}", path.display()))
}

fn apply_settings(settings: &mut Settings, args: &SettingsArgs) -> Option<String> {
    let current = settings.obsidian();
    let obsidian = ObsidianConfig {
        enabled: if args.obsidian_enable {
            true
        } else if args.obsidian_disable {
            false
        } else {
            current.enabled
        },
        vault_path: args
            .vault
            .clone()
            .unwrap_or_else(|| current.vault_path.clone()),
        folder: args.folder.clone().unwrap_or_else(|| current.folder.clone()),
    };
    settings.set_obsidian(obsidian);

    args.regenerate_identity
        .then(|| settings.regenerate_identity().to_string())
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command.unwrap_or(Commands::Hook) {
        Commands::Hook => {
            let options = hook_options(&config);
            hook::run_hook(
                tokio::io::stdin(),
                tokio::io::stdout(),
                options,
                launcher(&config),
            )
            .await?;
            Ok(())
        }

        Commands::Review { plan_file, summary } => {
            let plan = read_plan_file(&plan_file).await?;
            let options = hook_options(&config);
            hook::run_review(
                plan,
                summary.as_deref(),
                tokio::io::stdout(),
                options,
                launcher(&config),
            )
            .await?;
            Ok(())
        }

        Commands::Vaults => {
            let vaults = crate::vault::detect_vaults();
            if vaults.is_empty() {
                info!("No Obsidian vaults found");
            }
            for vault in vaults {
                println!("{vault}");
            }
            Ok(())
        }

        Commands::Settings(args) => {
            let mut settings = Settings::new(config);
            if args.is_mutation() {
                if let Some(identity) = apply_settings(&mut settings, &args) {
                    info!("New reviewer identity: {identity}");
                }
                settings.persist()?;
                info!(
                    "Settings saved to {}",
                    settings.config().config_path.display()
                );
            }
            println!("{}", render_settings(&settings));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn settings_flags_merge_with_existing_values() {
        let mut settings = Settings::new(Config::default());
        settings.set_obsidian(ObsidianConfig {
            enabled: false,
            vault_path: "/vaults/main".into(),
            folder: "plans".into(),
        });

        let args = SettingsArgs {
            obsidian_enable: true,
            folder: Some("reviews".into()),
            ..SettingsArgs::default()
        };
        assert!(apply_settings(&mut settings, &args).is_none());

        let obsidian = settings.obsidian();
        assert!(obsidian.enabled);
        assert_eq!(obsidian.vault_path, "/vaults/main");
        assert_eq!(obsidian.folder, "reviews");
    }

    #[test]
    fn regenerate_flag_returns_new_identity() {
        let mut settings = Settings::new(Config::default());
        let args = SettingsArgs {
            regenerate_identity: true,
            ..SettingsArgs::default()
        };
        let identity = apply_settings(&mut settings, &args).unwrap();
        assert_eq!(settings.identity(), Some(identity.as_str()));
    }

    #[test]
    fn disabled_browser_uses_no_launcher() {
        let mut config = Config::default();
        config.browser.open = false;
        assert_eq!(launcher(&config).name(), "none");
        assert!(!hook_options(&config).open_browser);
    }

    #[test]
    fn saved_obsidian_settings_reach_the_server() {
        let mut config = Config::default();
        config.obsidian = ObsidianConfig {
            enabled: true,
            vault_path: "/vaults/main".into(),
            folder: "plans".into(),
        };

        let options = hook_options(&config);
        assert_eq!(options.server.obsidian, Some(config.obsidian.clone()));

        config.obsidian.enabled = false;
        assert!(hook_options(&config).server.obsidian.is_none());
    }

    #[test]
    fn broken_config_falls_back_to_defaults_for_reviews() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[obsidian\nenabled = ").unwrap();

        for command in [
            Commands::Hook,
            Commands::Vaults,
            Commands::Review {
                plan_file: "-".into(),
                summary: None,
            },
        ] {
            let config = resolve_config(&command, Config::load_from(&path)).unwrap();
            assert!(config.browser.open);
            assert!(!config.obsidian.enabled);
        }

        let settings = Commands::Settings(SettingsArgs::default());
        assert!(resolve_config(&settings, Config::load_from(&path)).is_err());
    }

    #[tokio::test]
    async fn plan_file_is_read_from_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plan.md");
        std::fs::write(&path, "# Plan\n").unwrap();

        assert_eq!(read_plan_file(&path).await.unwrap(), "# Plan\n");
        assert!(read_plan_file(&tmp.path().join("missing.md")).await.is_err());
    }
}
