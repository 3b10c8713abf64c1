use crate::config::Settings;

pub fn render_settings(settings: &Settings) -> String {
    let config = settings.config();
    let obsidian = settings.obsidian();

    let vault = if obsidian.vault_path.is_empty() {
        "(not set)"
    } else {
        obsidian.vault_path.as_str()
    };
    let state = match (obsidian.enabled, settings.is_obsidian_configured()) {
        (true, true) => "enabled",
        (true, false) => "enabled (no vault path)",
        (false, _) => "disabled",
    };

    [
        "◆ Plannotator settings".to_string(),
        String::new(),
        format!("  Version     {}", env!("CARGO_PKG_VERSION")),
        format!("  Config      {}", config.config_path.display()),
        format!("  Identity    {}", settings.identity().unwrap_or("(none)")),
        format!(
            "  Browser     {}",
            if config.browser.open { "auto-open" } else { "print URL only" }
        ),
        String::new(),
        format!("  Obsidian    {state}"),
        format!("    Vault     {vault}"),
        format!("    Folder    {}", obsidian.folder),
    ]
    .join("\n")
}
