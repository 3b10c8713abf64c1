use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// `Plannotator` - interactive plan review for coding agents.
#[derive(Parser, Debug)]
#[command(name = "plannotator")]
#[command(version)]
#[command(
    about = "Review, annotate, approve or reject an agent's plan in the browser.",
    long_about = None
)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `hook` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the PermissionRequest hook (reads the event from stdin)
    Hook,

    /// Review a plan file and print a plain-text outcome
    Review {
        /// Markdown plan to review, or `-` for stdin
        #[arg(long, value_name = "PATH")]
        plan_file: PathBuf,

        /// One or two sentence summary echoed back on approval
        #[arg(long)]
        summary: Option<String>,
    },

    /// List Obsidian vaults found on this machine
    Vaults,

    /// Show or change saved settings
    Settings(SettingsArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsArgs {
    /// Save approved plans to Obsidian
    #[arg(long, conflicts_with = "obsidian_disable")]
    pub obsidian_enable: bool,

    /// Stop saving approved plans to Obsidian
    #[arg(long)]
    pub obsidian_disable: bool,

    /// Vault directory (supports `~`)
    #[arg(long, value_name = "PATH")]
    pub vault: Option<String>,

    /// Folder inside the vault for saved plans
    #[arg(long, value_name = "NAME")]
    pub folder: Option<String>,

    /// Pick a new reviewer identity
    #[arg(long)]
    pub regenerate_identity: bool,
}

impl SettingsArgs {
    pub fn is_mutation(&self) -> bool {
        self.obsidian_enable
            || self.obsidian_disable
            || self.vault.is_some()
            || self.folder.is_some()
            || self.regenerate_identity
    }
}
