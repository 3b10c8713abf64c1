use std::path::PathBuf;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Plannotator.
///
/// Each stage of the review flow has its own variant so callers can tell a
/// fatal startup problem from a recoverable storage problem. Application
/// seams (`app`, `main`) continue to use `anyhow::Result` for context chains.
#[derive(Debug, Error)]
pub enum PlannotatorError {
    // ── Hook input ──────────────────────────────────────────────────────
    #[error("input: {0}")]
    Input(#[from] InputError),

    // ── Listener ────────────────────────────────────────────────────────
    #[error("bind: {0}")]
    Bind(#[from] BindError),

    // ── Vault storage ───────────────────────────────────────────────────
    #[error("vault: {0}")]
    Vault(#[from] VaultError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Input errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to parse hook event: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("no plan content in hook event")]
    MissingPlan,

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Bind errors ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BindError {
    #[error(
        "port {port} is already in use after {attempts} attempts{hint}",
        hint = remote_hint(.remote)
    )]
    AddressInUse {
        port: u16,
        attempts: u32,
        remote: bool,
    },

    #[error("failed to bind {addr}: {source}")]
    Io {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

// ─── Vault errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault path is empty")]
    EmptyVaultPath,

    #[error("could not resolve home directory for {0}")]
    HomeUnavailable(String),

    #[error("vault not found: {}", .0.display())]
    VaultNotFound(PathBuf),

    #[error("vault path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to create folder {}: {source}", .path.display())]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write note {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn remote_hint(remote: &bool) -> &'static str {
    if *remote {
        ". Another Plannotator session may be running; set PLANNOTATOR_PORT to use a different port"
    } else {
        ""
    }
}

pub type Result<T> = std::result::Result<T, PlannotatorError>;
