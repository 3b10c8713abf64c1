//! Archive approved plans as tagged notes inside an Obsidian vault.
//!
//! Everything a note needs (tags, frontmatter, filename) is derived from the
//! plan text and the save time. Saving never overwrites an existing note and
//! never creates the vault root itself; only the target folder is created.

mod discovery;
pub mod note;
pub mod tags;

pub use discovery::{detect_vaults, detect_vaults_in, obsidian_config_path};
pub use note::{BACKLINK, frontmatter, note_content, note_filename, note_title};
pub use tags::{MAX_TAGS, extract_tags, plan_title};

use crate::config::DEFAULT_VAULT_FOLDER;
use crate::error::VaultError;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Where and what to save, as supplied by the UI on approval.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultTarget {
    #[serde(default)]
    pub vault_path: String,
    #[serde(default)]
    pub folder: String,
    #[serde(default, alias = "planText")]
    pub plan: String,
}

impl VaultTarget {
    /// Both the vault path and the plan carry content.
    pub fn is_actionable(&self) -> bool {
        !self.vault_path.trim().is_empty() && !self.plan.trim().is_empty()
    }

    fn folder_name(&self) -> &str {
        let folder = self.folder.trim();
        if folder.is_empty() {
            DEFAULT_VAULT_FOLDER
        } else {
            folder
        }
    }
}

/// Outcome of a vault save, reported but never fatal to approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultSaveResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<PathBuf, VaultError>> for VaultSaveResult {
    fn from(result: Result<PathBuf, VaultError>) -> Self {
        match result {
            Ok(path) => Self {
                success: true,
                path: Some(path.to_string_lossy().into_owned()),
                error: None,
            },
            Err(e) => Self {
                success: false,
                path: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Save `target.plan` into the vault, stamped with the current time.
pub fn save_to_vault(target: &VaultTarget) -> VaultSaveResult {
    let created = Utc::now();
    let local = created.with_timezone(&Local).naive_local();
    write_note(target, created, &local).into()
}

/// Write the note for `target` using explicit timestamps: `created` for the
/// frontmatter, `local` for the human-readable filename.
pub fn write_note(
    target: &VaultTarget,
    created: DateTime<Utc>,
    local: &NaiveDateTime,
) -> Result<PathBuf, VaultError> {
    let vault_root = resolve_vault_path(&target.vault_path)?;
    let folder = vault_root.join(target.folder_name());
    fs::create_dir_all(&folder).map_err(|source| VaultError::CreateFolder {
        path: folder.clone(),
        source,
    })?;

    let filename = note_filename(&note_title(&target.plan), local);
    let content = note_content(&target.plan, created);
    write_new_file(&folder, &filename, content.as_bytes())
}

/// Expand a leading `~` and require the result to be an existing directory.
pub fn resolve_vault_path(raw: &str) -> Result<PathBuf, VaultError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(VaultError::EmptyVaultPath);
    }

    let home = UserDirs::new().map(|u| u.home_dir().to_string_lossy().into_owned());
    if trimmed.starts_with('~') && home.is_none() {
        return Err(VaultError::HomeUnavailable(trimmed.to_string()));
    }
    let expanded = PathBuf::from(shellexpand::tilde_with_context(trimmed, || home).into_owned());

    match fs::metadata(&expanded) {
        Ok(meta) if meta.is_dir() => Ok(expanded),
        Ok(_) => Err(VaultError::NotADirectory(expanded)),
        Err(_) => Err(VaultError::VaultNotFound(expanded)),
    }
}

// Existing notes are kept; a numbered suffix picks the next free name.
fn write_new_file(folder: &Path, filename: &str, content: &[u8]) -> Result<PathBuf, VaultError> {
    let stem = filename.strip_suffix(".md").unwrap_or(filename);
    let mut attempt = 1u32;

    loop {
        let candidate = if attempt == 1 {
            folder.join(filename)
        } else {
            folder.join(format!("{stem} ({attempt}).md"))
        };

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                attempt += 1;
                continue;
            }
            Err(source) => {
                return Err(VaultError::Write {
                    path: candidate,
                    source,
                });
            }
        };

        let written = file.write_all(content).and_then(|()| file.flush());
        if let Err(source) = written {
            drop(file);
            let _ = fs::remove_file(&candidate);
            return Err(VaultError::Write {
                path: candidate,
                source,
            });
        }

        return Ok(candidate);
    }
}
