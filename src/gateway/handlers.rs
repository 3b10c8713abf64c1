use crate::config::ObsidianConfig;
use crate::vault::{VaultTarget, detect_vaults_in, save_to_vault};
use axum::{
    body::Bytes,
    extract::State,
    response::{Html, IntoResponse, Json},
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::AppState;
use super::decision::Decision;

/// Body of `GET /plan`.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<&'static str>,
    /// Reviewer identity from the saved settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Saved vault destination, present only when Obsidian is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obsidian: Option<ObsidianDefaults>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObsidianDefaults {
    pub vault_path: String,
    pub folder: String,
}

impl From<&ObsidianConfig> for ObsidianDefaults {
    fn from(config: &ObsidianConfig) -> Self {
        Self {
            vault_path: config.vault_path.clone(),
            folder: config.folder.clone(),
        }
    }
}

/// Body of `GET /obsidian/vaults`.
#[derive(Debug, Serialize)]
pub struct VaultsResponse {
    pub vaults: Vec<String>,
}

/// Body of `POST /approve`.
#[derive(Debug, Default, Deserialize)]
pub struct ApproveBody {
    #[serde(default)]
    pub obsidian: Option<VaultTarget>,
}

/// Body of `POST /deny`.
#[derive(Debug, Default, Deserialize)]
pub struct DenyBody {
    #[serde(default)]
    pub feedback: Option<String>,
}

/// GET /plan: plan text; safe to call any number of times
pub(super) async fn handle_plan(State(state): State<AppState>) -> impl IntoResponse {
    Json(PlanResponse {
        plan: state.plan.to_string(),
        origin: state.origin,
        identity: state.identity.as_deref().map(str::to_string),
        obsidian: state.obsidian.as_deref().map(ObsidianDefaults::from),
    })
}

/// GET /obsidian/vaults: vaults known to the local Obsidian install
pub(super) async fn handle_vaults(State(state): State<AppState>) -> impl IntoResponse {
    let vaults = state
        .obsidian_config
        .as_deref()
        .map(|path| detect_vaults_in(path))
        .unwrap_or_default();
    Json(VaultsResponse { vaults })
}

/// POST /approve: approve, optionally archiving the plan to a vault first
///
/// A body without an `obsidian` target falls back to the saved vault settings.
pub(super) async fn handle_approve(
    State(state): State<AppState>,
    body: Bytes,
) -> impl IntoResponse {
    let Some(claim) = state.latch.claim() else {
        tracing::debug!("Decision already recorded, ignoring approve");
        return ack();
    };

    let body: ApproveBody = parse_lenient(&body);
    let target = body.obsidian.or_else(|| configured_target(&state));
    if let Some(target) = target.filter(VaultTarget::is_actionable) {
        // Storage problems are reported but never block approval.
        let result = save_to_vault(&target);
        if result.success {
            tracing::info!(
                path = result.path.as_deref().unwrap_or_default(),
                "Saved plan to Obsidian vault"
            );
        } else {
            tracing::warn!(
                error = result.error.as_deref().unwrap_or_default(),
                "Obsidian save failed"
            );
        }
    }

    claim.resolve(Decision::approve());
    tracing::info!("Plan approved");
    ack()
}

/// POST /deny: request changes, with optional feedback
pub(super) async fn handle_deny(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let Some(claim) = state.latch.claim() else {
        tracing::debug!("Decision already recorded, ignoring deny");
        return ack();
    };

    let body: DenyBody = parse_lenient(&body);
    claim.resolve(Decision::deny(body.feedback));
    tracing::info!("Plan changes requested");
    ack()
}

/// Fallback: the embedded UI for every other path, so client routing works
pub(super) async fn handle_index(State(state): State<AppState>) -> impl IntoResponse {
    Html(state.ui)
}

fn configured_target(state: &AppState) -> Option<VaultTarget> {
    state.obsidian.as_deref().map(|obsidian| VaultTarget {
        vault_path: obsidian.vault_path.clone(),
        folder: obsidian.folder.clone(),
        plan: state.plan.to_string(),
    })
}

fn ack() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true}))
}

// Missing or malformed bodies degrade to defaults rather than rejecting.
fn parse_lenient<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    if body.iter().all(u8::is_ascii_whitespace) {
        return T::default();
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!("Ignoring malformed decision body: {e}");
        T::default()
    })
}
