use plannotator::config::ObsidianConfig;
use plannotator::gateway::{DecisionServer, ServerOptions};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const PLAN: &str = "# Implementation Plan: Auth Migration\n\n```typescript\nconst x = 1;\n```\n";

fn notes_in(folder: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(folder)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

async fn start_server() -> DecisionServer {
    DecisionServer::start(
        PLAN,
        ServerOptions {
            shutdown_grace: Duration::from_millis(20),
            obsidian_config: None,
            ..ServerOptions::default()
        },
    )
    .await
    .expect("ephemeral decision server should bind")
}

#[tokio::test]
async fn approval_archives_the_plan_once() {
    let vault = TempDir::new().unwrap();
    let server = start_server().await;
    let client = reqwest::Client::new();
    let body = json!({
        "obsidian": {
            "vaultPath": vault.path().to_string_lossy(),
            "folder": "plans",
            "plan": PLAN,
        }
    });

    for _ in 0..2 {
        let response = client
            .post(format!("{}/api/approve", server.url()))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }
    assert!(server.finish().await.approved);

    let notes = notes_in(&vault.path().join("plans"));
    assert_eq!(notes.len(), 1, "{notes:?}");
    assert!(notes[0].starts_with("Auth Migration - "));
    assert!(
        Path::new(&notes[0])
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
    );

    let content = std::fs::read_to_string(vault.path().join("plans").join(&notes[0])).unwrap();
    assert!(content.starts_with("---\ncreated: "));
    assert!(content.contains("source: plannotator"));
    assert!(content.contains("typescript"));
    assert!(content.contains("[[Plannotator Plans]]"));
    assert!(content.ends_with(PLAN));
}

#[tokio::test]
async fn missing_vault_does_not_block_approval() {
    let parent = TempDir::new().unwrap();
    let missing = parent.path().join("no-such-vault");
    let server = start_server().await;

    let response = reqwest::Client::new()
        .post(format!("{}/approve", server.url()))
        .json(&json!({
            "obsidian": {"vaultPath": missing.to_string_lossy(), "folder": "plans", "plan": PLAN}
        }))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(server.finish().await.approved);
    assert!(!missing.exists());
}

#[tokio::test]
async fn saved_settings_archive_an_empty_approval() {
    let vault = TempDir::new().unwrap();
    let server = DecisionServer::start(
        PLAN,
        ServerOptions {
            shutdown_grace: Duration::from_millis(20),
            obsidian_config: None,
            obsidian: Some(ObsidianConfig {
                enabled: true,
                vault_path: vault.path().to_string_lossy().into_owned(),
                folder: "plans".into(),
            }),
            ..ServerOptions::default()
        },
    )
    .await
    .expect("ephemeral decision server should bind");

    let plan: serde_json::Value = reqwest::get(format!("{}/api/plan", server.url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(plan["obsidian"]["folder"], "plans");

    let response = reqwest::Client::new()
        .post(format!("{}/api/approve", server.url()))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert!(server.finish().await.approved);

    let notes = notes_in(&vault.path().join("plans"));
    assert_eq!(notes.len(), 1, "{notes:?}");
    assert!(notes[0].starts_with("Auth Migration - "));
}
