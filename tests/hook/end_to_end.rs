use plannotator::error::{InputError, PlannotatorError};
use plannotator::gateway::ServerOptions;
use plannotator::hook::{BrowserLauncher, HookOptions, run_hook, run_review};
use serde_json::{Value, json};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Plays the reviewer: when the hook "opens the browser", post a decision.
struct ScriptedReviewer {
    path: &'static str,
    body: Value,
}

impl BrowserLauncher for ScriptedReviewer {
    fn name(&self) -> &str {
        "scripted"
    }

    fn open<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        let target = format!("{url}{}", self.path);
        let body = self.body.clone();
        Box::pin(async move {
            tokio::spawn(async move {
                reqwest::Client::new()
                    .post(target)
                    .json(&body)
                    .send()
                    .await
                    .expect("decision request should reach the hook server");
            });
            Ok(())
        })
    }
}

fn options() -> HookOptions {
    HookOptions {
        server: ServerOptions {
            shutdown_grace: Duration::from_millis(20),
            obsidian_config: None,
            ..ServerOptions::default()
        },
        open_browser: true,
    }
}

fn event(plan: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "session_id": "s-1",
        "hook_event_name": "PermissionRequest",
        "tool_name": "ExitPlanMode",
        "tool_input": {"plan": plan}
    }))
    .unwrap()
}

#[tokio::test]
async fn deny_feedback_reaches_stdout() {
    let reviewer = ScriptedReviewer {
        path: "/api/deny",
        body: json!({"feedback": "needs tests"}),
    };
    let input = event("# Plan\n- do the thing");
    let mut stdout = Vec::new();

    let decision = run_hook(input.as_slice(), &mut stdout, options(), &reviewer)
        .await
        .unwrap();
    assert!(!decision.approved);

    let text = String::from_utf8(stdout).unwrap();
    assert_eq!(text.lines().count(), 1);
    let verdict: Value = serde_json::from_str(text.trim()).unwrap();
    assert_eq!(
        verdict["hookSpecificOutput"]["hookEventName"],
        "PermissionRequest"
    );
    assert_eq!(verdict["hookSpecificOutput"]["decision"]["behavior"], "deny");
    assert_eq!(
        verdict["hookSpecificOutput"]["decision"]["message"],
        "needs tests"
    );
}

#[tokio::test]
async fn approval_reports_allow() {
    let reviewer = ScriptedReviewer {
        path: "/api/approve",
        body: json!({}),
    };
    let input = event("# Plan\n- ship");
    let mut stdout = Vec::new();

    run_hook(input.as_slice(), &mut stdout, options(), &reviewer)
        .await
        .unwrap();

    let verdict: Value = serde_json::from_slice(&stdout).unwrap();
    assert_eq!(
        verdict,
        json!({
            "hookSpecificOutput": {
                "hookEventName": "PermissionRequest",
                "decision": {"behavior": "allow"}
            }
        })
    );
}

#[tokio::test]
async fn missing_plan_exits_without_output() {
    let reviewer = ScriptedReviewer {
        path: "/api/approve",
        body: json!({}),
    };
    let input = br#"{"tool_input":{"plan":""}}"#;
    let mut stdout = Vec::new();

    let err = run_hook(&input[..], &mut stdout, options(), &reviewer)
        .await
        .unwrap_err();

    assert!(matches!(err, PlannotatorError::Input(InputError::MissingPlan)));
    assert!(stdout.is_empty());
}

#[tokio::test]
async fn review_mode_prints_plain_text_outcome() {
    let reviewer = ScriptedReviewer {
        path: "/api/approve",
        body: json!({}),
    };
    let mut stdout = Vec::new();

    run_review(
        "# Plan\n- migrate".into(),
        Some("Moves auth to OAuth."),
        &mut stdout,
        options(),
        &reviewer,
    )
    .await
    .unwrap();

    let text = String::from_utf8(stdout).unwrap();
    assert!(text.starts_with("Plan approved! Switching to build mode."));
    assert!(text.contains("Plan Summary: Moves auth to OAuth."));
}
