//! The hook process: read the agent's event, run one review session, report
//! the verdict.
//!
//! Standard output carries nothing but the verdict line. Everything meant
//! for the human (listening URL, SSH forwarding help) goes to standard
//! error.

pub mod event;
pub mod launcher;
pub mod output;

pub use event::{HookEvent, ToolInput, read_plan};
pub use launcher::{BrowserLauncher, NoBrowser, SystemBrowser};
pub use output::{HookDecision, HookOutput, review_message};

use crate::error::{InputError, PlannotatorError};
use crate::gateway::{Decision, DecisionServer, ServerOptions};
use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Origin reported to the UI for `plannotator review` sessions.
pub const REVIEW_ORIGIN: &str = "opencode";

#[derive(Debug, Clone)]
pub struct HookOptions {
    pub server: ServerOptions,
    /// When false the URL is printed and no opener is run.
    pub open_browser: bool,
}

impl HookOptions {
    pub fn new(server: ServerOptions) -> Self {
        Self {
            server,
            open_browser: true,
        }
    }
}

/// Run the `PermissionRequest` hook end to end.
///
/// Input problems are reported before any port is bound. On success exactly
/// one JSON line is written to `output`.
pub async fn run_hook<R, W>(
    input: R,
    mut output: W,
    options: HookOptions,
    launcher: &dyn BrowserLauncher,
) -> Result<Decision, PlannotatorError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let plan = read_plan(input).await?;
    let decision = review(plan, options, launcher).await?;

    let line = HookOutput::from(&decision)
        .to_line()
        .context("failed to encode hook output")?;
    output
        .write_all(line.as_bytes())
        .await
        .context("failed to write hook output")?;
    output.flush().await.context("failed to flush hook output")?;

    Ok(decision)
}

/// Run a review session for an agent that takes a plain-text reply.
pub async fn run_review<W>(
    plan: String,
    summary: Option<&str>,
    mut output: W,
    mut options: HookOptions,
    launcher: &dyn BrowserLauncher,
) -> Result<Decision, PlannotatorError>
where
    W: AsyncWrite + Unpin,
{
    if plan.trim().is_empty() {
        return Err(InputError::MissingPlan.into());
    }
    options.server.origin = Some(REVIEW_ORIGIN);
    let decision = review(plan, options, launcher).await?;

    let mut message = review_message(&decision, summary);
    message.push('\n');
    output
        .write_all(message.as_bytes())
        .await
        .context("failed to write review outcome")?;
    output.flush().await.context("failed to flush review outcome")?;

    Ok(decision)
}

async fn review(
    plan: String,
    options: HookOptions,
    launcher: &dyn BrowserLauncher,
) -> Result<Decision, PlannotatorError> {
    let remote = options.server.remote;
    let server = DecisionServer::start(plan, options.server).await?;
    let url = server.url();

    if remote {
        eprintln!("{}", ssh_instructions(server.port()));
    } else if options.open_browser {
        if let Err(e) = launcher.open(&url).await {
            tracing::debug!(launcher = launcher.name(), "Browser launch failed: {e:#}");
            eprintln!("Open browser manually: {url}");
        }
    } else {
        eprintln!("Open {url} in your browser to review the plan");
    }

    let decision = server.finish().await;
    tracing::debug!(approved = decision.approved, "Review session finished");
    Ok(decision)
}

/// Port-forwarding help for sessions running over SSH.
pub fn ssh_instructions(port: u16) -> String {
    format!(
        "\n[SSH Remote Session Detected]\n\
         Add this to your local ~/.ssh/config to access Plannotator:\n\n  \
         Host your-server-alias\n    \
         LocalForward {port} localhost:{port}\n\n\
         Then open {url} in your local browser.\n",
        url = crate::gateway::local_url(port)
    )
}
