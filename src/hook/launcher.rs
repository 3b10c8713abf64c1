use anyhow::{Context, Result, bail};
use std::future::Future;
use std::pin::Pin;
use tokio::process::Command;

/// Opens the review UI for the reviewer.
///
/// The hook calls `open()` once, after the server is listening. Failures are
/// reported to the reviewer but never abort the session.
pub trait BrowserLauncher: Send + Sync {
    /// Human-readable launcher name (e.g. "system", "none")
    fn name(&self) -> &str;

    fn open<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Platform opener: `open` on macOS, `cmd /c start` on Windows, `xdg-open` elsewhere.
pub struct SystemBrowser;

impl SystemBrowser {
    fn command(url: &str) -> Command {
        let mut cmd = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/c", "start", ""]);
            cmd
        } else {
            Command::new("xdg-open")
        };
        cmd.arg(url)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        cmd
    }
}

impl BrowserLauncher for SystemBrowser {
    fn name(&self) -> &str {
        "system"
    }

    fn open<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let status = Self::command(url)
                .status()
                .await
                .context("failed to spawn browser opener")?;
            if !status.success() {
                bail!("browser opener exited with {status}");
            }
            Ok(())
        })
    }
}

/// Never opens anything; the reviewer follows the printed URL.
pub struct NoBrowser;

impl BrowserLauncher for NoBrowser {
    fn name(&self) -> &str {
        "none"
    }

    fn open<'a>(&'a self, _url: &'a str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move { Ok(()) })
    }
}
