//! Single-shot loopback HTTP server that mediates one plan decision.
//!
//! Lifecycle: bind (retrying while the port is busy), serve the plan and the
//! embedded UI, latch the first approve/deny, wait a short grace period so
//! the browser sees its response, then stop. A stopped server is consumed
//! and cannot be restarted.
//!
//! Routes (also mounted under `/api`, which is what the bundled UI calls):
//! - `GET  /plan`            → `{plan}`
//! - `GET  /obsidian/vaults` → `{vaults}`
//! - `POST /approve`         → `{ok: true}`
//! - `POST /deny`            → `{ok: true}`
//! - anything else           → embedded UI document

mod bind;
pub mod decision;
mod handlers;
pub mod port;

pub use bind::{BIND_ATTEMPTS, BIND_RETRY_DELAY, BindPolicy, bind_with_retry};
pub use decision::{DEFAULT_DENY_FEEDBACK, Decision, DecisionClaim, DecisionLatch};
pub use handlers::{ApproveBody, DenyBody, ObsidianDefaults, PlanResponse, VaultsResponse};
pub use port::{DEFAULT_REMOTE_PORT, PORT_ENV, PortSelection};

use crate::config::{ObsidianConfig, Settings};
use crate::error::BindError;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use handlers::{handle_approve, handle_deny, handle_index, handle_plan, handle_vaults};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (5 MiB): approve bodies carry the full plan
pub const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;
/// Request timeout (30s)
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Delay between a decision and teardown, so the UI can finish handling its response.
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(1500);
/// Upper bound on waiting for open connections to drain during stop.
const STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// The bundled review UI.
pub const UI_DOCUMENT: &str = include_str!("../../assets/index.html");

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub plan: Arc<str>,
    /// Reported to the UI so it can adapt copy per host tool.
    pub origin: Option<&'static str>,
    pub latch: Arc<DecisionLatch>,
    /// Obsidian's `obsidian.json`; `None` disables vault discovery.
    pub obsidian_config: Option<Arc<PathBuf>>,
    /// Saved vault destination used when an approval names none.
    pub obsidian: Option<Arc<ObsidianConfig>>,
    pub identity: Option<Arc<str>>,
    pub ui: &'static str,
}

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub host: IpAddr,
    pub port: u16,
    pub remote: bool,
    pub bind: BindPolicy,
    pub shutdown_grace: Duration,
    pub origin: Option<&'static str>,
    pub obsidian_config: Option<PathBuf>,
    /// Only set when the saved Obsidian settings are complete.
    pub obsidian: Option<ObsidianConfig>,
    pub identity: Option<String>,
}

impl ServerOptions {
    pub fn from_selection(selection: &PortSelection) -> Self {
        Self {
            port: selection.port,
            remote: selection.is_remote,
            ..Self::default()
        }
    }
}

impl ServerOptions {
    /// Carry the reviewer's saved vault destination and identity into the session.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.obsidian = settings
            .is_obsidian_configured()
            .then(|| settings.obsidian().clone());
        self.identity = settings.identity().map(str::to_string);
        self
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            remote: false,
            bind: BindPolicy::default(),
            shutdown_grace: SHUTDOWN_GRACE,
            origin: None,
            obsidian_config: crate::vault::obsidian_config_path(),
            obsidian: None,
            identity: None,
        }
    }
}

/// Facts about the bound listener; fixed for the life of the server.
#[derive(Debug, Clone)]
pub struct ServerSession {
    pub port: u16,
    pub bound_at: DateTime<Utc>,
    pub plan: Arc<str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerPhase {
    AwaitingDecision,
    Resolved,
    Stopped,
}

/// Build the router for one review session.
pub fn build_app(state: AppState) -> Router {
    let api = Router::new()
        .route("/plan", get(handle_plan).fallback(handle_index))
        .route("/obsidian/vaults", get(handle_vaults).fallback(handle_index))
        .route("/approve", post(handle_approve).fallback(handle_index))
        .route("/deny", post(handle_deny).fallback(handle_index));

    Router::new()
        .nest("/api", api.clone())
        .merge(api)
        .fallback(handle_index)
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// A running decision server. Consumed by [`DecisionServer::stop`].
pub struct DecisionServer {
    session: ServerSession,
    latch: Arc<DecisionLatch>,
    shutdown: CancellationToken,
    handle: JoinHandle<std::io::Result<()>>,
    grace: Duration,
}

impl DecisionServer {
    /// Bind according to `options` and start serving `plan` immediately.
    pub async fn start(plan: impl Into<String>, options: ServerOptions) -> Result<Self, BindError> {
        let addr = SocketAddr::new(options.host, options.port);
        let listener = bind_with_retry(addr, options.bind, options.remote).await?;
        let port = listener
            .local_addr()
            .map_err(|source| BindError::Io {
                addr: addr.to_string(),
                source,
            })?
            .port();

        let plan: Arc<str> = Arc::from(plan.into());
        let latch = Arc::new(DecisionLatch::new());
        let state = AppState {
            plan: Arc::clone(&plan),
            origin: options.origin,
            latch: Arc::clone(&latch),
            obsidian_config: options.obsidian_config.map(Arc::new),
            obsidian: options.obsidian.map(Arc::new),
            identity: options.identity.map(Arc::from),
            ui: UI_DOCUMENT,
        };

        let shutdown = CancellationToken::new();
        let app = build_app(state);
        let handle = tokio::spawn(
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.clone().cancelled_owned())
                .into_future(),
        );

        let session = ServerSession {
            port,
            bound_at: Utc::now(),
            plan,
        };
        tracing::info!("Plannotator server running on {}", local_url(port));

        Ok(Self {
            session,
            latch,
            shutdown,
            handle,
            grace: options.shutdown_grace,
        })
    }

    pub fn port(&self) -> u16 {
        self.session.port
    }

    pub fn url(&self) -> String {
        local_url(self.session.port)
    }

    pub fn session(&self) -> &ServerSession {
        &self.session
    }

    pub fn phase(&self) -> ServerPhase {
        if self.handle.is_finished() {
            ServerPhase::Stopped
        } else if self.latch.get().is_some() {
            ServerPhase::Resolved
        } else {
            ServerPhase::AwaitingDecision
        }
    }

    /// Suspend until the reviewer decides. There is no timeout.
    pub async fn wait_for_decision(&self) -> Decision {
        self.latch.wait().await
    }

    /// Wait for the decision, hold the socket open for the grace period, then stop.
    pub async fn finish(self) -> Decision {
        let decision = self.wait_for_decision().await;
        tokio::time::sleep(self.grace).await;
        self.stop().await;
        decision
    }

    /// Stop accepting requests and release the port.
    pub async fn stop(self) {
        let Self {
            shutdown,
            mut handle,
            ..
        } = self;
        shutdown.cancel();

        match tokio::time::timeout(STOP_TIMEOUT, &mut handle).await {
            Ok(Ok(Ok(()))) => tracing::debug!("Plannotator server stopped"),
            Ok(Ok(Err(e))) => tracing::warn!("Plannotator server error: {e}"),
            Ok(Err(e)) => tracing::warn!("Plannotator server task failed: {e}"),
            Err(_) => {
                tracing::debug!("Open connections did not drain, aborting server task");
                handle.abort();
            }
        }
    }
}

pub fn local_url(port: u16) -> String {
    format!("http://localhost:{port}")
}
