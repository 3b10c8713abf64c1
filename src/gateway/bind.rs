use crate::error::BindError;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

/// Attempts made before an occupied port is reported as fatal.
pub const BIND_ATTEMPTS: u32 = 5;
/// Pause between attempts on an occupied port.
pub const BIND_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for BindPolicy {
    fn default() -> Self {
        Self {
            attempts: BIND_ATTEMPTS,
            delay: BIND_RETRY_DELAY,
        }
    }
}

/// Bind `addr`, retrying only while the address is in use.
///
/// Any other failure is returned immediately. `remote` is carried into the
/// exhaustion error so its message can point at the port override.
pub async fn bind_with_retry(
    addr: SocketAddr,
    policy: BindPolicy,
    remote: bool,
) -> Result<TcpListener, BindError> {
    let attempts = policy.attempts.max(1);

    for attempt in 1..=attempts {
        match TcpListener::bind(addr).await {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                if attempt == attempts {
                    break;
                }
                tracing::warn!(
                    "Port {} in use, retrying in {}ms... ({attempt}/{attempts})",
                    addr.port(),
                    policy.delay.as_millis()
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(source) => {
                return Err(BindError::Io {
                    addr: addr.to_string(),
                    source,
                });
            }
        }
    }

    Err(BindError::AddressInUse {
        port: addr.port(),
        attempts,
        remote,
    })
}
