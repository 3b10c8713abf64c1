use std::collections::HashMap;

/// Explicit port override; wins over every other rule when valid.
pub const PORT_ENV: &str = "PLANNOTATOR_PORT";

/// Fixed port for SSH sessions so a `LocalForward` rule can be set up ahead of time.
pub const DEFAULT_REMOTE_PORT: u16 = 19432;

// SSH_TTY is set when SSH allocates a pseudo-terminal; SSH_CONNECTION carries
// "client_ip client_port server_ip server_port" for any SSH login.
const SSH_SIGNALS: [&str; 2] = ["SSH_TTY", "SSH_CONNECTION"];

/// Port chosen for the decision server plus the facts that led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSelection {
    /// 0 asks the OS for an ephemeral port.
    pub port: u16,
    pub is_remote: bool,
    /// Override value that was present but unusable; callers log it.
    pub ignored_override: Option<String>,
}

impl PortSelection {
    /// Decide from an explicit environment map. Pure: no logging, no lookups.
    pub fn from_env(env: &HashMap<String, String>) -> Self {
        let is_remote = SSH_SIGNALS
            .iter()
            .any(|key| env.get(*key).is_some_and(|value| !value.is_empty()));

        let mut ignored_override = None;
        if let Some(raw) = env.get(PORT_ENV).filter(|value| !value.is_empty()) {
            match parse_port(raw) {
                Some(port) => {
                    return Self {
                        port,
                        is_remote,
                        ignored_override: None,
                    };
                }
                None => ignored_override = Some(raw.clone()),
            }
        }

        Self {
            port: if is_remote { DEFAULT_REMOTE_PORT } else { 0 },
            is_remote,
            ignored_override,
        }
    }

    /// Decide from the current process environment, logging an unusable override.
    pub fn from_process_env() -> Self {
        let env: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        let selection = Self::from_env(&env);
        if let Some(raw) = &selection.ignored_override {
            tracing::warn!("Invalid {PORT_ENV} \"{raw}\", using default");
        }
        selection
    }
}

// Accepts 1..=65535; surrounding whitespace is tolerated.
fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|port| *port > 0)
}
