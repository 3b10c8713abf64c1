use crate::error::InputError;
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncReadExt};

/// The `PermissionRequest` event the agent writes to the hook's stdin.
///
/// Only `tool_input.plan` is required; everything else is informational.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookEvent {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub hook_event_name: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_input: Option<ToolInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub plan: Option<String>,
}

impl HookEvent {
    pub fn from_json(raw: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The plan text, treating an empty string the same as a missing one.
    pub fn plan(&self) -> Option<&str> {
        self.tool_input
            .as_ref()
            .and_then(|input| input.plan.as_deref())
            .filter(|plan| !plan.is_empty())
    }

    /// Consume the event, yielding the plan or [`InputError::MissingPlan`].
    pub fn into_plan(self) -> Result<String, InputError> {
        self.tool_input
            .and_then(|input| input.plan)
            .filter(|plan| !plan.is_empty())
            .ok_or(InputError::MissingPlan)
    }
}

/// Read the whole event from `reader` and extract its plan.
pub async fn read_plan<R>(mut reader: R) -> Result<String, InputError>
where
    R: AsyncRead + Unpin,
{
    let mut raw = String::new();
    reader.read_to_string(&mut raw).await?;

    let event = HookEvent::from_json(&raw)?;
    tracing::debug!(
        session = event.session_id.as_deref().unwrap_or("-"),
        event = event.hook_event_name.as_deref().unwrap_or("-"),
        tool = event.tool_name.as_deref().unwrap_or("-"),
        "Received hook event"
    );
    event.into_plan()
}
