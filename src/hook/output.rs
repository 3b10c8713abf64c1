use crate::gateway::Decision;
use serde::Serialize;

pub const HOOK_EVENT_NAME: &str = "PermissionRequest";
/// Used if a denial somehow reaches output without feedback.
pub const FALLBACK_DENY_MESSAGE: &str = "Plan changes requested";

/// The verdict document the agent reads from the hook's stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    pub hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: &'static str,
    pub decision: HookDecision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "behavior", rename_all = "lowercase")]
pub enum HookDecision {
    Allow,
    Deny { message: String },
}

impl From<&Decision> for HookOutput {
    fn from(decision: &Decision) -> Self {
        let decision = if decision.approved {
            HookDecision::Allow
        } else {
            HookDecision::Deny {
                message: decision
                    .feedback
                    .clone()
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| FALLBACK_DENY_MESSAGE.to_string()),
            }
        };
        Self {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: HOOK_EVENT_NAME,
                decision,
            },
        }
    }
}

impl HookOutput {
    /// Single JSON line, newline terminated.
    pub fn to_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Plain-text outcome for `plannotator review`, addressed to the planning agent.
pub fn review_message(decision: &Decision, summary: Option<&str>) -> String {
    if decision.approved {
        let mut message = String::from(
            "Plan approved! Switching to build mode.\n\n\
             Your plan has been approved by the user. You may now proceed with implementation.",
        );
        if let Some(summary) = summary.filter(|s| !s.trim().is_empty()) {
            message.push_str("\n\nPlan Summary: ");
            message.push_str(summary);
        }
        message
    } else {
        let feedback = decision.feedback.as_deref().unwrap_or(FALLBACK_DENY_MESSAGE);
        format!(
            "Plan needs revision.\n\n\
             The user has requested changes to your plan. Please review their feedback below \
             and revise your plan accordingly.\n\n\
             ## User Feedback\n\n\
             {feedback}\n\n\
             ---\n\n\
             Please revise your plan based on this feedback and submit it again when ready."
        )
    }
}
