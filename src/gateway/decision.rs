use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Feedback used when a denial carries no usable message.
pub const DEFAULT_DENY_FEEDBACK: &str = "Plan rejected by user";

/// The reviewer's verdict on a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl Decision {
    pub fn approve() -> Self {
        Self {
            approved: true,
            feedback: None,
        }
    }

    /// Denial with `feedback`, substituting the default when it is absent or empty.
    pub fn deny(feedback: Option<String>) -> Self {
        let feedback = feedback
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| DEFAULT_DENY_FEEDBACK.to_string());
        Self {
            approved: false,
            feedback: Some(feedback),
        }
    }
}

/// Resolve-once cell for the session's [`Decision`].
///
/// A request handler must first win [`DecisionLatch::claim`] (a
/// compare-and-set) before it may run side effects and publish a decision.
/// Losers observe the already claimed latch and do nothing, so at most one
/// decision is ever published no matter how requests interleave.
#[derive(Debug)]
pub struct DecisionLatch {
    claimed: AtomicBool,
    tx: watch::Sender<Option<Decision>>,
}

impl DecisionLatch {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            claimed: AtomicBool::new(false),
            tx,
        }
    }

    /// Take the exclusive right to resolve. `None` if another caller already has it.
    pub fn claim(&self) -> Option<DecisionClaim<'_>> {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| DecisionClaim {
                latch: self,
                resolved: false,
            })
    }

    /// Claim and resolve in one step. Returns `false` if the latch was taken.
    pub fn resolve(&self, decision: Decision) -> bool {
        match self.claim() {
            Some(claim) => {
                claim.resolve(decision);
                true
            }
            None => false,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    /// The published decision, if any.
    pub fn get(&self) -> Option<Decision> {
        self.tx.borrow().clone()
    }

    /// Suspend until a decision is published; every waiter sees the same value.
    pub async fn wait(&self) -> Decision {
        let mut rx = self.tx.subscribe();
        loop {
            if let Some(decision) = rx.borrow_and_update().clone() {
                return decision;
            }
            // The sender lives in `self`, so the channel cannot close while we wait.
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for DecisionLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive right to publish the decision, held by the winning request.
///
/// Dropping an unresolved claim releases the latch again so a failed handler
/// cannot leave the session stuck.
#[derive(Debug)]
pub struct DecisionClaim<'a> {
    latch: &'a DecisionLatch,
    resolved: bool,
}

impl DecisionClaim<'_> {
    pub fn resolve(mut self, decision: Decision) {
        self.latch.tx.send_replace(Some(decision));
        self.resolved = true;
    }
}

impl Drop for DecisionClaim<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            self.latch.claimed.store(false, Ordering::Release);
        }
    }
}
