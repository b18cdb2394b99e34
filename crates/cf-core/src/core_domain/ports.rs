use crate::core::{BackendError, BackendId, ModelParams, SweepCost};

// ---------------------------------------------------------------------------
// CompletionBackend — "send prompt text, receive completion text"
// ---------------------------------------------------------------------------

/// A model-calling service. The gateway treats every provider uniformly
/// through this seam; new backends are added by implementing it, never by
/// branching at call sites. Calls are synchronous and blocking: the sweep
/// is deliberately serialized (one in-flight request at a time) to respect
/// provider rate limits.
pub trait CompletionBackend: Send + Sync {
    fn id(&self) -> BackendId;

    fn complete(&self, prompt: &str, params: &ModelParams) -> Result<String, BackendError>;
}

// ---------------------------------------------------------------------------
// ConfirmSweep — injectable cost-confirmation capability
// ---------------------------------------------------------------------------

/// Decides whether a sweep may proceed given its computed call counts. The
/// interactive runner asks the operator; tests inject a constant answer.
pub trait ConfirmSweep {
    fn confirm(&self, cost: &SweepCost) -> bool;
}

/// Accepts every sweep unconditionally.
pub struct AlwaysConfirm;

impl ConfirmSweep for AlwaysConfirm {
    fn confirm(&self, _cost: &SweepCost) -> bool {
        true
    }
}
