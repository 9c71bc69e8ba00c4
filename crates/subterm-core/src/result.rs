use serde::{Deserialize, Serialize};

/// Why a run stopped. Closed taxonomy; every terminal path in the runner
/// maps to exactly one of these, never a free-form string alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskReason {
    Completed,
    HumanRejected,
    MaxTurnsExceeded,
    LlmNoAction,
    LlmError,
    McpError,
    VerificationFailed,
}

/// Outcome of a single run. `success` is the LLM's claim verified against
/// page state; `verified` is false only when the run ended without ever
/// reaching a verification step (e.g. `max_turns_exceeded`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub success: bool,
    pub verified: bool,
    pub reason: TaskReason,
    pub turns: u32,
    pub final_url: Option<String>,
    pub error: Option<String>,
}

impl TaskResult {
    #[must_use]
    pub fn terminal(
        success: bool,
        verified: bool,
        reason: TaskReason,
        turns: u32,
        final_url: Option<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            success,
            verified,
            reason,
            turns,
            final_url,
            error,
        }
    }
}
