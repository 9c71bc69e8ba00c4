use std::time::Duration;

use async_trait::async_trait;

/// Result of waiting on a human to finish an intercepted auth step
/// (login, MFA, CAPTCHA).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPromptOutcome {
    Completed,
    Cancelled,
}

/// Result of asking a human to approve a gated tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalPromptOutcome {
    Approved,
    Rejected,
}

/// The frontend-facing surface a human-in-the-loop UI implements: the two
/// ways a run can stop and wait on a person. Both methods must respect
/// `timeout` themselves; a caller blocking forever past the requested
/// timeout is a port bug, not something [`crate::CheckpointHandler`] can
/// detect.
#[async_trait]
pub trait UserPromptPort: Send + Sync {
    /// Blocks until a human finishes (or cancels) the named auth edge case,
    /// or `timeout` elapses.
    async fn prompt_auth(&self, kind: &str, timeout: Duration) -> AuthPromptOutcome;

    /// Blocks until a human approves or rejects the described action, or
    /// `timeout` elapses. `screenshot_path` is provided when the current
    /// snapshot has one, for the frontend to show alongside the prompt.
    async fn prompt_approval(
        &self,
        tool_name: &str,
        description: &str,
        screenshot_path: Option<&str>,
        timeout: Duration,
    ) -> ApprovalPromptOutcome;
}
