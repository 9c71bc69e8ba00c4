use std::time::Duration;

use async_trait::async_trait;

use subterm_checkpoint::{ApprovalPromptOutcome, AuthPromptOutcome, UserPromptPort};

/// Approves and completes everything immediately.
pub struct AutoApproveHandler;

#[async_trait]
impl UserPromptPort for AutoApproveHandler {
    async fn prompt_auth(&self, _kind: &str, _timeout: Duration) -> AuthPromptOutcome {
        AuthPromptOutcome::Completed
    }

    async fn prompt_approval(
        &self,
        _tool_name: &str,
        _description: &str,
        _screenshot_path: Option<&str>,
        _timeout: Duration,
    ) -> ApprovalPromptOutcome {
        ApprovalPromptOutcome::Approved
    }
}

/// Rejects and cancels everything immediately.
pub struct AutoDenyHandler;

#[async_trait]
impl UserPromptPort for AutoDenyHandler {
    async fn prompt_auth(&self, _kind: &str, _timeout: Duration) -> AuthPromptOutcome {
        AuthPromptOutcome::Cancelled
    }

    async fn prompt_approval(
        &self,
        _tool_name: &str,
        _description: &str,
        _screenshot_path: Option<&str>,
        _timeout: Duration,
    ) -> ApprovalPromptOutcome {
        ApprovalPromptOutcome::Rejected
    }
}

/// Sleeps for the exact timeout it's given before reporting a lapse,
/// simulating a human who never responds. Useful for exercising
/// timeout-as-rejection without relying on `CheckpointHandler` to enforce
/// a timeout the port itself is responsible for.
pub struct NoResponseHandler;

#[async_trait]
impl UserPromptPort for NoResponseHandler {
    async fn prompt_auth(&self, _kind: &str, timeout: Duration) -> AuthPromptOutcome {
        tokio::time::sleep(timeout).await;
        AuthPromptOutcome::Cancelled
    }

    async fn prompt_approval(
        &self,
        _tool_name: &str,
        _description: &str,
        _screenshot_path: Option<&str>,
        timeout: Duration,
    ) -> ApprovalPromptOutcome {
        tokio::time::sleep(timeout).await;
        ApprovalPromptOutcome::Rejected
    }
}
