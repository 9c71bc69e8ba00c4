use std::sync::Arc;
use std::time::Duration;

use subterm_config::ServiceConfig;
use subterm_core::{NormalizedSnapshot, ToolCall};

use crate::prompt_port::{ApprovalPromptOutcome, AuthPromptOutcome, UserPromptPort};

/// Evaluates a service's auth-edge-case detectors and checkpoint
/// predicates, and drives the two human-in-the-loop gates those decisions
/// lead to. Holds no state of its own beyond the port and the two
/// timeouts; no allowance store, no deferred-resolution queue, since a run
/// never persists across process restarts.
pub struct CheckpointHandler {
    port: Arc<dyn UserPromptPort>,
    auth_timeout: Duration,
    approval_timeout: Duration,
}

impl CheckpointHandler {
    #[must_use]
    pub fn new(port: Arc<dyn UserPromptPort>, auth_timeout: Duration, approval_timeout: Duration) -> Self {
        Self {
            port,
            auth_timeout,
            approval_timeout,
        }
    }

    /// Runs `service`'s auth-edge-case detectors against `snapshot` in
    /// registration order, returning the first match's kind.
    #[must_use]
    pub fn detect_auth_edge_case(snapshot: &NormalizedSnapshot, service: &ServiceConfig) -> Option<String> {
        service
            .auth_edge_case_detectors
            .iter()
            .find_map(|detector| detector(snapshot))
    }

    /// Runs `service`'s checkpoint predicates against the proposed `call`
    /// and current `snapshot`. `true` means a human must approve before it
    /// executes.
    #[must_use]
    pub fn should_checkpoint(call: &ToolCall, snapshot: &NormalizedSnapshot, service: &ServiceConfig) -> bool {
        service
            .checkpoint_conditions
            .iter()
            .any(|predicate| predicate(call, snapshot))
    }

    /// Waits for a human to finish an intercepted `kind` auth step. A
    /// timeout is treated as a rejection (`false`); the handler never
    /// retries.
    pub async fn wait_for_auth_completion(&self, kind: &str) -> bool {
        matches!(
            self.port.prompt_auth(kind, self.auth_timeout).await,
            AuthPromptOutcome::Completed
        )
    }

    /// Asks a human to approve `tool_name` (human-readable `description`,
    /// optional screenshot). A timeout is treated as a rejection.
    pub async fn request_approval(
        &self,
        tool_name: &str,
        description: &str,
        screenshot_path: Option<&str>,
    ) -> bool {
        matches!(
            self.port
                .prompt_approval(tool_name, description, screenshot_path, self.approval_timeout)
                .await,
            ApprovalPromptOutcome::Approved
        )
    }
}
