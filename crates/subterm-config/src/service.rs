use std::fmt;
use std::sync::Arc;

use subterm_core::{NormalizedSnapshot, ToolCall};

/// Fires before a tool call executes, given the proposed call and current
/// page state. `true` means "stop and ask a human before running this."
pub type CheckpointPredicate = Arc<dyn Fn(&ToolCall, &NormalizedSnapshot) -> bool + Send + Sync>;

/// Fires on every snapshot. `Some(kind)` names the auth edge case detected
/// (e.g. `"login"`, `"mfa"`, `"captcha"`); `None` means nothing to intercept.
pub type AuthDetector = Arc<dyn Fn(&NormalizedSnapshot) -> Option<String> + Send + Sync>;

/// Evaluated against the page reached after `complete_task` is called, to
/// independently verify the LLM's claim instead of trusting it outright.
pub type SnapshotPredicate = Arc<dyn Fn(&NormalizedSnapshot) -> bool + Send + Sync>;

/// Everything the runner needs to drive one cancellation flow for one
/// service: where to start, what to tell the LLM, when to stop for a human,
/// and how to tell a genuine success from the LLM declaring victory early.
#[derive(Clone)]
pub struct ServiceConfig {
    pub name: String,
    pub initial_url: String,
    pub goal_template: String,
    pub system_prompt_addition: String,
    pub checkpoint_conditions: Vec<CheckpointPredicate>,
    pub auth_edge_case_detectors: Vec<AuthDetector>,
    pub success_indicators: Vec<SnapshotPredicate>,
    pub failure_indicators: Vec<SnapshotPredicate>,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("name", &self.name)
            .field("initial_url", &self.initial_url)
            .field("checkpoint_conditions", &self.checkpoint_conditions.len())
            .field("auth_edge_case_detectors", &self.auth_edge_case_detectors.len())
            .field("success_indicators", &self.success_indicators.len())
            .field("failure_indicators", &self.failure_indicators.len())
            .finish()
    }
}

impl ServiceConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, initial_url: impl Into<String>, goal_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial_url: initial_url.into(),
            goal_template: goal_template.into(),
            system_prompt_addition: String::new(),
            checkpoint_conditions: Vec::new(),
            auth_edge_case_detectors: Vec::new(),
            success_indicators: Vec::new(),
            failure_indicators: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_system_prompt_addition(mut self, text: impl Into<String>) -> Self {
        self.system_prompt_addition = text.into();
        self
    }

    #[must_use]
    pub fn with_checkpoint_condition(mut self, predicate: CheckpointPredicate) -> Self {
        self.checkpoint_conditions.push(predicate);
        self
    }

    #[must_use]
    pub fn with_auth_edge_case_detector(mut self, detector: AuthDetector) -> Self {
        self.auth_edge_case_detectors.push(detector);
        self
    }

    #[must_use]
    pub fn with_success_indicator(mut self, predicate: SnapshotPredicate) -> Self {
        self.success_indicators.push(predicate);
        self
    }

    #[must_use]
    pub fn with_failure_indicator(mut self, predicate: SnapshotPredicate) -> Self {
        self.failure_indicators.push(predicate);
        self
    }
}
