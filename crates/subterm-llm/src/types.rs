use serde::{Deserialize, Serialize};
use serde_json::Value;

use subterm_core::ToolCall;

/// One entry in the tool catalog offered to the LLM on each `invoke` call.
/// Mirrors MCP tool descriptors, plus the two virtual tools the runtime
/// adds (`complete_task`, `request_human_approval`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

impl ToolDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// What the LLM port returns for one `invoke` call. `tool_calls` is empty
/// when the model produced only text and proposed no action; the runner
/// counts that against the no-action budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub text: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantResponse {
    #[must_use]
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tool_call(text: impl Into<String>, call: ToolCall) -> Self {
        Self {
            text: text.into(),
            tool_calls: vec![call],
        }
    }

    #[must_use]
    pub fn with_tool_calls(text: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            text: text.into(),
            tool_calls: calls,
        }
    }
}
