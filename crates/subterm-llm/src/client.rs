use async_trait::async_trait;

use subterm_core::Message;

use crate::error::LlmResult;
use crate::types::{AssistantResponse, ToolDefinition};

/// The port the runner drives the model through. Deliberately
/// request/response rather than streaming; the runner needs a complete
/// tool call before it can check it against a checkpoint, so there's
/// nothing for incremental delivery to buy here.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Given the conversation so far and the current tool catalog, returns
    /// the model's next turn. `model` overrides whatever default the
    /// implementation would otherwise use.
    async fn invoke(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        model: Option<&str>,
    ) -> LlmResult<AssistantResponse>;
}
