mod dispatch;
mod execution;
mod support;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use subterm_checkpoint::CheckpointHandler;
use subterm_config::ServiceRegistry;
use subterm_core::TaskResult;
use subterm_llm::LlmClient;
use subterm_mcp::McpClient;

use crate::config::RuntimeConfig;
use crate::error::{RuntimeError, RuntimeResult};

/// Per-call overrides to the runner's defaults. `cancel` lets a caller signal
/// external cancellation at the three suspension points inside the loop
/// (LLM invoke, MCP call_tool, user-prompt wait).
#[derive(Default)]
pub struct RunOptions {
    pub max_turns: Option<u32>,
    pub model: Option<String>,
    pub cancel: Option<CancellationToken>,
}

/// Drives one cancellation flow end to end: connects to the MCP server,
/// runs the turn-based loop against the LLM port until a terminal
/// condition is reached, and disconnects on every exit path.
///
/// Generic over both ports, mirroring a runtime generic over its model
/// provider rather than boxing it up front; callers who only ever use one
/// concrete `McpClient`/`LlmClient` pair pay no dynamic dispatch cost.
pub struct TaskRunner<M: McpClient, L: LlmClient> {
    mcp: M,
    llm: L,
    checkpoint: CheckpointHandler,
    registry: ServiceRegistry,
    config: RuntimeConfig,
}

impl<M: McpClient, L: LlmClient> TaskRunner<M, L> {
    #[must_use]
    pub fn new(
        mcp: M,
        llm: L,
        checkpoint: CheckpointHandler,
        registry: ServiceRegistry,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            mcp,
            llm,
            checkpoint,
            registry,
            config,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Runs `service_name` to a terminal [`TaskResult`].
    ///
    /// Returns `Err` only for failures that precede the loop starting
    /// (unknown service, MCP connect failure); once the loop is running,
    /// every terminal condition (checkpoint rejection, `max_turns`
    /// exhausted, an MCP or LLM error, cancellation) is reported as an
    /// `Ok(TaskResult)` with a populated `reason`, per the closed
    /// `TaskReason` taxonomy.
    #[instrument(skip(self, opts), fields(service = %service_name))]
    pub async fn run(&self, service_name: &str, opts: RunOptions) -> RuntimeResult<TaskResult> {
        let service = self.registry.get(service_name)?;
        let max_turns = opts.max_turns.unwrap_or(self.config.max_turns);
        let model = self.config.resolve_model(opts.model.as_deref());

        if opts.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(RuntimeError::Cancelled);
        }

        if let Err(e) = self.mcp.connect().await {
            let _ = self.mcp.close().await;
            return Err(RuntimeError::from(e));
        }
        info!(url = %service.initial_url, "connected to MCP server");

        let outcome = execution::run_loop(
            &self.llm,
            &self.mcp,
            &self.checkpoint,
            &service,
            &self.config,
            &model,
            opts.cancel.as_ref(),
            max_turns,
        )
        .await;

        let close_result = self.mcp.close().await;
        let result = outcome?;
        close_result?;
        Ok(result)
    }
}
