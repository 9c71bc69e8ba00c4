use thiserror::Error;

/// Top-level error for everything that can go wrong *before* a run
/// produces a [`subterm_core::TaskResult`]; unknown service, bad config
/// file, or an MCP connection that never came up. Once a run's loop has
/// started, in-loop failures (an `McpError` mid-run, an `LlmError`, a
/// checkpoint rejection) become a populated `TaskResult` instead of an
/// `Err` here; see `TaskRunner::run`.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] subterm_config::ConfigError),

    #[error(transparent)]
    Mcp(#[from] subterm_mcp::McpError),

    #[error(transparent)]
    Llm(#[from] subterm_llm::LlmError),

    /// The caller's cancellation token was already cancelled before `run`
    /// reached `mcp.connect`.
    #[error("run cancelled before it could start")]
    Cancelled,
}

/// Result type for runtime-level operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
