use thiserror::Error;

/// Errors from the LLM client port. All are treated uniformly by the
/// runner: any `Err` here ends the run with `TaskReason::LlmError`. Retry
/// policy for transient causes (`RateLimited`, `Transport`) belongs to the
/// concrete adapter, not this port.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("LLM proposed an invalid tool call: {0}")]
    InvalidToolCall(String),

    #[error("LLM transport error: {0}")]
    Transport(String),

    #[error("retry budget exhausted: {0}")]
    RetryBudgetExhausted(String),
}

/// Result type for LLM client port operations.
pub type LlmResult<T> = Result<T, LlmError>;
