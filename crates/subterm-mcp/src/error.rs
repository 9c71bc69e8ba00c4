use thiserror::Error;

/// Errors from the MCP client port. Only [`McpError::Connection`] is treated
/// as fatal by the runner (the transport itself is gone); the others surface
/// as a regular tool-result error and the run continues.
#[derive(Debug, Error)]
pub enum McpError {
    /// The underlying transport to the MCP server is unavailable or was lost.
    #[error("MCP connection error: {0}")]
    Connection(String),

    /// The server responded but not in a way the client understands.
    #[error("MCP protocol error: {0}")]
    Protocol(String),

    /// A specific `call_tool` invocation failed.
    #[error("MCP tool call to {name} failed: {reason}")]
    ToolCall { name: String, reason: String },
}

/// Result type for MCP client port operations.
pub type McpResult<T> = Result<T, McpError>;
