use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::McpResult;
use crate::types::ToolDescriptor;

/// The port the runner drives a Playwright-backed MCP server through.
///
/// Implementations own the actual transport (stdio child process, socket,
/// whatever); this crate only defines the contract. `close` must be
/// idempotent and safe to call even when `connect` never succeeded or was
/// never called, since the runner calls it on every exit path.
#[async_trait]
pub trait McpClient: Send + Sync {
    /// Establishes the connection to the MCP server. Called once at the
    /// start of a run, before any tool call.
    async fn connect(&self) -> McpResult<()>;

    /// Lists the tools the server currently exposes, to build the catalog
    /// offered to the LLM.
    async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>>;

    /// Invokes `name` with `args`, returning the tool's raw text result.
    async fn call_tool(&self, name: &str, args: Value) -> McpResult<String>;

    /// Tears down the connection. Safe to call more than once; never raises
    /// on a second or later call.
    async fn close(&self) -> McpResult<()>;
}

/// Blanket implementation so a shared `Arc<M>` can stand in for `M`
/// wherever `McpClient` is required; useful for callers (and tests) that
/// need a second handle on the same client after handing one to a
/// `TaskRunner`.
#[async_trait]
impl<T: McpClient + ?Sized> McpClient for Arc<T> {
    async fn connect(&self) -> McpResult<()> {
        (**self).connect().await
    }

    async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>> {
        (**self).list_tools().await
    }

    async fn call_tool(&self, name: &str, args: Value) -> McpResult<String> {
        (**self).call_tool(name, args).await
    }

    async fn close(&self) -> McpResult<()> {
        (**self).close().await
    }
}
