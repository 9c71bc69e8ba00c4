//! MCP client port: the trait and supporting types the runner uses to talk
//! to a Playwright-backed browser-automation tool server.

mod client;
mod error;
mod types;

pub use client::McpClient;
pub use error::{McpError, McpResult};
pub use types::ToolDescriptor;
