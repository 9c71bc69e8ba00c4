//! Scripted fakes for the MCP, LLM, and user-prompt ports, shared by this
//! workspace's crate test suites.

mod fake_llm;
mod fake_mcp;
mod fake_prompt;

pub use fake_llm::FakeLlmClient;
pub use fake_mcp::FakeMcpClient;
pub use fake_prompt::{AutoApproveHandler, AutoDenyHandler, NoResponseHandler};
