//! LLM client port: the single-shot `invoke` contract the runner drives the
//! model through, plus the tool catalog and response shapes it exchanges.

mod client;
mod error;
mod types;

pub use client::LlmClient;
pub use error::{LlmError, LlmResult};
pub use types::{AssistantResponse, ToolDefinition};
