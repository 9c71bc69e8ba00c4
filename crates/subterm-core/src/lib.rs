//! Shared data types for the orchestrator: tool calls, conversation messages,
//! normalized page snapshots, and terminal task results.
//!
//! Everything in this crate is a plain data shape with no async and no I/O;
//! ports and the runtime build on top of it.

mod message;
mod result;
mod snapshot;
mod tool_call;

pub use message::{Message, Role};
pub use result::{TaskReason, TaskResult};
pub use snapshot::NormalizedSnapshot;
pub use tool_call::ToolCall;
