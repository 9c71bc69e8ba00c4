//! Human-in-the-loop gating: detects auth edge cases and checkpoint-worthy
//! tool calls, and drives the two prompts a run can block on. Timeouts are
//! always treated as rejection; nothing here retries.

mod handler;
mod prompt_port;

pub use handler::CheckpointHandler;
pub use prompt_port::{ApprovalPromptOutcome, AuthPromptOutcome, UserPromptPort};
