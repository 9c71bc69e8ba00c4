//! The task runner (C8): the turn-based loop that drives one cancellation
//! flow against the MCP and LLM ports, gated by checkpoint predicates and
//! ending in an independently verified [`subterm_core::TaskResult`].

mod config;
mod error;
mod runner;
mod virtual_tools;

pub use config::RuntimeConfig;
pub use error::{RuntimeError, RuntimeResult};
pub use runner::{RunOptions, TaskRunner};
pub use virtual_tools::{COMPLETE_TASK, REQUEST_HUMAN_APPROVAL, VIRTUAL_TOOL_NAMES};
