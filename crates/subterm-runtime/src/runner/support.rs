use std::future::Future;

use tokio_util::sync::CancellationToken;

use subterm_config::ServiceConfig;
use subterm_core::{NormalizedSnapshot, TaskReason, TaskResult};
use subterm_llm::ToolDefinition;
use subterm_mcp::ToolDescriptor;

use crate::virtual_tools::{virtual_tool_definitions, BASE_SYSTEM_PROMPT};

/// Races `fut` against `cancel` (when present), so a suspension point
/// responds to an external cancellation signal instead of only being
/// checked between turns. Returns `None` if `cancel` fired first.
pub(crate) async fn race_cancel<F: Future>(cancel: Option<&CancellationToken>, fut: F) -> Option<F::Output> {
    match cancel {
        Some(token) => {
            tokio::select! {
                output = fut => Some(output),
                () = token.cancelled() => None,
            }
        },
        None => Some(fut.await),
    }
}

/// Builds the terminal result for a cancellation observed at a suspension
/// point (LLM invoke, MCP call_tool, or a checkpoint/auth prompt wait).
pub(crate) fn cancelled_result(turn: u32, snapshot: &NormalizedSnapshot) -> TaskResult {
    TaskResult::terminal(
        false,
        false,
        TaskReason::HumanRejected,
        turn,
        Some(snapshot.url.clone()),
        Some("run cancelled".to_string()),
    )
}

/// Renders a snapshot into the text placed in conversation history; the
/// LLM sees this, not the raw MCP tool output.
pub(crate) fn render_snapshot(snapshot: &NormalizedSnapshot) -> String {
    format!(
        "Page URL: {}\nPage Title: {}\n{}",
        snapshot.url, snapshot.title, snapshot.content
    )
}

pub(crate) fn build_system_prompt(service: &ServiceConfig) -> String {
    let mut prompt = format!("{BASE_SYSTEM_PROMPT}\n\nGoal: {}", service.goal_template);
    if !service.system_prompt_addition.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(&service.system_prompt_addition);
    }
    prompt
}

pub(crate) fn build_catalog(mcp_tools: &[ToolDescriptor]) -> Vec<ToolDefinition> {
    let mut catalog: Vec<ToolDefinition> = mcp_tools
        .iter()
        .map(|tool| {
            let mut def = ToolDefinition::new(tool.name.clone(), tool.input_schema.clone());
            if let Some(description) = &tool.description {
                def = def.with_description(description.clone());
            }
            def
        })
        .collect();
    catalog.extend(virtual_tool_definitions());
    catalog
}

/// Builds the terminal result for a mid-run MCP failure. The only MCP
/// failure the runner treats as fatal is a lost connection; tool-call-level
/// failures are reported back to the LLM as a tool-result error instead.
pub(crate) fn mcp_error_result(reason: impl Into<String>, turn: u32, snapshot: &NormalizedSnapshot) -> TaskResult {
    TaskResult::terminal(
        false,
        false,
        TaskReason::McpError,
        turn,
        Some(snapshot.url.clone()),
        Some(reason.into()),
    )
}
