use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use subterm_checkpoint::CheckpointHandler;
use subterm_config::ServiceConfig;
use subterm_core::{Message, TaskReason, TaskResult};
use subterm_llm::LlmClient;
use subterm_mcp::McpClient;
use subterm_snapshot::normalize_snapshot;

use crate::config::RuntimeConfig;
use crate::error::RuntimeResult;
use crate::runner::dispatch::{dispatch_one, TurnOutcome};
use crate::runner::support::{build_catalog, build_system_prompt, cancelled_result, mcp_error_result, race_cancel, render_snapshot};
use crate::virtual_tools::BROWSER_SNAPSHOT;

/// The turn-based state machine (C8). Navigates to the service's starting
/// page, then alternates LLM turns with (at most) one tool execution each
/// until a terminal condition is reached.
pub(crate) async fn run_loop<L: LlmClient, M: McpClient>(
    llm: &L,
    mcp: &M,
    checkpoint: &CheckpointHandler,
    service: &ServiceConfig,
    runtime_config: &RuntimeConfig,
    model: &str,
    cancel: Option<&CancellationToken>,
    max_turns: u32,
) -> RuntimeResult<TaskResult> {
    let empty_snapshot = subterm_core::NormalizedSnapshot::empty();

    let Some(navigate_result) =
        race_cancel(cancel, mcp.call_tool("browser_navigate", serde_json::json!({ "url": service.initial_url }))).await
    else {
        return Ok(cancelled_result(0, &empty_snapshot));
    };
    if let Err(e) = navigate_result {
        return Ok(mcp_error_result(e.to_string(), 0, &empty_snapshot));
    }

    let Some(snapshot_result) = race_cancel(cancel, mcp.call_tool(BROWSER_SNAPSHOT, serde_json::Value::Null)).await
    else {
        return Ok(cancelled_result(0, &empty_snapshot));
    };
    let mut snapshot = match snapshot_result {
        Ok(text) => normalize_snapshot(&text),
        Err(e) => return Ok(mcp_error_result(e.to_string(), 0, &empty_snapshot)),
    };

    let Some(list_tools_result) = race_cancel(cancel, mcp.list_tools()).await else {
        return Ok(cancelled_result(0, &snapshot));
    };
    let mcp_tools = match list_tools_result {
        Ok(tools) => tools,
        Err(e) => return Ok(mcp_error_result(e.to_string(), 0, &snapshot)),
    };
    let catalog = build_catalog(&mcp_tools);

    let mut history = vec![
        Message::system(build_system_prompt(service)),
        Message::user(render_snapshot(&snapshot)),
    ];

    if max_turns == 0 {
        return Ok(TaskResult::terminal(
            false,
            false,
            TaskReason::MaxTurnsExceeded,
            0,
            Some(snapshot.url.clone()),
            Some("max_turns is 0; no LLM call was made".to_string()),
        ));
    }

    let mut no_action_count: u32 = 0;
    let mut turn: u32 = 0;

    loop {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Ok(cancelled_result(turn, &snapshot));
        }

        let Some(invoke_result) = race_cancel(cancel, llm.invoke(&history, &catalog, Some(model))).await else {
            return Ok(cancelled_result(turn, &snapshot));
        };
        let response = match invoke_result {
            Ok(r) => r,
            Err(e) => {
                return Ok(TaskResult::terminal(
                    false,
                    false,
                    TaskReason::LlmError,
                    turn,
                    Some(snapshot.url.clone()),
                    Some(e.to_string()),
                ));
            },
        };
        turn = turn.saturating_add(1);
        debug!(turn, tool_calls = response.tool_calls.len(), "LLM turn complete");

        if response.tool_calls.is_empty() {
            history.push(Message::assistant(&response.text));
            no_action_count = no_action_count.saturating_add(1);
            if no_action_count >= runtime_config.no_action_cap {
                warn!(turn, no_action_count, "no-action cap reached");
                return Ok(TaskResult::terminal(
                    false,
                    false,
                    TaskReason::LlmNoAction,
                    turn,
                    Some(snapshot.url.clone()),
                    Some("LLM produced no tool call for too many consecutive turns".to_string()),
                ));
            }
            history.push(Message::user("Please call a tool to progress toward the goal."));
        } else {
            no_action_count = 0;
            let calls = response.tool_calls.clone();
            history.push(Message::assistant_with_tools(&response.text, calls.clone()));
            for skipped in &calls[1..] {
                history.push(Message::tool_result(
                    &skipped.id,
                    "skipped: only one tool call is executed per turn",
                ));
            }

            match dispatch_one(&calls[0], mcp, checkpoint, service, runtime_config, &mut history, &mut snapshot, turn, cancel).await? {
                TurnOutcome::Terminal(result) => return Ok(result),
                TurnOutcome::Continue => {},
            }
        }

        if turn >= max_turns {
            return Ok(TaskResult::terminal(
                false,
                false,
                TaskReason::MaxTurnsExceeded,
                turn,
                Some(snapshot.url.clone()),
                Some("max_turns budget exhausted".to_string()),
            ));
        }
    }
}
