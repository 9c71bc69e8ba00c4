use tokio_util::sync::CancellationToken;

use subterm_checkpoint::CheckpointHandler;
use subterm_config::ServiceConfig;
use subterm_core::{Message, NormalizedSnapshot, TaskReason, TaskResult, ToolCall};
use subterm_mcp::{McpClient, McpError};
use subterm_snapshot::normalize_snapshot;

use crate::config::RuntimeConfig;
use crate::error::RuntimeResult;
use crate::runner::support::{cancelled_result, mcp_error_result, race_cancel, render_snapshot};
use crate::virtual_tools::{BROWSER_SNAPSHOT, COMPLETE_TASK, REQUEST_HUMAN_APPROVAL};

/// What the loop should do after handling one tool call.
pub(crate) enum TurnOutcome {
    Continue,
    Terminal(TaskResult),
}

/// Dispatches the single tool call chosen for this turn: one of the two
/// virtual tools, or a real MCP tool (subject to auth interception and
/// checkpoint approval first).
pub(crate) async fn dispatch_one<M: McpClient>(
    call: &ToolCall,
    mcp: &M,
    checkpoint: &CheckpointHandler,
    service: &ServiceConfig,
    runtime_config: &RuntimeConfig,
    history: &mut Vec<Message>,
    snapshot: &mut NormalizedSnapshot,
    turn: u32,
    cancel: Option<&CancellationToken>,
) -> RuntimeResult<TurnOutcome> {
    match call.name.as_str() {
        COMPLETE_TASK => Ok(handle_complete_task(call, service, history, snapshot, turn)),
        REQUEST_HUMAN_APPROVAL => {
            Ok(handle_request_human_approval(call, checkpoint, history, snapshot, turn, cancel).await)
        },
        _ => handle_mcp_tool(call, mcp, checkpoint, service, runtime_config, history, snapshot, turn, cancel).await,
    }
}

fn handle_complete_task(
    call: &ToolCall,
    service: &ServiceConfig,
    history: &mut Vec<Message>,
    snapshot: &NormalizedSnapshot,
    turn: u32,
) -> TurnOutcome {
    let status = call.args.get("status").and_then(serde_json::Value::as_str).unwrap_or("failed");

    if service.success_indicators.iter().any(|indicator| indicator(snapshot)) {
        let success = status == "success";
        history.push(Message::tool_result(&call.id, "verification: success indicators matched"));
        return TurnOutcome::Terminal(TaskResult::terminal(
            success,
            true,
            TaskReason::Completed,
            turn,
            Some(snapshot.url.clone()),
            (!success).then(|| "the LLM reported failure but success indicators matched the final page".to_string()),
        ));
    }

    if service.failure_indicators.iter().any(|indicator| indicator(snapshot)) {
        history.push(Message::tool_result(&call.id, "verification: failure indicators matched"));
        return TurnOutcome::Terminal(TaskResult::terminal(
            false,
            true,
            TaskReason::VerificationFailed,
            turn,
            Some(snapshot.url.clone()),
            Some("failure indicators matched the final page".to_string()),
        ));
    }

    history.push(Message::tool_result(
        &call.id,
        "verification failed: no success indicators are present on the current page",
    ));
    TurnOutcome::Continue
}

async fn handle_request_human_approval(
    call: &ToolCall,
    checkpoint: &CheckpointHandler,
    history: &mut Vec<Message>,
    snapshot: &NormalizedSnapshot,
    turn: u32,
    cancel: Option<&CancellationToken>,
) -> TurnOutcome {
    let action = call.args.get("action").and_then(serde_json::Value::as_str).unwrap_or("(unspecified action)");
    let reason = call.args.get("reason").and_then(serde_json::Value::as_str).unwrap_or("");
    let description = format!("{action}: {reason}");

    let Some(approved) = race_cancel(
        cancel,
        checkpoint.request_approval(REQUEST_HUMAN_APPROVAL, &description, snapshot.screenshot_path.as_deref()),
    )
    .await
    else {
        return TurnOutcome::Terminal(cancelled_result(turn, snapshot));
    };

    if approved {
        history.push(Message::tool_result(&call.id, "approved"));
        TurnOutcome::Continue
    } else {
        history.push(Message::tool_result(&call.id, "rejected"));
        TurnOutcome::Terminal(TaskResult::terminal(
            false,
            false,
            TaskReason::HumanRejected,
            turn,
            Some(snapshot.url.clone()),
            Some("the human rejected the requested action".to_string()),
        ))
    }
}

async fn handle_mcp_tool<M: McpClient>(
    call: &ToolCall,
    mcp: &M,
    checkpoint: &CheckpointHandler,
    service: &ServiceConfig,
    runtime_config: &RuntimeConfig,
    history: &mut Vec<Message>,
    snapshot: &mut NormalizedSnapshot,
    turn: u32,
    cancel: Option<&CancellationToken>,
) -> RuntimeResult<TurnOutcome> {
    if let Some(kind) = CheckpointHandler::detect_auth_edge_case(snapshot, service) {
        let Some(completed) = race_cancel(cancel, checkpoint.wait_for_auth_completion(&kind)).await else {
            return Ok(TurnOutcome::Terminal(cancelled_result(turn, snapshot)));
        };
        if !completed {
            return Ok(TurnOutcome::Terminal(TaskResult::terminal(
                false,
                false,
                TaskReason::HumanRejected,
                turn,
                Some(snapshot.url.clone()),
                Some(format!("the human did not complete {kind} authentication")),
            )));
        }
        return Ok(match race_cancel(cancel, refresh_snapshot(mcp)).await {
            None => TurnOutcome::Terminal(cancelled_result(turn, snapshot)),
            Some(Ok(refreshed)) => {
                *snapshot = refreshed;
                history.push(Message::tool_result(&call.id, render_snapshot(snapshot)));
                TurnOutcome::Continue
            },
            Some(Err(e)) => TurnOutcome::Terminal(mcp_error_result(e.to_string(), turn, snapshot)),
        });
    }

    if CheckpointHandler::should_checkpoint(call, snapshot, service) {
        let description = describe_tool_call(call);
        let Some(approved) = race_cancel(
            cancel,
            checkpoint.request_approval(&call.name, &description, snapshot.screenshot_path.as_deref()),
        )
        .await
        else {
            return Ok(TurnOutcome::Terminal(cancelled_result(turn, snapshot)));
        };
        if !approved {
            return Ok(TurnOutcome::Terminal(TaskResult::terminal(
                false,
                false,
                TaskReason::HumanRejected,
                turn,
                Some(snapshot.url.clone()),
                Some("the human rejected the tool call at a checkpoint".to_string()),
            )));
        }
    }

    let Some(call_result) = race_cancel(cancel, mcp.call_tool(&call.name, call.args.clone())).await else {
        return Ok(TurnOutcome::Terminal(cancelled_result(turn, snapshot)));
    };

    match call_result {
        Ok(result_text) => {
            if runtime_config.navigation_tools.contains(&call.name) {
                match race_cancel(cancel, refresh_snapshot(mcp)).await {
                    None => return Ok(TurnOutcome::Terminal(cancelled_result(turn, snapshot))),
                    Some(Ok(refreshed)) => {
                        *snapshot = refreshed;
                        history.push(Message::tool_result(&call.id, render_snapshot(snapshot)));
                    },
                    Some(Err(McpError::Connection(reason))) => {
                        return Ok(TurnOutcome::Terminal(mcp_error_result(reason, turn, snapshot)));
                    },
                    Some(Err(e)) => {
                        history.push(Message::tool_result(&call.id, format!("tool error: {e}")));
                    },
                }
            } else {
                history.push(Message::tool_result(&call.id, result_text));
            }
            Ok(TurnOutcome::Continue)
        },
        Err(McpError::Connection(reason)) => Ok(TurnOutcome::Terminal(mcp_error_result(reason, turn, snapshot))),
        Err(e) => {
            history.push(Message::tool_result(&call.id, format!("tool error: {e}")));
            Ok(TurnOutcome::Continue)
        },
    }
}

async fn refresh_snapshot<M: McpClient>(mcp: &M) -> Result<NormalizedSnapshot, McpError> {
    let text = mcp.call_tool(BROWSER_SNAPSHOT, serde_json::Value::Null).await?;
    Ok(normalize_snapshot(&text))
}

fn describe_tool_call(call: &ToolCall) -> String {
    format!("{}({})", call.name, call.args)
}
