use serde_json::json;
use subterm_llm::ToolDefinition;

pub const COMPLETE_TASK: &str = "complete_task";
pub const REQUEST_HUMAN_APPROVAL: &str = "request_human_approval";
pub const BROWSER_SNAPSHOT: &str = "browser_snapshot";

/// Names the LLM cannot invoke as ordinary MCP tools, even if an MCP server
/// happened to expose a tool under the same name.
pub const VIRTUAL_TOOL_NAMES: [&str; 2] = [COMPLETE_TASK, REQUEST_HUMAN_APPROVAL];

/// Builds the two virtual tool definitions added to every catalog, on top
/// of whatever the MCP server's `list_tools` returns.
#[must_use]
pub fn virtual_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            COMPLETE_TASK,
            json!({
                "type": "object",
                "properties": {
                    "status": { "type": "string", "enum": ["success", "failed"] },
                    "reason": { "type": "string" },
                },
                "required": ["status", "reason"],
            }),
        )
        .with_description(
            "Declare that the task is finished. The final page is independently checked \
             against this service's success and failure indicators before this claim is \
             accepted; declaring success does not make it so.",
        ),
        ToolDefinition::new(
            REQUEST_HUMAN_APPROVAL,
            json!({
                "type": "object",
                "properties": {
                    "action": { "type": "string" },
                    "reason": { "type": "string" },
                },
                "required": ["action", "reason"],
            }),
        )
        .with_description(
            "Ask a human to approve an action before taking it, when you are unsure whether \
             it is safe or reversible. Waits for a response; a timeout counts as rejection.",
        ),
    ]
}

pub const BASE_SYSTEM_PROMPT: &str = "\
You are operating a web browser on behalf of a person who wants to cancel a subscription. \
You may call exactly one tool per turn. Use complete_task only once the page confirms the \
outcome; a human will independently verify the final page state. If you hit a login prompt, \
CAPTCHA, or multi-factor challenge, do not attempt to solve it yourself; it is intercepted \
and handled by a human. Use request_human_approval before taking an action you are unsure \
is safe or reversible.";
