use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use subterm_checkpoint::CheckpointHandler;
use subterm_config::{ServiceConfig, ServiceRegistry, SnapshotPredicate};
use subterm_core::{NormalizedSnapshot, TaskReason, ToolCall};
use subterm_llm::AssistantResponse;
use subterm_test::{AutoApproveHandler, AutoDenyHandler, FakeLlmClient, FakeMcpClient};

use crate::config::RuntimeConfig;
use crate::runner::{RunOptions, TaskRunner};

fn contains(needle: &'static str) -> SnapshotPredicate {
    Arc::new(move |snap: &NormalizedSnapshot| snap.content.contains(needle))
}

fn click(id: &str) -> AssistantResponse {
    AssistantResponse::with_tool_call("clicking", ToolCall::new(id, "browser_click", json!({ "ref": id })))
}

fn complete(id: &str, status: &str) -> AssistantResponse {
    AssistantResponse::with_tool_call(
        "done",
        ToolCall::new(id, "complete_task", json!({ "status": status, "reason": "done" })),
    )
}

fn registry_with(config: ServiceConfig) -> ServiceRegistry {
    let registry = ServiceRegistry::new();
    registry.register(config).unwrap();
    registry
}

fn runner(
    mcp: FakeMcpClient,
    llm: FakeLlmClient,
    checkpoint: CheckpointHandler,
    registry: ServiceRegistry,
) -> TaskRunner<FakeMcpClient, FakeLlmClient> {
    TaskRunner::new(mcp, llm, checkpoint, registry, RuntimeConfig::default())
}

fn auto_approve_checkpoint() -> CheckpointHandler {
    CheckpointHandler::new(Arc::new(AutoApproveHandler), Duration::from_secs(1), Duration::from_secs(1))
}

fn auto_deny_checkpoint() -> CheckpointHandler {
    CheckpointHandler::new(Arc::new(AutoDenyHandler), Duration::from_secs(1), Duration::from_secs(1))
}

#[tokio::test]
async fn s1_happy_path() {
    let service = ServiceConfig::new("svc_A", "https://x/account", "cancel the subscription")
        .with_success_indicator(contains("Cancellation complete"));

    let mcp = FakeMcpClient::new(
        Vec::new(),
        vec![
            Ok("navigated".to_string()),
            Ok("account page [ref=s1e1]".to_string()),
            Ok("clicked".to_string()),
            Ok("retention offer [ref=s2e1]".to_string()),
            Ok("clicked".to_string()),
            Ok("survey [ref=s3e1]".to_string()),
            Ok("clicked".to_string()),
            Ok("final confirm [ref=s4e1]".to_string()),
            Ok("clicked".to_string()),
            Ok("Cancellation complete".to_string()),
        ],
    );
    let llm = FakeLlmClient::new(vec![
        click("c1"),
        click("c2"),
        click("c3"),
        click("c4"),
        complete("c5", "success"),
    ]);

    let task = runner(mcp, llm, auto_approve_checkpoint(), registry_with(service));
    let result = task.run("svc_A", RunOptions::default()).await.unwrap();

    assert!(result.success);
    assert!(result.verified);
    assert_eq!(result.reason, TaskReason::Completed);
    assert_eq!(result.turns, 5);
}

#[tokio::test]
async fn s2_checkpoint_rejection_blocks_execution() {
    let service = ServiceConfig::new("svc_A", "https://x/account", "cancel the subscription")
        .with_success_indicator(contains("Cancellation complete"))
        .with_checkpoint_condition(Arc::new(|_call: &ToolCall, snap: &NormalizedSnapshot| {
            snap.content.contains("final confirm")
        }));

    let mcp = FakeMcpClient::new(
        Vec::new(),
        vec![
            Ok("navigated".to_string()),
            Ok("account page [ref=s1e1]".to_string()),
            Ok("clicked".to_string()),
            Ok("retention offer [ref=s2e1]".to_string()),
            Ok("clicked".to_string()),
            Ok("survey [ref=s3e1]".to_string()),
            Ok("clicked".to_string()),
            Ok("final confirm [ref=s4e1]".to_string()),
        ],
    );
    let llm = FakeLlmClient::new(vec![click("c1"), click("c2"), click("c3"), click("c4")]);

    let task = runner(mcp, llm, auto_deny_checkpoint(), registry_with(service));
    let result = task.run("svc_A", RunOptions::default()).await.unwrap();

    assert!(!result.success);
    assert!(!result.verified);
    assert_eq!(result.reason, TaskReason::HumanRejected);
    assert_eq!(result.turns, 4);
}

#[tokio::test]
async fn s2_fourth_tool_was_not_executed() {
    let service = ServiceConfig::new("svc_A", "https://x/account", "cancel the subscription")
        .with_checkpoint_condition(Arc::new(|_call: &ToolCall, snap: &NormalizedSnapshot| {
            snap.content.contains("final confirm")
        }));

    let mcp = Arc::new(FakeMcpClient::new(
        Vec::new(),
        vec![
            Ok("navigated".to_string()),
            Ok("account page".to_string()),
            Ok("clicked".to_string()),
            Ok("retention offer".to_string()),
            Ok("clicked".to_string()),
            Ok("survey".to_string()),
            Ok("clicked".to_string()),
            Ok("final confirm".to_string()),
        ],
    ));
    let llm = FakeLlmClient::new(vec![click("c1"), click("c2"), click("c3"), click("c4")]);

    let task = TaskRunner::new(
        mcp.clone(),
        llm,
        auto_deny_checkpoint(),
        registry_with(service),
        RuntimeConfig::default(),
    );
    let result = task.run("svc_A", RunOptions::default()).await.unwrap();
    assert_eq!(result.reason, TaskReason::HumanRejected);

    let click_calls = mcp.calls().await.into_iter().filter(|(name, _)| name == "browser_click").count();
    assert_eq!(click_calls, 3, "the fourth (checkpointed) click must not reach the MCP client");
}

#[tokio::test]
async fn s3_auth_interception_skips_the_original_click() {
    let service = ServiceConfig::new("svc_A", "https://x/login", "cancel the subscription")
        .with_auth_edge_case_detector(Arc::new(|snap: &NormalizedSnapshot| {
            snap.url.contains("/login").then(|| "login".to_string())
        }))
        .with_success_indicator(contains("account page"));

    let mcp = FakeMcpClient::new(
        Vec::new(),
        vec![
            Ok("navigated".to_string()),
            Ok("Page URL: https://x/login\nlogin page".to_string()),
            Ok("Page URL: https://x/account\naccount page".to_string()),
        ],
    );
    let llm = FakeLlmClient::new(vec![click("c1"), complete("c2", "success")]);

    let task = runner(mcp, llm, auto_approve_checkpoint(), registry_with(service));
    let result = task.run("svc_A", RunOptions::default()).await.unwrap();

    assert_eq!(result.reason, TaskReason::Completed);
    assert_eq!(result.turns, 2);
}

#[tokio::test]
async fn s4_max_turns_exceeded() {
    let service = ServiceConfig::new("svc_A", "https://x/account", "cancel the subscription");

    let mcp = FakeMcpClient::new(
        Vec::new(),
        vec![
            Ok("navigated".to_string()),
            Ok("account page".to_string()),
            Ok("pressed".to_string()),
            Ok("still account page".to_string()),
            Ok("pressed".to_string()),
            Ok("still account page".to_string()),
            Ok("pressed".to_string()),
            Ok("still account page".to_string()),
        ],
    );
    let harmless = AssistantResponse::with_tool_call(
        "pressing a key",
        ToolCall::new("k", "browser_press_key", json!({ "key": "Tab" })),
    );
    let llm = FakeLlmClient::new(vec![harmless.clone(), harmless.clone(), harmless]);

    let task = runner(mcp, llm, auto_approve_checkpoint(), registry_with(service));
    let result = task
        .run("svc_A", RunOptions { max_turns: Some(3), ..RunOptions::default() })
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.reason, TaskReason::MaxTurnsExceeded);
    assert_eq!(result.turns, 3);
}

#[tokio::test]
async fn s5_llm_stalls_on_no_action_cap() {
    let service = ServiceConfig::new("svc_A", "https://x/account", "cancel the subscription");

    let mcp = FakeMcpClient::new(
        Vec::new(),
        vec![Ok("navigated".to_string()), Ok("account page".to_string())],
    );
    let stall = AssistantResponse::text_only("I'm not sure what to do next.");
    let llm = FakeLlmClient::new(vec![stall.clone(), stall.clone(), stall]);

    let task = runner(mcp, llm, auto_approve_checkpoint(), registry_with(service));
    let result = task.run("svc_A", RunOptions::default()).await.unwrap();

    assert!(!result.success);
    assert_eq!(result.reason, TaskReason::LlmNoAction);
    assert_eq!(result.turns, 3);
}

#[tokio::test]
async fn s6_premature_completion_is_rejected_then_loop_continues() {
    let service = ServiceConfig::new("svc_A", "https://x/account", "cancel the subscription")
        .with_success_indicator(contains("Cancellation complete"));

    let mcp = FakeMcpClient::new(
        Vec::new(),
        vec![
            Ok("navigated".to_string()),
            Ok("account page".to_string()),
            Ok("clicked".to_string()),
            Ok("Cancellation complete".to_string()),
        ],
    );
    let llm = FakeLlmClient::new(vec![complete("c1", "success"), click("c2"), complete("c3", "success")]);

    let task = runner(mcp, llm, auto_approve_checkpoint(), registry_with(service));
    let result = task.run("svc_A", RunOptions::default()).await.unwrap();

    assert_eq!(result.reason, TaskReason::Completed);
    assert!(result.verified);
    assert_eq!(result.turns, 3);
}

#[tokio::test]
async fn max_turns_zero_terminates_before_any_llm_call() {
    let service = ServiceConfig::new("svc_A", "https://x/account", "cancel the subscription");
    let mcp = FakeMcpClient::new(
        Vec::new(),
        vec![Ok("navigated".to_string()), Ok("account page".to_string())],
    );
    let llm = FakeLlmClient::new(Vec::new());

    let task = runner(mcp, llm, auto_approve_checkpoint(), registry_with(service));
    let result = task
        .run("svc_A", RunOptions { max_turns: Some(0), ..RunOptions::default() })
        .await
        .unwrap();

    assert_eq!(result.reason, TaskReason::MaxTurnsExceeded);
    assert_eq!(result.turns, 0);
}

#[tokio::test]
async fn unknown_service_is_a_fatal_error() {
    let registry = ServiceRegistry::new();
    let mcp = FakeMcpClient::new(Vec::new(), Vec::new());
    let llm = FakeLlmClient::new(Vec::new());
    let task = runner(mcp, llm, auto_approve_checkpoint(), registry);

    let err = task.run("ghost", RunOptions::default()).await.unwrap_err();
    assert!(matches!(err, crate::error::RuntimeError::Config(_)));
}

#[tokio::test]
async fn pre_cancelled_token_is_rejected_before_connecting() {
    let service = ServiceConfig::new("svc_A", "https://x/account", "cancel the subscription");
    let mcp = Arc::new(FakeMcpClient::new(Vec::new(), Vec::new()));
    let llm = FakeLlmClient::new(Vec::new());
    let cancel = tokio_util::sync::CancellationToken::new();
    cancel.cancel();

    let task = TaskRunner::new(mcp.clone(), llm, auto_approve_checkpoint(), registry_with(service), RuntimeConfig::default());
    let err = task
        .run("svc_A", RunOptions { cancel: Some(cancel), ..RunOptions::default() })
        .await
        .unwrap_err();

    assert!(matches!(err, crate::error::RuntimeError::Cancelled));
    assert!(!mcp.is_connected(), "a pre-cancelled run must never reach the MCP port");
}

#[tokio::test]
async fn cancellation_interrupts_a_blocking_approval_wait() {
    use subterm_test::NoResponseHandler;

    let service = ServiceConfig::new("svc_A", "https://x/account", "cancel the subscription").with_checkpoint_condition(
        Arc::new(|_call: &ToolCall, _snap: &NormalizedSnapshot| true),
    );
    let mcp = FakeMcpClient::new(Vec::new(), vec![Ok("navigated".to_string()), Ok("account page".to_string())]);
    let llm = FakeLlmClient::new(vec![click("c1")]);

    // A human who never responds within the configured timeout.
    let checkpoint = CheckpointHandler::new(Arc::new(NoResponseHandler), Duration::from_secs(30), Duration::from_secs(30));
    let task = runner(mcp, llm, checkpoint, registry_with(service));

    let cancel = tokio_util::sync::CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel_clone.cancel();
    });

    let started = tokio::time::Instant::now();
    let result = task
        .run("svc_A", RunOptions { cancel: Some(cancel), ..RunOptions::default() })
        .await
        .unwrap();

    assert_eq!(result.reason, TaskReason::HumanRejected);
    assert_eq!(result.error.as_deref(), Some("run cancelled"));
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "cancellation must interrupt the approval wait instead of waiting out its 30s timeout"
    );
}

#[tokio::test]
async fn mcp_is_closed_exactly_once_on_every_exit_path() {
    let service = ServiceConfig::new("svc_A", "https://x/account", "cancel the subscription")
        .with_success_indicator(contains("Cancellation complete"));
    let mcp = Arc::new(FakeMcpClient::new(
        Vec::new(),
        vec![Ok("navigated".to_string()), Ok("Cancellation complete".to_string())],
    ));
    let llm = FakeLlmClient::new(vec![complete("c1", "success")]);

    let task = TaskRunner::new(
        mcp.clone(),
        llm,
        auto_approve_checkpoint(),
        registry_with(service),
        RuntimeConfig::default(),
    );
    task.run("svc_A", RunOptions::default()).await.unwrap();

    assert_eq!(mcp.close_count(), 1);
}
