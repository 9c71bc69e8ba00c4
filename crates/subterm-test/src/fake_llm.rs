use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use subterm_core::Message;
use subterm_llm::{AssistantResponse, LlmClient, LlmResult, ToolDefinition};

/// An `LlmClient` that plays back a fixed script of responses, one per
/// `invoke` call. Panics if a test issues more turns than it scripted,
/// surfacing a test bug loudly instead of looping past the scenario it
/// meant to cover.
pub struct FakeLlmClient {
    script: Mutex<VecDeque<LlmResult<AssistantResponse>>>,
    invocations: AtomicUsize,
}

impl FakeLlmClient {
    #[must_use]
    pub fn new(responses: Vec<AssistantResponse>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    #[must_use]
    pub fn with_results(results: Vec<LlmResult<AssistantResponse>>) -> Self {
        Self {
            script: Mutex::new(results.into_iter().collect()),
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for FakeLlmClient {
    async fn invoke(
        &self,
        _messages: &[Message],
        _tools: &[ToolDefinition],
        _model: Option<&str>,
    ) -> LlmResult<AssistantResponse> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().await;
        script
            .pop_front()
            .expect("FakeLlmClient script exhausted: the test issued more turns than it scripted")
    }
}
