use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use subterm_mcp::{McpClient, McpResult, ToolDescriptor};

/// An `McpClient` whose tool list is fixed up front and whose `call_tool`
/// results are played back in call order. Records every call made, so tests
/// can assert which tools actually ran (and, just as importantly, which
/// didn't).
pub struct FakeMcpClient {
    tools: Vec<ToolDescriptor>,
    responses: Mutex<VecDeque<McpResult<String>>>,
    calls: Mutex<Vec<(String, Value)>>,
    connected: AtomicBool,
    close_count: AtomicUsize,
}

impl FakeMcpClient {
    #[must_use]
    pub fn new(tools: Vec<ToolDescriptor>, responses: Vec<McpResult<String>>) -> Self {
        Self {
            tools,
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
            connected: AtomicBool::new(false),
            close_count: AtomicUsize::new(0),
        }
    }

    pub async fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().await.clone()
    }

    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl McpClient for FakeMcpClient {
    async fn connect(&self) -> McpResult<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>> {
        Ok(self.tools.clone())
    }

    async fn call_tool(&self, name: &str, args: Value) -> McpResult<String> {
        self.calls.lock().await.push((name.to_string(), args));
        let mut responses = self.responses.lock().await;
        responses.pop_front().unwrap_or(Ok(String::new()))
    }

    async fn close(&self) -> McpResult<()> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
