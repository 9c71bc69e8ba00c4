use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single tool invocation proposed by the LLM.
///
/// `id` ties the call to its eventual tool-result message; `args` is the raw
/// JSON the LLM supplied and is not validated against the tool's schema here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

impl ToolCall {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args,
        }
    }
}
