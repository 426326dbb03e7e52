use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Tool names exposed to the model during an interactive run.
pub mod tool_names {
    pub const PHYSICAL_EXAMINATION: &str = "physical_examination";
    pub const REQUEST_IMAGING: &str = "request_imaging";
    pub const REQUEST_LAB_TEST: &str = "request_lab_test";
    pub const REQUEST_MICROBIO_TEST: &str = "request_microbio_test";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MessageRole {
    System,
    #[serde(alias = "human")]
    User,
    #[serde(alias = "ai")]
    Assistant,
    Tool,
    #[serde(other)]
    Other,
}

/// A single structured tool request made by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ToolCall {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            args,
            id: None,
        }
    }

    pub fn arg(&self, key: &str) -> Option<&serde_json::Value> {
        self.args.get(key)
    }

    /// String argument, or `None` when absent or not a string.
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arg(key).and_then(|v| v.as_str())
    }
}

/// One message of a recorded conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgentMessage {
    #[serde(alias = "type")]
    pub role: MessageRole,
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

/// Structured final answer of an interactive run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BenchmarkOutputCdm {
    /// The model's reasoning for its final diagnosis.
    #[serde(default)]
    pub thought: String,
    pub final_diagnosis: String,
    #[serde(default)]
    pub treatment: Vec<String>,
}

/// Final answer when all case information was given to the model upfront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BenchmarkOutputFullInfo {
    pub diagnosis: String,
}

/// A full interactive trace plus its parsed final answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgentRunResult {
    pub parsed_output: BenchmarkOutputCdm,
    #[serde(default)]
    pub messages: Vec<AgentMessage>,
}

impl AgentRunResult {
    /// All tool calls across all messages, in conversation order.
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.messages.iter().flat_map(|m| m.tool_calls.iter())
    }

    /// Number of calls per tool name, plus a `"total"` entry.
    pub fn tool_call_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        let mut total = 0;
        for call in self.tool_calls() {
            let name = if call.name.is_empty() {
                "unknown"
            } else {
                call.name.as_str()
            };
            *counts.entry(name.to_string()).or_insert(0) += 1;
            total += 1;
        }
        counts.insert("total".to_string(), total);
        counts
    }
}

/// Either kind of model output the evaluator accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum BenchmarkOutput {
    Agent(AgentRunResult),
    FullInfo(BenchmarkOutputFullInfo),
}
