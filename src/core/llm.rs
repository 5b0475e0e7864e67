//! Model turn boundary
//!
//! The orchestrator never talks to a provider directly. It hands a context,
//! the offered tools and a tool-choice policy to a `ModelClient` and gets back
//! either text or exactly one tool invocation.

use crate::core::chat::ChatContext;
use crate::tools::ToolMetadata;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether the model may call a tool on this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
    None,
}

impl ToolChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolChoice::Auto => "auto",
            ToolChoice::None => "none",
        }
    }
}

/// Per-agent model and voice parameters, passed through untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub voice: Option<String>,
}

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub call_id: String,
    pub name: String,
    pub arguments: Value,
}

/// Outcome of a single model turn
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTurn {
    Reply(String),
    ToolCall(ToolInvocation),
}

/// Everything a provider needs to produce one turn
#[derive(Debug, Clone, Copy)]
pub struct TurnRequest<'a> {
    pub agent: &'a str,
    pub options: &'a AgentOptions,
    pub context: &'a ChatContext,
    pub tools: &'a [ToolMetadata],
    pub tool_choice: ToolChoice,
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn run_turn(&self, request: TurnRequest<'_>) -> Result<ModelTurn>;
}
