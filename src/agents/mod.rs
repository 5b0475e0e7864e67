//! Specialist agents
//!
//! Information Hiding:
//! - Persona prompts and tool sets live with each AgentKind
//! - Chat context ownership kept inside SpecialistAgent
//! - Only the orchestrator may replace an agent's live context

pub mod kind;
pub mod registry;

pub use kind::AgentKind;
pub use registry::AgentRegistry;

use crate::core::chat::{ChatContext, ChatItem};
use crate::core::llm::AgentOptions;
use crate::error::Result;
use crate::tools::registry::ToolRegistry;
use crate::tools::{Tool, ToolMetadata};
use std::sync::Arc;

/// One specialist with its own persona, tools and chat history
#[derive(Clone)]
pub struct SpecialistAgent {
    kind: AgentKind,
    instructions: String,
    options: AgentOptions,
    tools: ToolRegistry,
    context: ChatContext,
}

impl std::fmt::Debug for SpecialistAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecialistAgent")
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("tools", &self.tools.tool_names())
            .field("context_len", &self.context.len())
            .finish()
    }
}

impl SpecialistAgent {
    /// Build the specialist with the tools its kind declares
    pub fn new(kind: AgentKind, menu: &str) -> Result<Self> {
        Self::with_tools(kind, menu, kind.declared_tools())
    }

    /// Build the specialist with an explicit tool set; tool names must be unique
    pub fn with_tools(
        kind: AgentKind,
        menu: &str,
        declared: Vec<Arc<dyn Tool>>,
    ) -> Result<Self> {
        let mut tools = ToolRegistry::new();
        for tool in declared {
            tools.register(tool)?;
        }

        let instructions = kind.instructions(menu);
        let context = ChatContext::from_items(vec![ChatItem::system(instructions.clone())]);
        Ok(Self {
            kind,
            instructions,
            options: kind.options(),
            tools,
            context,
        })
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn options(&self) -> &AgentOptions {
        &self.options
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn tool_metadata(&self) -> Vec<ToolMetadata> {
        self.tools.list_tools()
    }

    pub fn context(&self) -> &ChatContext {
        &self.context
    }

    pub(crate) fn context_mut(&mut self) -> &mut ChatContext {
        &mut self.context
    }

    pub(crate) fn replace_context(&mut self, context: ChatContext) {
        self.context = context;
    }
}
