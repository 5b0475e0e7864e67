//! Tool Registry
//!
//! Information Hiding:
//! - Tool storage and lookup implementation hidden
//! - Declaration order preserved so the model is offered tools deterministically

use super::{Tool, ToolMetadata};
use crate::error::{Result, SwitchboardError};
use std::sync::Arc;

/// The tools one agent declares
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a new tool; names must be unique within the registry
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.metadata().name;
        if self.has_tool(&name) {
            return Err(SwitchboardError::config(format!(
                "tool '{}' registered twice",
                name
            )));
        }
        tracing::debug!("Registering tool: {}", name);
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|tool| tool.metadata().name == name)
            .cloned()
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get all tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|tool| tool.metadata().name).collect()
    }

    /// Get all tool metadata
    pub fn list_tools(&self) -> Vec<ToolMetadata> {
        self.tools.iter().map(|tool| tool.metadata()).collect()
    }

    /// (tool name, target agent) for every tool that can hand off
    pub fn handoff_targets(&self) -> Vec<(String, &'static str)> {
        self.tools
            .iter()
            .filter_map(|tool| tool.handoff_target().map(|t| (tool.metadata().name, t)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get tool metadata as formatted string for display
    pub fn tools_description(&self) -> String {
        let mut descriptions = Vec::new();
        for tool in &self.tools {
            let metadata = tool.metadata();
            let mut entry = format!("Tool: {}\nDescription: {}", metadata.name, metadata.description);
            if !metadata.parameters.is_empty() {
                let params = metadata
                    .parameters
                    .iter()
                    .map(|p| {
                        let required = if p.required { "required" } else { "optional" };
                        format!("  - {} ({}): {} [{}]", p.name, p.param_type, p.description, required)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                entry.push_str(&format!("\nParameters:\n{}", params));
            }
            if let Some(target) = tool.handoff_target() {
                entry.push_str(&format!("\nHands off to: {}", target));
            }
            descriptions.push(entry);
        }
        descriptions.join("\n\n")
    }
}
