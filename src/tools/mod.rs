//! Tool System - State-mutating actions the model can invoke
//!
//! Information Hiding:
//! - Tool handlers hide their argument parsing and guard logic behind the trait
//! - Registry lookup details hidden from the orchestrator
//! - Handoff interpretation lives in the dispatcher, not in the tools

pub mod dispatcher;
pub mod macros;
pub mod registry;
pub mod restaurant;

use crate::agents::AgentRegistry;
use crate::error::{Result, SwitchboardError};
use crate::session::UserData;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Tool parameter schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub param_type: String,
    pub description: String,
    pub required: bool,
}

/// Tool metadata - describes what the tool does and how to use it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolMetadata {
    /// JSON schema object for the parameters, as function-calling APIs expect
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut schema = json!({
                "type": param.param_type,
                "description": param.description,
            });
            if param.param_type == "array" {
                schema["items"] = json!({"type": "string"});
            }
            properties.insert(param.name.clone(), schema);
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

impl fmt::Display for ToolMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

/// What a tool hands back to the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffDirective {
    /// Informational result, the current agent stays in charge
    Reply(String),
    /// Make `target` the current agent and show `message` as the tool result
    Transfer { target: String, message: String },
}

impl HandoffDirective {
    pub fn reply(text: impl Into<String>) -> Self {
        HandoffDirective::Reply(text.into())
    }
}

/// Explicit state handed to every tool handler
pub struct ToolContext<'a> {
    pub userdata: &'a mut UserData,
    pub agents: &'a AgentRegistry,
}

impl<'a> ToolContext<'a> {
    /// Build a transfer directive to a registered agent
    pub fn transfer_to(&self, target: &str) -> Result<HandoffDirective> {
        if !self.agents.contains(target) {
            return Err(SwitchboardError::UnknownAgent(target.to_string()));
        }
        Ok(HandoffDirective::Transfer {
            target: target.to_string(),
            message: format!("Transferring to {}.", target),
        })
    }
}

/// Tool trait - All tools must implement this
///
/// Handlers run synchronously against the shared user data. A tool that can
/// hand off declares its target up front so session construction can check
/// it is registered.
pub trait Tool: Send + Sync {
    /// Get tool metadata (name, description, parameters)
    fn metadata(&self) -> ToolMetadata;

    /// Registry name of the agent this tool may transfer to
    fn handoff_target(&self) -> Option<&'static str> {
        None
    }

    /// Execute the tool with given arguments
    fn execute(&self, args: Value, ctx: &mut ToolContext<'_>) -> Result<HandoffDirective>;
}

/// Deserialize tool arguments into their typed form
pub fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    // Argument-less tools may be called with `null`
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|source| SwitchboardError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_schema() {
        let metadata = ToolMetadata {
            name: "update_order".to_string(),
            description: "Replace the order".to_string(),
            parameters: vec![
                ToolParameter {
                    name: "items".to_string(),
                    param_type: "array".to_string(),
                    description: "The items of the full order".to_string(),
                    required: true,
                },
                ToolParameter {
                    name: "note".to_string(),
                    param_type: "string".to_string(),
                    description: "Optional note".to_string(),
                    required: false,
                },
            ],
        };

        let schema = metadata.parameters_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["items"]["items"]["type"], "string");
        assert_eq!(schema["required"], json!(["items"]));
        assert!(schema["properties"]["note"].get("items").is_none());
    }

    #[test]
    fn test_parse_args_accepts_null_for_empty_struct() {
        #[derive(Deserialize)]
        struct NoArgs {}
        assert!(parse_args::<NoArgs>("to_greeter", Value::Null).is_ok());

        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct NameArgs {
            name: String,
        }
        let err = parse_args::<NameArgs>("update_name", json!({"nombre": "Ana"})).unwrap_err();
        assert!(matches!(err, SwitchboardError::InvalidArguments { .. }));
    }
}
