//! Tool Dispatcher
//!
//! Information Hiding:
//! - Tool lookup against the active agent's declarations hidden
//! - Classification of tool results into replies and handoffs internalized
//! - Recoverable argument errors turned into model-visible replies

use super::{HandoffDirective, ToolContext};
use crate::agents::AgentRegistry;
use crate::core::llm::ToolInvocation;
use crate::error::{Result, SwitchboardError};
use crate::session::UserData;

/// How the orchestrator should continue after a tool ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Show `0` to the model as the tool result and keep the current agent
    Reply(String),
    /// Switch to `target`; `message` is the tool result of the outgoing turn
    Handoff { target: String, message: String },
}

impl DispatchOutcome {
    /// Text the model sees as the function call output
    pub fn output(&self) -> &str {
        match self {
            DispatchOutcome::Reply(text) => text,
            DispatchOutcome::Handoff { message, .. } => message,
        }
    }
}

/// Executes tool invocations for the active agent
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolDispatcher;

impl ToolDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Run `invocation` against the shared user data
    ///
    /// Undeclared tools and unusable transfers are contract violations and
    /// come back as errors. Everything the model can fix by itself, including
    /// malformed arguments, comes back as a `Reply`.
    pub fn dispatch(
        &self,
        invocation: &ToolInvocation,
        userdata: &mut UserData,
        agents: &AgentRegistry,
        current_agent: &str,
    ) -> Result<DispatchOutcome> {
        let agent = agents.get(current_agent)?;
        let tool = agent.tools().get(&invocation.name).ok_or_else(|| {
            SwitchboardError::UnknownTool {
                agent: current_agent.to_string(),
                tool: invocation.name.clone(),
            }
        })?;

        tracing::debug!(
            "[ToolDispatcher] {} -> {}({})",
            current_agent,
            invocation.name,
            invocation.arguments
        );

        let mut ctx = ToolContext { userdata, agents };

        let directive = match tool.execute(invocation.arguments.clone(), &mut ctx) {
            Ok(directive) => directive,
            Err(SwitchboardError::InvalidArguments { tool, source }) => {
                tracing::warn!("[ToolDispatcher] Invalid arguments for '{}': {}", tool, source);
                return Ok(DispatchOutcome::Reply(format!(
                    "Invalid arguments for {}: {}. Please call it again with the documented parameters.",
                    tool, source
                )));
            }
            Err(SwitchboardError::UnknownAgent(target)) => {
                return Err(SwitchboardError::malformed(
                    &invocation.name,
                    format!("target '{}' is not registered", target),
                ));
            }
            Err(e) => return Err(e),
        };

        match directive {
            HandoffDirective::Reply(text) => Ok(DispatchOutcome::Reply(text)),
            HandoffDirective::Transfer { target, message } => {
                if !agents.contains(&target) {
                    return Err(SwitchboardError::malformed(
                        &invocation.name,
                        format!("target '{}' is not registered", target),
                    ));
                }
                if target == current_agent {
                    return Err(SwitchboardError::malformed(
                        &invocation.name,
                        format!("agent '{}' cannot hand off to itself", target),
                    ));
                }
                tracing::info!(
                    "[ToolDispatcher] '{}' requested handoff {} -> {}",
                    invocation.name,
                    current_agent,
                    target
                );
                Ok(DispatchOutcome::Handoff { target, message })
            }
        }
    }
}
