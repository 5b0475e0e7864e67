//! Switchboard - Multi-agent handoff orchestration for restaurant calls
//!
//! A conversation is owned by one specialist agent at a time (greeter,
//! reservation, takeaway, checkout). Agents hand control to each other
//! through tools, carrying a bounded slice of history and a summary of
//! the shared user data into the next agent's context.

pub mod agents;
pub mod cli;
mod config;
pub mod core;
pub mod error;
pub mod orchestrator;
pub mod session;
pub mod tools;
pub mod utils;

pub use crate::config::{OrchestratorSettings, Settings, DEFAULT_MENU};
pub use agents::{AgentKind, AgentRegistry, SpecialistAgent};
pub use crate::core::llm::{ModelClient, ModelTurn, ToolChoice, ToolInvocation, TurnRequest};
pub use error::{Result, SwitchboardError};
pub use orchestrator::{Orchestrator, OrchestratorConfig, TurnOutcome};
pub use session::UserData;

use std::sync::Arc;

/// Build a restaurant conversation starting at the greeter
///
/// The session is validated but not started; call `start()` before the
/// first user message.
pub fn restaurant_session(model: Arc<dyn ModelClient>, settings: &Settings) -> Result<Orchestrator> {
    let agents = AgentRegistry::restaurant(&settings.restaurant.menu)?;
    Orchestrator::new(
        model,
        agents,
        UserData::new(),
        AgentKind::Greeter.name(),
        OrchestratorConfig::from(&settings.orchestrator),
    )
}
