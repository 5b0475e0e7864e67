//! Agent Registry
//!
//! Maps fixed agent names to agent instances. Populated once when the
//! session is built; only agent contexts change afterwards.

use super::{AgentKind, SpecialistAgent};
use crate::error::{Result, SwitchboardError};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: BTreeMap<String, SpecialistAgent>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four restaurant specialists sharing one menu
    pub fn restaurant(menu: &str) -> Result<Self> {
        let mut registry = Self::new();
        for kind in AgentKind::ALL {
            registry.register(SpecialistAgent::new(kind, menu)?)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, agent: SpecialistAgent) -> Result<()> {
        let name = agent.name().to_string();
        if self.agents.contains_key(&name) {
            return Err(SwitchboardError::config(format!(
                "agent '{}' registered twice",
                name
            )));
        }
        tracing::debug!("Registering agent: {}", name);
        self.agents.insert(name, agent);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&SpecialistAgent> {
        self.agents
            .get(name)
            .ok_or_else(|| SwitchboardError::UnknownAgent(name.to_string()))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Result<&mut SpecialistAgent> {
        self.agents
            .get_mut(name)
            .ok_or_else(|| SwitchboardError::UnknownAgent(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.agents.keys().map(String::as_str).collect()
    }

    pub fn agents(&self) -> impl Iterator<Item = &SpecialistAgent> {
        self.agents.values()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Check that every handoff tool points at a registered agent
    pub fn validate(&self) -> Result<()> {
        if self.agents.is_empty() {
            return Err(SwitchboardError::config("no agents registered"));
        }
        for agent in self.agents.values() {
            for (tool, target) in agent.tools().handoff_targets() {
                if !self.agents.contains_key(target) {
                    return Err(SwitchboardError::config(format!(
                        "tool '{}' of agent '{}' hands off to unregistered agent '{}'",
                        tool,
                        agent.name(),
                        target
                    )));
                }
                if target == agent.name() {
                    return Err(SwitchboardError::config(format!(
                        "tool '{}' of agent '{}' hands off to itself",
                        tool,
                        agent.name()
                    )));
                }
            }
        }
        Ok(())
    }
}
