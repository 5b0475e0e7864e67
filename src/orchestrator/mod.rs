//! Orchestrator - Owns the current agent and drives conversation turns
//!
//! Information Hiding:
//! - Current/previous agent bookkeeping hidden
//! - Tool chain limit enforced internally
//! - Handoffs staged and committed in one step after the entering agent spoke
//!
//! Every turn method takes `&mut self`, so a conversation processes one turn
//! at a time and no locking is needed. A turn future dropped while a handoff
//! is still awaiting the entering agent's reply leaves the current agent,
//! the user data and both chat contexts untouched.

pub mod handoff;

use crate::agents::{AgentRegistry, SpecialistAgent};
use crate::config::OrchestratorSettings;
use crate::core::chat::{ChatContext, ChatItem};
use crate::core::llm::{ModelClient, ModelTurn, ToolChoice, ToolInvocation, TurnRequest};
use crate::core::truncate::TruncationPolicy;
use crate::error::{Result, SwitchboardError};
use crate::session::UserData;
use crate::tools::dispatcher::{DispatchOutcome, ToolDispatcher};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Limits applied to every turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Tool executions allowed per user turn
    pub max_tool_steps: usize,
    pub truncation: TruncationPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_tool_steps: 5,
            truncation: TruncationPolicy::default(),
        }
    }
}

impl From<&OrchestratorSettings> for OrchestratorConfig {
    fn from(settings: &OrchestratorSettings) -> Self {
        Self {
            max_tool_steps: settings.max_tool_steps,
            truncation: TruncationPolicy {
                keep_last: settings.context_window,
                keep_system_messages: settings.keep_system_messages,
                keep_function_calls: settings.keep_function_calls,
            },
        }
    }
}

/// Tool executed during a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnStep {
    pub agent: String,
    pub tool: String,
    pub arguments: Value,
    pub output: String,
}

/// Transition applied during a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffRecord {
    pub from: String,
    pub to: String,
    pub message: String,
}

/// What happened while processing one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Agent that is current once the turn ends
    pub agent: String,
    /// Text to speak to the caller, if the model produced any
    pub reply: Option<String>,
    pub steps: Vec<TurnStep>,
    pub handoff: Option<HandoffRecord>,
    /// The model asked for more tool calls than the per-turn limit allows
    pub chain_truncated: bool,
}

impl TurnOutcome {
    fn new(agent: &str) -> Self {
        Self {
            agent: agent.to_string(),
            reply: None,
            steps: Vec::new(),
            handoff: None,
            chain_truncated: false,
        }
    }
}

pub struct Orchestrator {
    model: Arc<dyn ModelClient>,
    agents: AgentRegistry,
    userdata: UserData,
    current: String,
    config: OrchestratorConfig,
    dispatcher: ToolDispatcher,
    started: bool,
}

impl Orchestrator {
    /// Build a session; fails fast on any wiring problem
    pub fn new(
        model: Arc<dyn ModelClient>,
        agents: AgentRegistry,
        userdata: UserData,
        initial_agent: &str,
        config: OrchestratorConfig,
    ) -> Result<Self> {
        agents.validate()?;
        if !agents.contains(initial_agent) {
            return Err(SwitchboardError::config(format!(
                "initial agent '{}' is not registered",
                initial_agent
            )));
        }

        tracing::info!(
            "[Orchestrator] Session ready with agents {:?}, starting at '{}'",
            agents.names(),
            initial_agent
        );

        Ok(Self {
            model,
            agents,
            userdata,
            current: initial_agent.to_string(),
            config,
            dispatcher: ToolDispatcher::new(),
            started: false,
        })
    }

    pub fn current_agent(&self) -> &str {
        &self.current
    }

    pub fn previous_agent(&self) -> Option<&str> {
        self.userdata.previous_agent()
    }

    pub fn userdata(&self) -> &UserData {
        &self.userdata
    }

    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    pub fn agent(&self, name: &str) -> Result<&SpecialistAgent> {
        self.agents.get(name)
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Run the on-enter protocol for the initial agent
    pub async fn start(&mut self) -> Result<TurnOutcome> {
        if self.started {
            return Err(SwitchboardError::config("conversation already started"));
        }

        let agent = self.agents.get(&self.current)?;
        let previous = match self.userdata.previous_agent() {
            Some(name) => Some(self.agents.get(name)?.context()),
            None => None,
        };
        let context = handoff::prepare_entry(agent, previous, &self.userdata, &self.config.truncation);
        let reply = self.ground(agent, &context).await?;

        tracing::info!("[Orchestrator] Entering agent '{}'", self.current);
        let current = self.current.clone();
        self.commit_entry(&current, context, reply.as_deref())?;
        self.started = true;

        let mut outcome = TurnOutcome::new(&self.current);
        outcome.reply = reply;
        Ok(outcome)
    }

    /// Process one caller utterance
    pub async fn handle_user_message(&mut self, text: &str) -> Result<TurnOutcome> {
        if !self.started {
            return Err(SwitchboardError::config(
                "conversation not started; call start() first",
            ));
        }

        self.agents
            .get_mut(&self.current)?
            .context_mut()
            .push(ChatItem::user(text));

        let mut outcome = TurnOutcome::new(&self.current);
        let mut executed = 0;

        loop {
            let invocation = match self.request_turn(ToolChoice::Auto).await? {
                ModelTurn::Reply(reply) => {
                    self.agents
                        .get_mut(&self.current)?
                        .context_mut()
                        .push(ChatItem::assistant(reply.as_str()));
                    outcome.reply = Some(reply);
                    break;
                }
                ModelTurn::ToolCall(invocation) => invocation,
            };

            if executed >= self.config.max_tool_steps {
                tracing::warn!(
                    "[Orchestrator] Tool chain limit ({}) reached on '{}', dropping call to '{}'",
                    self.config.max_tool_steps,
                    self.current,
                    invocation.name
                );
                outcome.chain_truncated = true;
                break;
            }
            executed += 1;

            // Tools write to a staged copy; a handoff commits it with the transition
            let mut staged = self.userdata.clone();
            let dispatched = self.dispatcher.dispatch(
                &invocation,
                &mut staged,
                &self.agents,
                &self.current,
            )?;

            outcome.steps.push(TurnStep {
                agent: self.current.clone(),
                tool: invocation.name.clone(),
                arguments: invocation.arguments.clone(),
                output: dispatched.output().to_string(),
            });

            match dispatched {
                DispatchOutcome::Reply(output) => {
                    self.userdata = staged;
                    let context = self.agents.get_mut(&self.current)?.context_mut();
                    push_tool_exchange(context, &invocation, &output);
                }
                DispatchOutcome::Handoff { target, message } => {
                    let from = self.current.clone();
                    let reply = self
                        .transfer(&invocation, &target, &message, staged)
                        .await?;
                    outcome.agent = target.clone();
                    outcome.reply = reply;
                    outcome.handoff = Some(HandoffRecord {
                        from,
                        to: target,
                        message,
                    });
                    // the entering agent has already spoken for this turn
                    break;
                }
            }
        }

        Ok(outcome)
    }

    /// Stage a handoff, let the entering agent speak, then commit everything
    async fn transfer(
        &mut self,
        invocation: &ToolInvocation,
        target: &str,
        message: &str,
        mut userdata: UserData,
    ) -> Result<Option<String>> {
        let from = self.current.clone();

        let mut outgoing = self.agents.get(&from)?.context().clone();
        push_tool_exchange(&mut outgoing, invocation, message);

        let entering = self.agents.get(target)?;
        let context = handoff::prepare_entry(
            entering,
            Some(&outgoing),
            &userdata,
            &self.config.truncation,
        );
        let reply = self.ground(entering, &context).await?;

        // Nothing below awaits: the handoff lands in full or not at all
        self.agents.get_mut(&from)?.replace_context(outgoing);
        self.commit_entry(target, context, reply.as_deref())?;
        userdata.set_previous_agent(from.as_str());
        self.userdata = userdata;
        self.current = target.to_string();

        tracing::info!("[Orchestrator] Handoff {} -> {}", from, target);
        Ok(reply)
    }

    fn commit_entry(&mut self, name: &str, mut context: ChatContext, reply: Option<&str>) -> Result<()> {
        if let Some(reply) = reply {
            context.push(ChatItem::assistant(reply));
        }
        self.agents.get_mut(name)?.replace_context(context);
        Ok(())
    }

    /// Grounding turn on entry; tools are offered but may not be called
    async fn ground(&self, agent: &SpecialistAgent, context: &ChatContext) -> Result<Option<String>> {
        let tools = agent.tool_metadata();
        let request = TurnRequest {
            agent: agent.name(),
            options: agent.options(),
            context,
            tools: &tools,
            tool_choice: ToolChoice::None,
        };

        match self.model.run_turn(request).await? {
            ModelTurn::Reply(reply) => Ok(Some(reply)),
            ModelTurn::ToolCall(invocation) => {
                tracing::warn!(
                    "[Orchestrator] '{}' tried to call '{}' on entry; ignored",
                    agent.name(),
                    invocation.name
                );
                Ok(None)
            }
        }
    }

    async fn request_turn(&self, tool_choice: ToolChoice) -> Result<ModelTurn> {
        let agent = self.agents.get(&self.current)?;
        let tools = agent.tool_metadata();
        let request = TurnRequest {
            agent: agent.name(),
            options: agent.options(),
            context: agent.context(),
            tools: &tools,
            tool_choice,
        };
        tracing::debug!(
            "[Orchestrator] Model turn for '{}' ({} items, {} tools)",
            agent.name(),
            agent.context().len(),
            tools.len()
        );
        Ok(self.model.run_turn(request).await?)
    }
}

fn push_tool_exchange(context: &mut ChatContext, invocation: &ToolInvocation, output: &str) {
    context.push(ChatItem::function_call(
        invocation.call_id.as_str(),
        invocation.name.as_str(),
        invocation.arguments.clone(),
    ));
    context.push(ChatItem::function_call_output(invocation.call_id.as_str(), output));
}
