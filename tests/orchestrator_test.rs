//! Conversation-level tests for the orchestrator
//!
//! A scripted model stands in for the provider, so these run without API keys

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use switchboard::agents::kind::VOICE_ID;
use switchboard::core::chat::{ChatContext, ChatItem, Role};
use switchboard::core::llm::AgentOptions;
use switchboard::{
    AgentKind, AgentRegistry, ModelClient, ModelTurn, Orchestrator, OrchestratorConfig,
    SpecialistAgent, SwitchboardError, ToolChoice, ToolInvocation, TurnRequest, UserData,
};

#[derive(Debug, Clone)]
struct RecordedTurn {
    agent: String,
    tool_choice: ToolChoice,
    tools: Vec<String>,
    options: AgentOptions,
    context: ChatContext,
}

/// Plays back queued turns for `ToolChoice::Auto` and greets on entry
#[derive(Default)]
struct ScriptedModel {
    script: Mutex<VecDeque<ModelTurn>>,
    calls: Mutex<Vec<RecordedTurn>>,
    stall_on_entry: AtomicBool,
    fail_on_entry: AtomicBool,
}

impl ScriptedModel {
    fn push_tool(&self, name: &str, arguments: Value) {
        let mut script = self.script.lock().unwrap();
        let call_id = format!("call_{}", script.len() + self.calls.lock().unwrap().len());
        script.push_back(ModelTurn::ToolCall(ToolInvocation {
            call_id,
            name: name.to_string(),
            arguments,
        }));
    }

    fn push_reply(&self, text: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(ModelTurn::Reply(text.to_string()));
    }

    fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }

    fn calls(&self) -> Vec<RecordedTurn> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn run_turn(&self, request: TurnRequest<'_>) -> anyhow::Result<ModelTurn> {
        self.calls.lock().unwrap().push(RecordedTurn {
            agent: request.agent.to_string(),
            tool_choice: request.tool_choice,
            tools: request.tools.iter().map(|t| t.name.clone()).collect(),
            options: request.options.clone(),
            context: request.context.clone(),
        });

        if request.tool_choice == ToolChoice::None {
            if self.stall_on_entry.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            if self.fail_on_entry.load(Ordering::SeqCst) {
                anyhow::bail!("provider unavailable");
            }
            return Ok(ModelTurn::Reply(format!("Hello from {}", request.agent)));
        }

        let next = self.script.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| ModelTurn::Reply("Anything else?".to_string())))
    }
}

async fn started_session(model: Arc<ScriptedModel>, config: OrchestratorConfig) -> Orchestrator {
    let mut session = Orchestrator::new(
        model,
        AgentRegistry::restaurant("Pizza: 10 euros, Helado: 3 euros").unwrap(),
        UserData::new(),
        "greeter",
        config,
    )
    .unwrap();
    session.start().await.unwrap();
    session
}

fn system_messages(context: &ChatContext) -> Vec<String> {
    context
        .items()
        .iter()
        .filter_map(|item| match item {
            ChatItem::Message {
                role: Role::System,
                content,
                ..
            } => Some(content.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_start_runs_on_enter_for_initial_agent() {
    let model = Arc::new(ScriptedModel::default());
    let session = started_session(model.clone(), OrchestratorConfig::default()).await;

    assert_eq!(session.current_agent(), "greeter");
    assert_eq!(session.previous_agent(), None);

    let calls = model.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tool_choice, ToolChoice::None);
    assert_eq!(calls[0].tools, vec!["to_reservation", "to_takeaway"]);

    let context = session.agent("greeter").unwrap().context();
    let systems = system_messages(context);
    assert_eq!(systems.len(), 2);
    assert!(systems[1].ends_with(&UserData::new().summarize()));
    assert_eq!(context.last_assistant_message(), Some("Hello from greeter"));
}

#[tokio::test]
async fn test_to_reservation_hands_off_with_summary() {
    let model = Arc::new(ScriptedModel::default());
    let mut session = started_session(model.clone(), OrchestratorConfig::default()).await;
    let summary_before = session.userdata().summarize();

    model.push_tool("to_reservation", json!({}));
    let outcome = session
        .handle_user_message("Quiero reservar una mesa")
        .await
        .unwrap();

    assert_eq!(session.current_agent(), "reservation");
    assert_eq!(session.previous_agent(), Some("greeter"));
    assert_eq!(outcome.agent, "reservation");
    assert_eq!(outcome.reply.as_deref(), Some("Hello from reservation"));
    let handoff = outcome.handoff.unwrap();
    assert_eq!((handoff.from.as_str(), handoff.to.as_str()), ("greeter", "reservation"));
    assert_eq!(outcome.steps[0].output, "Transferring to reservation.");

    let reservation = session.agent("reservation").unwrap().context();
    let systems = system_messages(reservation);
    assert!(systems
        .iter()
        .any(|s| s.starts_with("You are the Reservation agent.") && s.ends_with(&summary_before)));

    // the caller's request travelled with the handoff
    assert!(reservation.items().iter().any(|item| matches!(
        item,
        ChatItem::Message { role: Role::User, content, .. } if content == "Quiero reservar una mesa"
    )));

    // the outgoing agent sees the transition as the tool result
    let greeter = session.agent("greeter").unwrap().context();
    assert!(matches!(
        greeter.items().last(),
        Some(ChatItem::FunctionCallOutput { output, .. }) if output == "Transferring to reservation."
    ));

    // entry grounding ran on the new agent with tools disabled
    let last = model.calls().pop().unwrap();
    assert_eq!(last.agent, "reservation");
    assert_eq!(last.tool_choice, ToolChoice::None);
}

#[tokio::test]
async fn test_agent_options_reach_the_model() {
    let model = Arc::new(ScriptedModel::default());
    let mut session = started_session(model.clone(), OrchestratorConfig::default()).await;

    model.push_tool("to_takeaway", json!({}));
    session.handle_user_message("para llevar").await.unwrap();

    let calls = model.calls();
    let greeter = calls.iter().find(|c| c.agent == "greeter").unwrap();
    assert_eq!(greeter.options.model.as_deref(), Some("gpt-4o-mini"));
    assert_eq!(greeter.options.voice.as_deref(), Some(VOICE_ID));

    let takeaway = calls.iter().find(|c| c.agent == "takeaway").unwrap();
    assert_eq!(takeaway.options.model, None);
    assert_eq!(takeaway.options.voice.as_deref(), Some(VOICE_ID));
}

#[tokio::test]
async fn test_to_checkout_without_order_stays_in_takeaway() {
    let model = Arc::new(ScriptedModel::default());
    let mut session = started_session(model.clone(), OrchestratorConfig::default()).await;

    model.push_tool("to_takeaway", json!({}));
    session.handle_user_message("para llevar").await.unwrap();
    assert_eq!(session.current_agent(), "takeaway");

    model.push_tool("to_checkout", json!({}));
    model.push_reply("¿Qué te gustaría pedir?");
    let outcome = session.handle_user_message("quiero pagar").await.unwrap();

    assert_eq!(
        outcome.steps[0].output,
        "No takeaway order found. Please make an order first."
    );
    assert!(outcome.handoff.is_none());
    assert_eq!(outcome.reply.as_deref(), Some("¿Qué te gustaría pedir?"));
    assert_eq!(session.current_agent(), "takeaway");
    assert_eq!(session.previous_agent(), Some("greeter"));
}

#[tokio::test]
async fn test_tool_chain_is_capped_per_turn() {
    let model = Arc::new(ScriptedModel::default());
    let mut session = started_session(model.clone(), OrchestratorConfig::default()).await;

    model.push_tool("to_reservation", json!({}));
    session.handle_user_message("reserva").await.unwrap();

    for i in 1..=6 {
        model.push_tool("update_name", json!({ "name": format!("Name {}", i) }));
    }
    model.push_reply("never reached");

    let outcome = session.handle_user_message("me llamo...").await.unwrap();

    assert_eq!(outcome.steps.len(), 5);
    assert!(outcome.chain_truncated);
    assert!(outcome.reply.is_none());
    assert_eq!(session.userdata().customer_name(), Some("Name 5"));
    assert_eq!(session.current_agent(), "reservation");
    // the sixth call was requested but dropped; the trailing reply is untouched
    assert_eq!(model.remaining(), 1);
}

#[tokio::test]
async fn test_full_takeaway_checkout_flow() {
    let model = Arc::new(ScriptedModel::default());
    let mut session = started_session(model.clone(), OrchestratorConfig::default()).await;

    model.push_tool("to_takeaway", json!({}));
    session.handle_user_message("para llevar").await.unwrap();

    model.push_tool("update_order", json!({"items": ["Pizza", "Helado"]}));
    model.push_tool("to_checkout", json!({}));
    let outcome = session.handle_user_message("una pizza y un helado").await.unwrap();
    assert_eq!(outcome.steps.len(), 2);
    assert_eq!(session.current_agent(), "checkout");
    assert_eq!(session.previous_agent(), Some("takeaway"));

    model.push_tool("confirm_expense", json!({"expense": 13.0}));
    model.push_tool("confirm_checkout", json!({}));
    model.push_reply("Necesito los datos de la tarjeta");
    let outcome = session.handle_user_message("13 euros, vale").await.unwrap();
    assert_eq!(
        outcome.steps[1].output,
        "Please provide the credit card information first."
    );
    assert_eq!(session.current_agent(), "checkout");
    assert!(!session.userdata().checked_out());

    model.push_tool(
        "update_credit_card",
        json!({"number": "4111111111111111", "expiry": "12/27", "cvv": "123"}),
    );
    model.push_tool("confirm_checkout", json!({}));
    let outcome = session.handle_user_message("4111...").await.unwrap();

    assert_eq!(session.current_agent(), "greeter");
    assert_eq!(session.previous_agent(), Some("checkout"));
    assert!(session.userdata().checked_out());
    assert_eq!(outcome.handoff.unwrap().message, "Transferring to greeter.");

    let greeter = session.agent("greeter").unwrap().context();
    let summary = system_messages(greeter).pop().unwrap();
    assert!(summary.ends_with("checked_out: true"));
}

#[tokio::test]
async fn test_reentry_does_not_duplicate_items() {
    let model = Arc::new(ScriptedModel::default());
    let mut session = started_session(model.clone(), OrchestratorConfig::default()).await;

    model.push_tool("to_reservation", json!({}));
    session.handle_user_message("reserva").await.unwrap();
    model.push_tool("to_greeter", json!({}));
    session.handle_user_message("mejor no").await.unwrap();

    assert_eq!(session.current_agent(), "greeter");
    let greeter = session.agent("greeter").unwrap().context();
    let ids: Vec<&str> = greeter.items().iter().map(|item| item.id()).collect();
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());
}

#[tokio::test]
async fn test_cancelled_handoff_is_not_applied() {
    let model = Arc::new(ScriptedModel::default());
    let mut session = started_session(model.clone(), OrchestratorConfig::default()).await;
    let reservation_before = session.agent("reservation").unwrap().context().clone();

    model.stall_on_entry.store(true, Ordering::SeqCst);
    model.push_tool("to_reservation", json!({}));
    let result = tokio::time::timeout(
        Duration::from_millis(50),
        session.handle_user_message("reserva"),
    )
    .await;
    assert!(result.is_err());

    assert_eq!(session.current_agent(), "greeter");
    assert_eq!(session.previous_agent(), None);
    assert_eq!(
        session.agent("reservation").unwrap().context(),
        &reservation_before
    );
    let greeter = session.agent("greeter").unwrap().context();
    assert!(!greeter.items().iter().any(|item| item.is_tool_item()));
}

/// Session sitting in checkout with the expense and card details collected
async fn checkout_ready_session(model: Arc<ScriptedModel>) -> Orchestrator {
    let mut session = started_session(model.clone(), OrchestratorConfig::default()).await;

    model.push_tool("to_takeaway", json!({}));
    session.handle_user_message("para llevar").await.unwrap();
    model.push_tool("update_order", json!({"items": ["Pizza"]}));
    model.push_tool("to_checkout", json!({}));
    session.handle_user_message("una pizza").await.unwrap();
    model.push_tool("confirm_expense", json!({"expense": 10.0}));
    model.push_tool(
        "update_credit_card",
        json!({"number": "4111111111111111", "expiry": "12/27", "cvv": "123"}),
    );
    session.handle_user_message("10 euros, mi tarjeta es...").await.unwrap();

    assert_eq!(session.current_agent(), "checkout");
    assert!(session.userdata().has_card_details());
    session
}

#[tokio::test]
async fn test_cancelled_checkout_keeps_user_data() {
    let model = Arc::new(ScriptedModel::default());
    let mut session = checkout_ready_session(model.clone()).await;
    let data_before = session.userdata().clone();

    model.stall_on_entry.store(true, Ordering::SeqCst);
    model.push_tool("confirm_checkout", json!({}));
    let result = tokio::time::timeout(
        Duration::from_millis(50),
        session.handle_user_message("confirmo el pago"),
    )
    .await;
    assert!(result.is_err());

    assert_eq!(session.current_agent(), "checkout");
    assert_eq!(session.previous_agent(), Some("takeaway"));
    assert!(!session.userdata().checked_out());
    assert_eq!(session.userdata(), &data_before);
}

#[tokio::test]
async fn test_failed_entry_turn_rolls_back_checkout() {
    let model = Arc::new(ScriptedModel::default());
    let mut session = checkout_ready_session(model.clone()).await;

    model.fail_on_entry.store(true, Ordering::SeqCst);
    model.push_tool("confirm_checkout", json!({}));
    let err = session.handle_user_message("confirmo el pago").await.unwrap_err();
    assert!(matches!(err, SwitchboardError::Model(_)));
    assert!(!err.is_fatal());

    assert_eq!(session.current_agent(), "checkout");
    assert_eq!(session.previous_agent(), Some("takeaway"));
    assert!(!session.userdata().checked_out());
    let checkout = session.agent("checkout").unwrap().context();
    assert!(!checkout.items().iter().any(|item| matches!(
        item,
        ChatItem::FunctionCall { name, .. } if name == "confirm_checkout"
    )));

    // the caller can simply try again once the provider recovers
    model.fail_on_entry.store(false, Ordering::SeqCst);
    model.push_tool("confirm_checkout", json!({}));
    session.handle_user_message("otra vez").await.unwrap();
    assert_eq!(session.current_agent(), "greeter");
    assert!(session.userdata().checked_out());
}

#[tokio::test]
async fn test_undeclared_tool_is_fatal() {
    let model = Arc::new(ScriptedModel::default());
    let mut session = started_session(model.clone(), OrchestratorConfig::default()).await;

    model.push_tool("confirm_checkout", json!({}));
    let err = session.handle_user_message("pagar").await.unwrap_err();
    assert!(matches!(err, SwitchboardError::UnknownTool { ref tool, .. } if tool == "confirm_checkout"));
    assert!(err.is_fatal());
    assert_eq!(session.current_agent(), "greeter");
}

#[tokio::test]
async fn test_session_construction_validates_wiring() {
    let model: Arc<ScriptedModel> = Arc::new(ScriptedModel::default());

    let err = Orchestrator::new(
        model.clone(),
        AgentRegistry::restaurant("menu").unwrap(),
        UserData::new(),
        "kitchen",
        OrchestratorConfig::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, SwitchboardError::Config(_)));

    let mut partial = AgentRegistry::new();
    partial
        .register(SpecialistAgent::new(AgentKind::Greeter, "menu").unwrap())
        .unwrap();
    let err = Orchestrator::new(
        model,
        partial,
        UserData::new(),
        "greeter",
        OrchestratorConfig::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, SwitchboardError::Config(ref msg) if msg.contains("reservation")));
}

#[tokio::test]
async fn test_turns_require_start() {
    let model = Arc::new(ScriptedModel::default());
    let mut session = Orchestrator::new(
        model.clone(),
        AgentRegistry::restaurant("menu").unwrap(),
        UserData::new(),
        "greeter",
        OrchestratorConfig::default(),
    )
    .unwrap();

    assert!(session.handle_user_message("hola").await.is_err());
    session.start().await.unwrap();
    assert!(session.start().await.is_err());
    assert!(session.handle_user_message("hola").await.is_ok());
}
