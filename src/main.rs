use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use switchboard::cli::{Cli, Commands};
use switchboard::core::openai::OpenAiClient;
use switchboard::{utils, AgentRegistry, Orchestrator, Settings, TurnOutcome};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            menu,
            max_tool_steps,
            verbose,
        } => handle_chat(settings, menu, max_tool_steps, verbose).await,
        Commands::Agents { detailed } => handle_agents(&settings, detailed),
    }
}

async fn handle_chat(
    mut settings: Settings,
    menu: Option<String>,
    max_tool_steps: Option<usize>,
    verbose: bool,
) -> Result<()> {
    if let Some(menu) = menu {
        settings.restaurant.menu = menu;
    }
    if let Some(steps) = max_tool_steps {
        settings.orchestrator.max_tool_steps = steps;
    }

    let api_key = Settings::api_key()?;
    let model = Arc::new(OpenAiClient::new(api_key, settings.clone()));
    let mut session = switchboard::restaurant_session(model, &settings)?;

    utils::display::print_header("Restaurant line");
    utils::display::print_info("Type your messages (Ctrl+C to exit, /state for the collected data)\n");

    let opening = session.start().await?;
    print_outcome(&opening, verbose);

    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin);

    loop {
        utils::display::print_prompt("You: ");
        let mut input = String::new();
        if reader.read_line(&mut input).await? == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "/state" {
            print_state(&session);
            continue;
        }

        match session.handle_user_message(input).await {
            Ok(outcome) => print_outcome(&outcome, verbose),
            Err(e) if !e.is_fatal() => {
                utils::display::print_error(&format!("Turn failed: {}", e));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn handle_agents(settings: &Settings, detailed: bool) -> Result<()> {
    let registry = AgentRegistry::restaurant(&settings.restaurant.menu)?;
    registry.validate()?;

    for agent in registry.agents() {
        utils::display::print_header(agent.kind().display_name());
        let options = agent.options();
        utils::display::print_info(&format!(
            "model: {}, voice: {}",
            options.model.as_deref().unwrap_or(&settings.llm.model),
            options.voice.as_deref().unwrap_or("default")
        ));
        if detailed {
            println!("{}
", agent.instructions());
            println!("{}", agent.tools().tools_description());
        } else {
            for tool in agent.tool_metadata() {
                println!("  {}", tool);
            }
        }
    }
    Ok(())
}

fn print_outcome(outcome: &TurnOutcome, verbose: bool) {
    if verbose {
        for step in &outcome.steps {
            utils::display::print_tool_step(&step.tool, &step.output);
        }
    }
    if let Some(handoff) = &outcome.handoff {
        utils::display::print_handoff(&handoff.from, &handoff.to);
    }
    if let Some(reply) = &outcome.reply {
        utils::display::print_agent_reply(&outcome.agent, reply);
    }
    if outcome.chain_truncated {
        utils::display::print_info("(tool chain limit reached for this turn)");
    }
    println!();
}

fn print_state(session: &Orchestrator) {
    utils::display::print_info(&format!(
        "Current agent: {} (previous: {})",
        session.current_agent(),
        session.previous_agent().unwrap_or("none")
    ));
    println!("{}\n", session.userdata().summarize());
}
