use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(author, version, about = "Multi-agent restaurant phone assistant", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Hold a text conversation with the restaurant agents
    Chat {
        /// Menu offered to the caller (defaults to the configured menu)
        #[arg(short, long)]
        menu: Option<String>,

        /// Maximum chained tool calls per turn
        #[arg(long)]
        max_tool_steps: Option<usize>,

        /// Print the tools each agent ran
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the agents and the tools they declare
    Agents {
        /// Show parameter details for every tool
        #[arg(short, long)]
        detailed: bool,
    },
}
