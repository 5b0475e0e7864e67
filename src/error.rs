//! Error types for the orchestration core
//!
//! Guard failures are not errors: tools report them to the model as plain
//! replies. Everything here is either a startup validation failure, a broken
//! tool contract, or a provider failure bubbling up from the model client.

use thiserror::Error;

/// Main error type for switchboard operations
#[derive(Error, Debug)]
pub enum SwitchboardError {
    /// Session construction rejected the agent/tool wiring
    #[error("Configuration error: {0}")]
    Config(String),

    /// Lookup of an agent name that was never registered
    #[error("Agent '{0}' is not registered")]
    UnknownAgent(String),

    /// The model invoked a tool the active agent does not declare
    #[error("Tool '{tool}' is not declared by agent '{agent}'")]
    UnknownTool { agent: String, tool: String },

    /// A tool returned a transfer that cannot be applied
    #[error("Tool '{tool}' returned a malformed handoff directive: {reason}")]
    MalformedDirective { tool: String, reason: String },

    /// Tool arguments did not match the declared parameter schema
    #[error("Invalid arguments for tool '{tool}': {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failure reported by the language model provider
    #[error("Model error: {0}")]
    Model(#[from] anyhow::Error),
}

/// Convenience Result type for orchestration operations
pub type Result<T> = std::result::Result<T, SwitchboardError>;

impl SwitchboardError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed directive error
    pub fn malformed(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDirective {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error indicates broken wiring rather than a runtime hiccup
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Model(_) | Self::InvalidArguments { .. })
    }
}
