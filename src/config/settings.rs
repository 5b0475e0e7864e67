use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_MENU: &str = "Pizza: 10 euros, Ensalada: 5 euros, Helado: 3 euros, Café: 2 euros";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LLMConfig,
    pub orchestrator: OrchestratorSettings,
    pub restaurant: RestaurantConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorSettings {
    pub max_tool_steps: usize,
    pub context_window: usize,
    pub keep_system_messages: bool,
    pub keep_function_calls: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantConfig {
    pub menu: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let config = Self::with_defaults(Config::builder())?
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("llm.model", "gpt-4o-mini")?
            .set_default("llm.max_tokens", 512_i64)?
            .set_default("llm.temperature", 0.7)?
            .set_default("llm.api_base", "https://api.openai.com/v1")?
            .set_default("orchestrator.max_tool_steps", 5_i64)?
            .set_default("orchestrator.context_window", 6_i64)?
            .set_default("orchestrator.keep_system_messages", false)?
            .set_default("orchestrator.keep_function_calls", true)?
            .set_default("restaurant.menu", DEFAULT_MENU)?
            .set_default("logging.level", "info")
    }

    pub fn api_key() -> Result<String> {
        env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm: LLMConfig {
                model: "gpt-4o-mini".to_string(),
                max_tokens: 512,
                temperature: 0.7,
                api_base: "https://api.openai.com/v1".to_string(),
            },
            orchestrator: OrchestratorSettings {
                max_tool_steps: 5,
                context_window: 6,
                keep_system_messages: false,
                keep_function_calls: true,
            },
            restaurant: RestaurantConfig {
                menu: DEFAULT_MENU.to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}
