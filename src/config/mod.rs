mod settings;

pub use settings::{
    LLMConfig, LoggingConfig, OrchestratorSettings, RestaurantConfig, Settings, DEFAULT_MENU,
};
