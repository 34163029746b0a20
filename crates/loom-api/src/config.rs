use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use loom_chat::ChatConfig;
use loom_llm::ProviderConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub mongodb: MongoDbConfig,
    pub llm: LlmConfig,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
    #[serde(default)]
    pub openai_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// "openai" or "mock"
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_response_tokens: Option<u32>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Most recent messages considered for the model input window
    pub n_latest: usize,
    /// Approximate token budget for the window
    pub max_tokens: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, CORS_, MONGODB_, LLM_, HISTORY_,
    ///    LOG_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .prefix("SERVER")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("CORS")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("MONGODB")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("LLM")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("HISTORY")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("LOG")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let mut cfg: Config = config.try_deserialize()?;

        // Secrets come from ENV, never from TOML.
        cfg.mongodb_uri = std::env::var("MONGODB_URI").map_err(|_| {
            ConfigError::Message("MONGODB_URI environment variable is required".to_string())
        })?;
        if cfg.llm.provider == "openai" {
            cfg.openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
                ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
            })?;
        }

        Ok(cfg)
    }

    pub fn provider_config(&self) -> ProviderConfig {
        match self.llm.provider.as_str() {
            "mock" => ProviderConfig::mock(),
            _ => ProviderConfig::openai(self.openai_api_key.clone()),
        }
    }

    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            model: self.llm.model.clone(),
            history_n_latest: self.history.n_latest,
            history_max_tokens: self.history.max_tokens,
            system_prompt: self.llm.system_prompt.clone(),
            temperature: self.llm.temperature,
            max_response_tokens: self.llm.max_response_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 8000

            [cors]
            enabled = true
            origins = ["*"]

            [mongodb]
            database = "loomchat"

            [llm]
            provider = "mock"
            model = "gpt-4o-mini"

            [history]
            n_latest = 30
            max_tokens = 2000

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.mongodb.database, "loomchat");
        assert_eq!(config.history.n_latest, 30);

        let chat = config.chat_config();
        assert_eq!(chat.history_max_tokens, 2000);
        assert!(chat.system_prompt.is_none());
    }
}
