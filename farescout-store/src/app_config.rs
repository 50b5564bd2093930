use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchConfig,
    #[serde(default)]
    pub fx: FxConfig,
    #[serde(default)]
    pub explanation: ExplanationConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FxConfig {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExplanationConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            model: default_model(),
        }
    }
}

fn default_model() -> String {
    "mixtral-8x7b-32768".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HistoryConfig {
    pub database_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_window_days() -> i64 {
    3
}

fn default_cache_capacity() -> u64 {
    64
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `FARESCOUT__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("FARESCOUT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
