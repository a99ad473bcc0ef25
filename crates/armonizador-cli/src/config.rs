use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Default)]
pub(crate) struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub host: HostConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct LoggingConfig {
    /// `EnvFilter` directive applied on top of `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "armonizador=info".to_string() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct HostConfig {
    pub class: String,
    /// Print each message before sending it
    pub echo_messages: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            class: armonizador_services::CLASS_NAME.to_string(),
            echo_messages: false,
        }
    }
}

pub(crate) fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("armonizador")
        .join("config.toml")
}

pub(crate) fn load_config() -> AppConfig {
    let path = config_path();
    std::fs::read_to_string(&path)
        .ok()
        .and_then(|s| parse_config(&s))
        .unwrap_or_default()
}

fn parse_config(text: &str) -> Option<AppConfig> {
    toml::from_str(text).ok()
}
