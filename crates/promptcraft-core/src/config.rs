//! Gateway configuration: defaults, optional TOML file, then `PROMPTCRAFT__*` env.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | app_name | PromptCraft | Shown by `/health` logs and the shell page. |
//! | host / port | 127.0.0.1 / 5000 | Listen address. |
//! | public_dir | public | Root of statically served content. |
//! | generated_dir | generated | Sub-directory (and URL segment) for website artifacts. |
//! | llm_mode | live | `live` calls the provider, `mock` returns canned output. |
//! | llm_provider | gemini | `gemini` or `openrouter`. |
//! | llm_model | provider default | Model name passed to the provider. |
//! | llm_api_base | provider default | Override the provider base URL. |
//! | llm_timeout_secs | none | Request timeout; unset keeps the client default. |
//! | build_delay_ms | 3000 | Simulated build delay for app generation. |
//! | log_dir | none | When set, logs also roll daily into this directory. |
//!
//! API keys are read from `GEMINI_API_KEY` / `OPENROUTER_API_KEY` only.

use crate::artifact::generated_segment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_CONFIG_PATH: &str = "PROMPTCRAFT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/gateway.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmMode {
    #[default]
    Live,
    Mock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
    OpenRouter,
}

impl LlmProvider {
    pub fn api_key_env(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    pub public_dir: PathBuf,
    pub generated_dir: String,
    #[serde(default)]
    pub llm_mode: LlmMode,
    #[serde(default)]
    pub llm_provider: LlmProvider,
    #[serde(default)]
    pub llm_model: Option<String>,
    #[serde(default)]
    pub llm_api_base: Option<String>,
    #[serde(default)]
    pub llm_timeout_secs: Option<u64>,
    pub build_delay_ms: u64,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            app_name: "PromptCraft".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            public_dir: PathBuf::from("public"),
            generated_dir: "generated".to_string(),
            llm_mode: LlmMode::Live,
            llm_provider: LlmProvider::Gemini,
            llm_model: None,
            llm_api_base: None,
            llm_timeout_secs: None,
            build_delay_ms: 3000,
            log_dir: None,
        }
    }
}

impl RelayConfig {
    /// Load from `$PROMPTCRAFT_CONFIG` (or `config/gateway.toml` when present) and env.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let path = std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Some(Path::new(&path)))
    }

    /// Same as [`RelayConfig::load`] with an explicit file; a missing file is skipped.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let d = Self::default();
        let builder = ::config::Config::builder()
            .set_default("app_name", d.app_name)?
            .set_default("host", d.host)?
            .set_default("port", i64::from(d.port))?
            .set_default("public_dir", d.public_dir.to_string_lossy().into_owned())?
            .set_default("generated_dir", d.generated_dir)?
            .set_default("llm_mode", "live")?
            .set_default("llm_provider", "gemini")?
            .set_default("build_delay_ms", d.build_delay_ms as i64)?;

        let builder = match path {
            Some(p) if p.exists() => builder.add_source(::config::File::from(p)),
            _ => builder,
        };

        builder
            .add_source(
                ::config::Environment::with_prefix("PROMPTCRAFT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    fn validated(self) -> Result<Self, ::config::ConfigError> {
        if generated_segment(&self.generated_dir).is_none() {
            return Err(::config::ConfigError::Message(format!(
                "generated_dir {:?} must name a sub-directory of public_dir",
                self.generated_dir
            )));
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn build_delay(&self) -> Duration {
        Duration::from_millis(self.build_delay_ms)
    }

    pub fn llm_timeout(&self) -> Option<Duration> {
        self.llm_timeout_secs.map(Duration::from_secs)
    }
}
