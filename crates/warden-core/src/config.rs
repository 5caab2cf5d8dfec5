use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level config (warden.toml + WARDEN_* env overrides).
///
/// Nested env keys use a double underscore, e.g.
/// `WARDEN_COMPLETION__API_KEY` overrides `completion.api_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardenConfig {
    pub platform: PlatformConfig,
    pub completion: CompletionConfig,
    /// OCR is optional — without it, image promotion checks are skipped.
    pub ocr: Option<OcrConfig>,
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Platform bridge settings plus the moderation policy identities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the messaging bridge REST API (without trailing slash).
    pub base_url: String,
    /// Bearer token for the bridge API, when the bridge requires one.
    pub api_token: Option<String>,
    /// The single conversation the bot moderates. Everything else is ignored.
    pub target_conversation: String,
    /// Audit conversation that promotional messages are forwarded to.
    pub forward_conversation: String,
    /// The bot's own identity, matched against inbound mention lists.
    pub own_identity: String,
    /// Per-call timeout for outbound platform requests.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Bind address for the inbound-event webhook server.
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// When set, inbound events must carry this value in `x-warden-token`.
    pub webhook_token: Option<String>,
}

/// Completion-service settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub api_key: String,
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_completion_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Base URL of the OCR service (without trailing slash).
    pub base_url: String,
    #[serde(default = "default_ocr_language")]
    pub language: String,
    #[serde(default = "default_ocr_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum idle gap before a conversation's history is discarded.
    #[serde(default = "default_context_window_secs")]
    pub context_window_secs: u64,
    /// Conversations idle longer than this are dropped from the store
    /// entirely by the periodic sweep.
    #[serde(default = "default_sweep_retention_secs")]
    pub sweep_retention_secs: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            context_window_secs: default_context_window_secs(),
            sweep_retention_secs: default_sweep_retention_secs(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    15
}
fn default_bind() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8490
}
fn default_completion_base_url() -> String {
    "https://openrouter.ai/api".to_string()
}
fn default_model() -> String {
    "openai/gpt-3.5-turbo".to_string()
}
fn default_max_tokens() -> u32 {
    500
}
fn default_completion_timeout_secs() -> u64 {
    30
}
fn default_ocr_language() -> String {
    "eng".to_string()
}
fn default_ocr_timeout_secs() -> u64 {
    20
}
fn default_context_window_secs() -> u64 {
    120
}
fn default_sweep_retention_secs() -> u64 {
    3600
}

impl WardenConfig {
    /// Load config from a TOML file with WARDEN_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./warden.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or("warden.toml");

        let config: WardenConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("WARDEN_").split("__"))
            .extract()
            .map_err(|e| crate::error::WardenError::Config(e.to_string()))?;

        Ok(config)
    }
}
